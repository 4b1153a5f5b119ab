//! Price distribution buckets

use crate::pipeline::filter::FilteredView;
use crate::pipeline::types::{HistogramBin, MAX_HISTOGRAM_BINS};
use tracing::debug;

/// Bucket prices below `upper_bound` into at most `max_bins` equal-width bins
///
/// Sales without a price are skipped and `max_bins` is capped at
/// `MAX_HISTOGRAM_BINS`. Bins span the smallest to the largest remaining
/// price. Each bin is closed on the left and open on the right, except the
/// last which also holds the maximum. When every remaining price is equal a
/// single zero-width bin is returned.
pub fn histogram(view: &FilteredView<'_>, upper_bound: f64, max_bins: usize) -> Vec<HistogramBin> {
    let prices: Vec<f64> = view
        .iter()
        .filter_map(|r| r.price)
        .filter(|&p| p < upper_bound)
        .collect();

    let max_bins = max_bins.min(MAX_HISTOGRAM_BINS);
    if prices.is_empty() || max_bins == 0 {
        return Vec::new();
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: prices.len(),
        }];
    }

    let width = (max - min) / max_bins as f64;
    let mut counts = vec![0usize; max_bins];
    for price in &prices {
        let idx = ((price - min) / width) as usize;
        counts[idx.min(max_bins - 1)] += 1;
    }

    debug!(
        "Histogram: {} prices below {} in {} bins of width {:.2}",
        prices.len(),
        upper_bound,
        max_bins,
        width
    );

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == max_bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}
