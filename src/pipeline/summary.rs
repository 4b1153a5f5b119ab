//! KPI summary - count, volume and average price of the filtered sales

use crate::pipeline::filter::FilteredView;
use crate::pipeline::types::Summary;
use tracing::debug;

/// Summarize a filtered view
/// Every sale counts; only priced sales contribute to volume and average
/// Pure function - no side effects
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let count = view.len();
    let prices: Vec<f64> = view.iter().filter_map(|r| r.price).collect();
    let total_volume: f64 = prices.iter().sum();

    let average_price = if prices.is_empty() {
        None
    } else {
        Some(total_volume / prices.len() as f64)
    };

    debug!(
        "Summary: {} sales, volume {:.0}, average {:?}",
        count, total_volume, average_price
    );

    Summary {
        count,
        total_volume,
        average_price,
    }
}
