//! Dashboard assembly - runs every view over one filtered snapshot

use crate::pipeline::filter::filter;
use crate::pipeline::histogram::histogram;
use crate::pipeline::ranking::top_properties;
use crate::pipeline::summary::summarize;
use crate::pipeline::table::table_rows;
use crate::pipeline::trend::{monthly_average, year_month_grid, yoy_change};
use crate::pipeline::types::{Dashboard, FilterCriteria, SaleRecord, ViewSettings};
use tracing::info;

/// Filter the dataset and compute every derived view
/// Pure function - no side effects
pub fn build_dashboard(
    records: &[SaleRecord],
    criteria: &FilterCriteria,
    settings: &ViewSettings,
) -> Dashboard {
    let view = filter(records, criteria);
    info!(
        "Building dashboard for {} of {} sales ({} to {})",
        view.len(),
        records.len(),
        criteria.start.date_naive(),
        criteria.end.date_naive()
    );

    Dashboard {
        summary: summarize(&view),
        monthly_trend: monthly_average(&view),
        heatmap: year_month_grid(&view),
        top_properties: top_properties(&view, settings.top_n),
        price_histogram: histogram(
            &view,
            settings.histogram_upper_bound,
            settings.histogram_max_bins,
        ),
        yoy_change: yoy_change(&view),
        sales: table_rows(&view, settings.table_limit),
    }
}
