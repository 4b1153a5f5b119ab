//! Core data types for the aggregation pipeline
//! Pure data structures with no behavior

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Validity assigned to sales whose classification is missing
pub const UNKNOWN_VALIDITY: &str = "UNKNOWN";

/// Validity selected by default when the dataset contains it
pub const DEFAULT_VALIDITY: &str = "VALID";

/// Upper limit on histogram buckets
pub const MAX_HISTOGRAM_BINS: usize = 1_000;

/// Sale row as read from the store, before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawSale {
    pub property_id: String,
    pub sale_date: String,
    pub price: Option<f64>,
    pub tax_year: Option<i32>,
    pub sale_validity: Option<String>,
}

/// Normalized sale transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub property_id: String,
    pub sale_date: DateTime<Utc>,
    /// `None` when the source has no price; such sales are counted but not priced
    pub price: Option<f64>,
    pub tax_year: Option<i32>,
    pub sale_validity: String,
}

/// Errors raised while turning raw rows into sale records
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("unparseable sale_date {value:?} for property {property_id}")]
    InvalidSaleDate { property_id: String, value: String },
}

/// Filter criteria for one pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub validity: BTreeSet<String>,
}

/// Sidebar defaults derived from the loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDefaults {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub validity_options: Vec<String>,
    pub default_validity: Vec<String>,
}

/// KPI summary over a filtered view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total_volume: f64,
    /// `None` when no sale in the view has a price
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    /// Calendar month formatted as `YYYY-MM`
    pub period: String,
    pub year: i32,
    pub month: u32,
    /// `None` when no sale in the period has a price
    pub average_price: Option<f64>,
    pub sale_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub year: i32,
    pub month: u32,
    /// `None` when no sale in the period has a price
    pub average_price: Option<f64>,
    pub sale_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFrequency {
    pub property_id: String,
    pub sale_count: usize,
}

/// Equal-width price bucket; `upper` is exclusive except for the last bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Yearly average; years without any priced sale are left out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearChange {
    pub year: i32,
    pub average_price: f64,
    /// `None` for the first year or when the prior average is zero
    pub pct_change: Option<f64>,
}

/// Projection of a sale for the tabular listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub sale_date: DateTime<Utc>,
    pub property_id: String,
    pub price: Option<f64>,
    pub tax_year: Option<i32>,
    pub sale_validity: String,
}

/// Tunables for the derived views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub top_n: usize,
    pub histogram_upper_bound: f64,
    pub histogram_max_bins: usize,
    pub table_limit: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            top_n: 10,
            histogram_upper_bound: 1_500_000.0,
            histogram_max_bins: 50,
            table_limit: 100,
        }
    }
}

/// Every derived view for one set of criteria
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub monthly_trend: Vec<MonthlyAverage>,
    pub heatmap: Vec<HeatmapCell>,
    pub top_properties: Vec<PropertyFrequency>,
    pub price_histogram: Vec<HistogramBin>,
    pub yoy_change: Vec<YearChange>,
    pub sales: Vec<TableRow>,
}
