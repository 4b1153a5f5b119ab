//! Normalize functions - transform raw rows into SaleRecord structs

use crate::pipeline::types::{PipelineError, RawSale, SaleRecord, UNKNOWN_VALIDITY};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info};

/// Zone-aware layouts, converted to UTC
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive layouts, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Canonical form of a sale validity flag
/// Pure function - no side effects
pub fn canonical_validity(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_uppercase(),
        _ => UNKNOWN_VALIDITY.to_string(),
    }
}

/// Parse a sale timestamp into UTC
pub fn parse_sale_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalize a single raw row
pub fn normalize_sale(raw: RawSale) -> Result<SaleRecord, PipelineError> {
    let sale_date =
        parse_sale_date(&raw.sale_date).ok_or_else(|| PipelineError::InvalidSaleDate {
            property_id: raw.property_id.clone(),
            value: raw.sale_date.clone(),
        })?;

    let sale_validity = canonical_validity(raw.sale_validity.as_deref());

    Ok(SaleRecord {
        property_id: raw.property_id,
        sale_date,
        price: raw.price,
        tax_year: raw.tax_year,
        sale_validity,
    })
}

/// Normalize every raw row, failing on the first bad one
pub fn normalize_all(rows: Vec<RawSale>) -> Result<Vec<SaleRecord>, PipelineError> {
    let total = rows.len();
    let records = rows
        .into_iter()
        .map(normalize_sale)
        .collect::<Result<Vec<_>, _>>()?;

    let unknown = records
        .iter()
        .filter(|r| r.sale_validity == UNKNOWN_VALIDITY)
        .count();
    let unpriced = records.iter().filter(|r| r.price.is_none()).count();
    debug!(
        "{} records had no validity classification, {} had no price",
        unknown, unpriced
    );
    info!("Normalized {} of {} raw sales", records.len(), total);

    Ok(records)
}
