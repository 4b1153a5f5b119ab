//! CSV export of the sales table

use crate::pipeline::types::RawSale;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Read raw sale rows from a CSV file with a header row
/// Expected columns: property_id, sale_date, price, tax_year, sale_validity
pub fn read_sales(path: &Path) -> Result<Vec<RawSale>> {
    info!("Reading sales CSV from {:?}", path);

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<RawSale>().enumerate() {
        // Line 1 is the header
        let row = result.with_context(|| format!("Malformed sales row at line {}", idx + 2))?;
        rows.push(row);
    }

    debug!("Read {} raw rows from CSV", rows.len());

    Ok(rows)
}
