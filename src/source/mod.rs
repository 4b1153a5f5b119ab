//! Dataset source - load the sales table once into normalized records

pub mod csv;
pub mod sqlite;

use crate::pipeline::normalize::normalize_all;
use crate::pipeline::types::SaleRecord;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load and normalize every sale from a SQLite database or a CSV export
pub async fn load_sales(path: &Path) -> Result<Vec<SaleRecord>> {
    if !path.exists() {
        return Err(anyhow::anyhow!("Sales data not found at {:?}", path));
    }

    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let raw = if is_csv {
        self::csv::read_sales(path)?
    } else {
        self::sqlite::read_sales(path).await?
    };

    let records = normalize_all(raw).context("Failed to normalize sales data")?;
    info!("Loaded {} sales from {:?}", records.len(), path);

    Ok(records)
}
