//! Configuration loaded from environment variables

use crate::pipeline::types::{ViewSettings, MAX_HISTOGRAM_BINS};
use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub sales_db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub views: ViewSettings,
}

impl Config {
    /// Read configuration, loading a `.env` file first when present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ViewSettings::default();

        let histogram_max_bins =
            parse_or(&lookup, "HISTOGRAM_MAX_BINS", defaults.histogram_max_bins)?;
        if histogram_max_bins > MAX_HISTOGRAM_BINS {
            bail!(
                "HISTOGRAM_MAX_BINS must be at most {}, got {}",
                MAX_HISTOGRAM_BINS,
                histogram_max_bins
            );
        }

        Ok(Config {
            sales_db_path: lookup("SALES_DB_PATH")
                .unwrap_or_else(|| "fairfax_real_estate_sales.db".to_string())
                .into(),

            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3001)))?,

            views: ViewSettings {
                top_n: parse_or(&lookup, "TOP_N", defaults.top_n)?,
                histogram_upper_bound: parse_or(
                    &lookup,
                    "HISTOGRAM_UPPER_BOUND",
                    defaults.histogram_upper_bound,
                )?,
                histogram_max_bins,
                table_limit: parse_or(&lookup, "TABLE_LIMIT", defaults.table_limit)?,
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got {:?}", key, value)),
        None => Ok(default),
    }
}
