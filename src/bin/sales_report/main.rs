//! Sales report - prints the dashboard views for one set of criteria as JSON
//!
//! Usage: sales-report [START END [VALIDITY[,VALIDITY...]]]

use anyhow::{Context, Result};
use chrono::NaiveDate;
use real_estate_dashboard::config::Config;
use real_estate_dashboard::pipeline::build_dashboard;
use real_estate_dashboard::pipeline::filter::{parse_validity_list, resolve_criteria};
use real_estate_dashboard::source::load_sales;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let args: Vec<String> = env::args().skip(1).collect();
    let start = args.first().map(|s| parse_date(s)).transpose()?;
    let end = args.get(1).map(|s| parse_date(s)).transpose()?;
    let validity = args.get(2).map(|s| parse_validity_list(s));

    let sales = load_sales(&config.sales_db_path).await?;

    let criteria = resolve_criteria(&sales, start, end, validity);
    info!(
        "Reporting {} to {} for {:?}",
        criteria.start.date_naive(),
        criteria.end.date_naive(),
        criteria.validity
    );

    let dashboard = build_dashboard(&sales, &criteria, &config.views);
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Dates must be YYYY-MM-DD, got {:?}", value))
}
