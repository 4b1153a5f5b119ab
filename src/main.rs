use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use real_estate_dashboard::config::Config;
use real_estate_dashboard::pipeline::filter::{parse_validity_list, resolve_criteria};
use real_estate_dashboard::pipeline::table::table_rows;
use real_estate_dashboard::pipeline::{
    build_dashboard, filter, Dashboard, FilterCriteria, FilterDefaults, SaleRecord, TableRow,
    ViewSettings,
};
use real_estate_dashboard::source::load_sales;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

#[derive(Clone)]
struct AppState {
    // Loaded once at startup, read-only afterwards
    sales: Arc<Vec<SaleRecord>>,
    views: ViewSettings,
}

#[derive(Serialize, Deserialize)]
struct ApiResponse {
    message: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct FilterParams {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    /// Comma-separated validity values
    validity: Option<String>,
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🏠 Starting sales dashboard server...");

    let config = Config::from_env()?;

    info!("📦 Loading sales data...");
    let sales = load_sales(&config.sales_db_path).await?;
    info!("✅ Loaded {} sales", sales.len());

    let state = AppState {
        sales: Arc::new(sales),
        views: config.views,
    };

    let app = Router::new()
        .route("/", get(health_check))
        .route("/api/health", get(health_check))
        .route("/api/filters", get(get_filters))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/sales", get(get_sales))
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!("🚀 Server running on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Sales dashboard is running!".to_string(),
        status: "ok".to_string(),
    })
}

async fn get_filters(State(state): State<AppState>) -> Result<Json<FilterDefaults>, StatusCode> {
    FilterDefaults::from_records(&state.sales)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<Dashboard> {
    debug!("Dashboard request: {:?}", params);

    let criteria = criteria_for(&state.sales, &params);
    let mut views = state.views;
    if let Some(limit) = params.limit {
        views.table_limit = limit;
    }

    Json(build_dashboard(&state.sales, &criteria, &views))
}

async fn get_sales(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<Vec<TableRow>> {
    debug!("Sales request: {:?}", params);

    let criteria = criteria_for(&state.sales, &params);
    let view = filter(&state.sales, &criteria);
    let limit = params.limit.unwrap_or(state.views.table_limit);

    Json(table_rows(&view, limit))
}

fn criteria_for(sales: &[SaleRecord], params: &FilterParams) -> FilterCriteria {
    resolve_criteria(
        sales,
        params.start,
        params.end,
        params.validity.as_deref().map(parse_validity_list),
    )
}
