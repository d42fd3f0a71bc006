use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, Query, Request, State},
    http::Uri,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::health::HealthState;
use crate::api::latency::{LatencyStats, LatencySummary, Operation};
use crate::catalog;
use crate::config::{Config, COMPANIES_DELAY_MS, DEFAULT_HISTORY_DAYS, STOCK_DELAY_MS};
use crate::error::{AppError, Result};
use crate::generator::derive_stats;
use crate::state::{CompanyStore, MarketSimulator};
use crate::types::{ApiResponse, Company, NewsItem, PredictionReport, PriceQuote, StockHistory};

#[derive(Clone)]
pub struct ApiState {
    pub companies: Arc<CompanyStore>,
    pub simulator: Arc<MarketSimulator>,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
    pub cfg: Config,
}

impl ApiState {
    pub fn new(cfg: Config, companies: Arc<CompanyStore>) -> Self {
        Self {
            simulator: Arc::new(MarketSimulator::new(cfg.rng_seed)),
            companies,
            health: Arc::new(HealthState::new()),
            latency: Arc::new(LatencyStats::new()),
            cfg,
        }
    }

    async fn simulate_latency(&self, ms: u64) {
        if self.cfg.simulate_latency {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/companies", get(get_companies))
        .route("/api/companies/:symbol", get(get_company))
        .route("/api/stock/prices", get(get_prices))
        .route("/api/stock/:symbol", get(get_stock))
        .route("/api/stock/:symbol/prediction", get(get_prediction))
        .route("/api/news", get(get_news))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CompaniesQuery {
    pub search: Option<String>,
}

/// Raw strings so a malformed value still gets the error envelope
/// rather than axum's plain-text rejection.
#[derive(Deserialize)]
pub struct StockQuery {
    pub days: Option<String>,
}

#[derive(Deserialize)]
pub struct PredictionQuery {
    pub price: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub requests_served: u64,
    pub series_generated: u64,
    pub bars_generated: u64,
    pub companies: usize,
}

pub type LatencyResponse = BTreeMap<&'static str, LatencySummary>;

// ---------------------------------------------------------------------------
// Request parameter handling
// ---------------------------------------------------------------------------

/// Read `days` the way a lenient integer parser would: leading whitespace and
/// sign, then as many digits as there are ("45abc" is 45). Missing or
/// non-numeric input falls back to the default window.
pub fn parse_days(raw: Option<&str>) -> i64 {
    raw.and_then(parse_int_prefix).unwrap_or(DEFAULT_HISTORY_DAYS)
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    // Only overflow can fail here; saturate so the ceiling clamp applies.
    let n = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -n } else { n })
}

/// Reject negative windows, clamp oversized ones to `max`.
pub fn resolve_days(days: i64, max: i64) -> Result<u32> {
    if days < 0 {
        return Err(AppError::InvalidRequest(format!(
            "days must be zero or positive, got {days}"
        )));
    }
    if days > max {
        warn!(requested = days, max, "days above ceiling, clamping");
    }
    u32::try_from(days.min(max))
        .map_err(|_| AppError::InvalidRequest(format!("days out of range: {days}")))
}

fn parse_price(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| AppError::InvalidRequest(format!("price must be a positive number, got {raw:?}")))
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

async fn track_requests(State(state): State<ApiState>, req: Request, next: Next) -> Response {
    state.health.inc_requests_served();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let resp = next.run(req).await;

    debug!(
        %method,
        path = %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request served"
    );
    resp
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_companies(
    State(state): State<ApiState>,
    Query(params): Query<CompaniesQuery>,
) -> Result<Json<ApiResponse<Vec<Company>>>> {
    state.simulate_latency(COMPANIES_DELAY_MS).await;

    let companies = match params.search.as_deref() {
        Some(term) => state.companies.search(term),
        None => state.companies.list(),
    };
    Ok(Json(ApiResponse::ok(companies)))
}

async fn get_company(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Company>>> {
    let company = state
        .companies
        .get(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("company {symbol}")))?;
    Ok(Json(ApiResponse::ok(company)))
}

async fn get_prices(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<BTreeMap<String, PriceQuote>>>> {
    let started = Instant::now();
    let quotes = state.simulator.quotes()?;
    state.latency.record(Operation::Quotes, started.elapsed());
    Ok(Json(ApiResponse::ok(quotes)))
}

async fn get_stock(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
    Query(params): Query<StockQuery>,
) -> Result<Json<ApiResponse<StockHistory>>> {
    let days = resolve_days(parse_days(params.days.as_deref()), state.cfg.max_history_days)?;

    state.simulate_latency(STOCK_DELAY_MS).await;

    let started = Instant::now();
    let historical = state.simulator.history(days)?;
    let stats = derive_stats(&historical);
    state.latency.record(Operation::History, started.elapsed());
    state.health.record_series(historical.len());

    debug!(symbol = %symbol, days, bars = historical.len(), "generated history");

    Ok(Json(ApiResponse::ok(StockHistory {
        symbol,
        historical,
        stats,
        last_updated: Utc::now(),
    })))
}

async fn get_prediction(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
    Query(params): Query<PredictionQuery>,
) -> Result<Json<ApiResponse<PredictionReport>>> {
    let started = Instant::now();

    let current_price = match params.price.as_deref() {
        Some(raw) => parse_price(raw)?,
        None => {
            let bars = state.simulator.history(DEFAULT_HISTORY_DAYS as u32)?;
            state.health.record_series(bars.len());
            derive_stats(&bars)
                .map(|s| s.current_price)
                .ok_or_else(|| AppError::Internal("default series too short".to_string()))?
        }
    };

    let report = state.simulator.predict(&symbol, current_price)?;
    state.latency.record(Operation::Prediction, started.elapsed());
    Ok(Json(ApiResponse::ok(report)))
}

async fn get_news() -> Json<ApiResponse<Vec<NewsItem>>> {
    Json(ApiResponse::ok(catalog::market_news()))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.health.uptime_secs(),
        requests_served: state.health.requests_served(),
        series_generated: state.health.series_generated(),
        bars_generated: state.health.bars_generated(),
        companies: state.companies.len(),
    })
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    Json(
        Operation::ALL
            .iter()
            .map(|op| (op.as_str(), state.latency.summary(*op)))
            .collect(),
    )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
