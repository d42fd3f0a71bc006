use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::watchlist::Watchlist;

// ---------------------------------------------------------------------------
// API response types (mirror types.rs shapes)
// ---------------------------------------------------------------------------

/// Every endpoint wraps its payload in `{ success, data, timestamp }` or
/// `{ success: false, error }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.unwrap_or_else(|| "empty response".to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: u32,
    pub name: String,
    pub symbol: String,
    pub sector: String,
    pub market_cap: Option<String>,
    pub pe: Option<f64>,
    pub dividend: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct BarResponse {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    #[serde(rename = "high52Week")]
    pub high_52_week: f64,
    #[serde(rename = "low52Week")]
    pub low_52_week: f64,
    pub avg_volume: u64,
    pub volume: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct HistoryResponse {
    pub symbol: String,
    pub historical: Vec<BarResponse>,
    pub stats: Option<StatsResponse>,
    pub last_updated: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub price: f64,
    pub confidence: f64,
    pub direction: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastsResponse {
    pub next_day: ForecastResponse,
    pub next_week: ForecastResponse,
    pub next_month: ForecastResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorsResponse {
    pub rsi: f64,
    pub macd: f64,
    pub bollinger: String,
    pub sentiment: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub symbol: String,
    pub current_price: f64,
    pub predictions: ForecastsResponse,
    pub technical_indicators: IndicatorsResponse,
    pub risk_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct NewsResponse {
    pub id: u32,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub timestamp: String,
    pub category: String,
    pub impact: String,
}

// ---------------------------------------------------------------------------
// View options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    OneYear,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::OneDay,
        TimeRange::OneWeek,
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::OneYear,
    ];

    pub fn days(self) -> u32 {
        match self {
            TimeRange::OneDay => 1,
            TimeRange::OneWeek => 7,
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::OneYear => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneDay => "1D",
            TimeRange::OneWeek => "1W",
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::OneYear => "1Y",
        }
    }

    /// Keys `1`..`5`.
    pub fn from_key(c: char) -> Option<Self> {
        let idx = c.to_digit(10)? as usize;
        Self::ALL.get(idx.checked_sub(1)?).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    NextDay,
    NextWeek,
    NextMonth,
}

impl Horizon {
    pub fn next(self) -> Self {
        match self {
            Horizon::NextDay => Horizon::NextWeek,
            Horizon::NextWeek => Horizon::NextMonth,
            Horizon::NextMonth => Horizon::NextDay,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Horizon::NextDay => "Next Day",
            Horizon::NextWeek => "Next Week",
            Horizon::NextMonth => "Next Month",
        }
    }

    pub fn pick(self, f: &ForecastsResponse) -> &ForecastResponse {
        match self {
            Horizon::NextDay => &f.next_day,
            Horizon::NextWeek => &f.next_week,
            Horizon::NextMonth => &f.next_month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiStatus {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiStatus {
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi > 70.0 {
            RsiStatus::Overbought
        } else if rsi < 30.0 {
            RsiStatus::Oversold
        } else {
            RsiStatus::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RsiStatus::Overbought => "Overbought",
            RsiStatus::Oversold => "Oversold",
            RsiStatus::Neutral => "Neutral",
        }
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub companies: Vec<CompanyResponse>,
    pub prices: HashMap<String, QuoteResponse>,
    pub news: Vec<NewsResponse>,
    pub history: Option<HistoryResponse>,
    pub prediction: Option<PredictionResponse>,
    pub watchlist: Watchlist,
    pub search: String,
    pub searching: bool,
    pub range: TimeRange,
    pub horizon: Horizon,
    pub last_refresh: std::time::Instant,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: String, watchlist: Watchlist) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            companies: Vec::new(),
            prices: HashMap::new(),
            news: Vec::new(),
            history: None,
            prediction: None,
            watchlist,
            search: String::new(),
            searching: false,
            range: TimeRange::OneMonth,
            horizon: Horizon::NextDay,
            last_refresh: std::time::Instant::now(),
            base_url,
        }
    }

    /// Companies matching the search box (name, symbol or sector, case-insensitive).
    pub fn visible_companies(&self) -> Vec<&CompanyResponse> {
        let needle = self.search.trim().to_lowercase();
        self.companies
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.symbol.to_lowercase().contains(&needle)
                    || c.sector.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn watched_companies(&self) -> Vec<&CompanyResponse> {
        self.companies
            .iter()
            .filter(|c| self.watchlist.contains(c.id))
            .collect()
    }

    /// Companies with a live quote, biggest absolute % move first.
    pub fn top_movers(&self, n: usize) -> Vec<(&CompanyResponse, QuoteResponse)> {
        let mut movers: Vec<_> = self
            .companies
            .iter()
            .filter_map(|c| self.prices.get(&c.symbol).map(|q| (c, *q)))
            .collect();
        movers.sort_by(|a, b| {
            b.1.change_percent
                .abs()
                .total_cmp(&a.1.change_percent.abs())
        });
        movers.truncate(n);
        movers
    }

    /// Load companies, news and the first price board. Called once at startup.
    pub async fn bootstrap(&mut self, client: &reqwest::Client) {
        let companies_url = format!("{}/api/companies", self.base_url);
        let news_url = format!("{}/api/news", self.base_url);

        let (companies, news) = tokio::join!(
            fetch::<Vec<CompanyResponse>>(client, &companies_url),
            fetch::<Vec<NewsResponse>>(client, &news_url),
        );

        match companies {
            Ok(c) => {
                self.companies = c;
                self.status = ConnectionStatus::Connected;
            }
            Err(e) => {
                self.status = ConnectionStatus::Error(e);
                return;
            }
        }
        if let Ok(n) = news {
            self.news = n;
        }
        self.refresh_prices(client).await;
    }

    /// Poll the price board. Keeps the previous board on failure.
    pub async fn refresh_prices(&mut self, client: &reqwest::Client) {
        let url = format!("{}/api/stock/prices", self.base_url);
        match fetch::<HashMap<String, QuoteResponse>>(client, &url).await {
            Ok(p) => {
                self.prices = p;
                self.status = ConnectionStatus::Connected;
                self.last_refresh = std::time::Instant::now();
            }
            Err(e) => self.status = ConnectionStatus::Error(e),
        }
    }

    /// Fetch history for `symbol` over the current range, then a prediction
    /// anchored on its latest close.
    pub async fn load_company(&mut self, client: &reqwest::Client, symbol: &str) {
        let url = format!("{}/api/stock/{}?days={}", self.base_url, symbol, self.range.days());
        let history = match fetch::<HistoryResponse>(client, &url).await {
            Ok(h) => h,
            Err(e) => {
                self.status = ConnectionStatus::Error(e);
                return;
            }
        };

        let prediction_url = match history.stats {
            Some(s) => format!("{}/api/stock/{}/prediction?price={}", self.base_url, symbol, s.current_price),
            None => format!("{}/api/stock/{}/prediction", self.base_url, symbol),
        };
        self.history = Some(history);

        match fetch::<PredictionResponse>(client, &prediction_url).await {
            Ok(p) => self.prediction = Some(p),
            Err(e) => {
                self.prediction = None;
                self.status = ConnectionStatus::Error(e);
            }
        }
    }

    /// Close prices as (index, close) points for the chart.
    pub fn chart_points(&self) -> Vec<(f64, f64)> {
        self.history
            .as_ref()
            .map(|h| {
                h.historical
                    .iter()
                    .enumerate()
                    .map(|(i, b)| (i as f64, b.close))
                    .collect()
            })
            .unwrap_or_default()
    }
}

async fn fetch<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, String> {
    let resp = client.get(url).send().await.map_err(|e| format!("{e}"))?;
    let envelope = resp
        .json::<Envelope<T>>()
        .await
        .map_err(|e| format!("parse error: {e}"))?;
    envelope.into_result()
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

pub fn format_price(v: f64) -> String {
    format!("${:.2}", v)
}

pub fn format_change(change: f64, pct: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{sign}{:.2} ({sign}{:.2}%)", change, pct)
}

/// 12_345_678 → "12.3M".
pub fn format_volume(v: u64) -> String {
    match v {
        v if v >= 1_000_000_000 => format!("{:.1}B", v as f64 / 1e9),
        v if v >= 1_000_000 => format!("{:.1}M", v as f64 / 1e6),
        v if v >= 1_000 => format!("{:.1}K", v as f64 / 1e3),
        v => v.to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
