use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: u32,
    pub name: String,
    pub symbol: String,
    pub sector: String,
    /// Display string, e.g. "$2.8T".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend: Option<f64>,
}

// ---------------------------------------------------------------------------
// Price series
// ---------------------------------------------------------------------------

/// One synthetic calendar day. Weekends are included, there is no trading calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Summary of a series. The "52 week" names are kept on the wire even though
/// they cover whatever window was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
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

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockHistory {
    pub symbol: String,
    pub historical: Vec<DailyBar>,
    /// None when the series is too short to compute a day-over-day change.
    pub stats: Option<SeriesStats>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BollingerPosition {
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub price: f64,
    /// Percent, 0-100.
    pub confidence: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecasts {
    pub next_day: Forecast,
    pub next_week: Forecast,
    pub next_month: Forecast,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd: f64,
    pub bollinger: BollingerPosition,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub symbol: String,
    pub current_price: f64,
    pub predictions: Forecasts,
    pub technical_indicators: TechnicalIndicators,
    pub risk_level: RiskLevel,
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Market,
    Company,
    Economic,
    Tech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub id: u32,
    pub title: &'static str,
    pub summary: &'static str,
    pub source: &'static str,
    /// Relative display time, e.g. "2 hours ago".
    pub timestamp: &'static str,
    pub category: NewsCategory,
    pub impact: Impact,
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Success wrapper shared by every handler. Failures go through
/// `AppError`'s `IntoResponse` instead.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_keep_52_week_wire_names() {
        let stats = SeriesStats {
            current_price: 105.0,
            change: 5.0,
            change_percent: 5.0,
            high_52_week: 110.0,
            low_52_week: 95.0,
            avg_volume: 2_000_000,
            volume: 1_500_000,
        };
        let v = serde_json::to_value(&stats).unwrap();
        assert_eq!(v["currentPrice"], 105.0);
        assert_eq!(v["changePercent"], 5.0);
        assert_eq!(v["high52Week"], 110.0);
        assert_eq!(v["low52Week"], 95.0);
        assert_eq!(v["avgVolume"], 2_000_000);
    }

    #[test]
    fn bar_date_serializes_without_time() {
        let bar = DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            open: 10.0,
            high: 11.0,
            low: 9.5,
            close: 10.5,
            volume: 1_000_000,
        };
        let v = serde_json::to_value(&bar).unwrap();
        assert_eq!(v["date"], "2024-03-09");
    }

    #[test]
    fn company_omits_missing_optionals() {
        let c = Company {
            id: 1,
            name: "Acme".into(),
            symbol: "ACME".into(),
            sector: "Industrials".into(),
            market_cap: None,
            pe: Some(12.0),
            dividend: None,
        };
        let v = serde_json::to_value(&c).unwrap();
        assert!(v.get("marketCap").is_none());
        assert_eq!(v["pe"], 12.0);
    }

    #[test]
    fn envelope_shape() {
        let v = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"], serde_json::json!([1, 2]));
        assert!(v["timestamp"].is_string());
    }
}
