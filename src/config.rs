use crate::error::{AppError, Result};

/// History length used when the caller omits `days` or sends something non-numeric.
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

/// Upper bound on `days` accepted from a request (MAX_HISTORY_DAYS overrides).
/// Anything above is clamped so a single request can't force an unbounded allocation.
pub const MAX_HISTORY_DAYS: i64 = 3650;

/// Largest ceiling an operator may configure (about a century of daily bars).
pub const MAX_HISTORY_DAYS_LIMIT: i64 = 36_500;

/// Simulated network latency for the company list endpoint (milliseconds).
pub const COMPANIES_DELAY_MS: u64 = 100;

/// Simulated network latency for the stock history endpoint (milliseconds).
pub const STOCK_DELAY_MS: u64 = 200;

/// Synthetic series shape.
pub mod series {
    /// Base price is drawn uniformly from [BASE_PRICE_MIN, BASE_PRICE_MAX).
    pub const BASE_PRICE_MIN: f64 = 50.0;
    pub const BASE_PRICE_MAX: f64 = 250.0;
    /// Daily return is drawn from (-MAX_DAILY_RETURN, +MAX_DAILY_RETURN).
    pub const MAX_DAILY_RETURN: f64 = 0.05;
    /// High/low are at most this fraction away from the open.
    pub const MAX_INTRADAY_RANGE: f64 = 0.05;
    pub const VOLUME_MIN: u64 = 1_000_000;
    pub const VOLUME_MAX: u64 = 11_000_000;
    /// Running price floor. Keeps rounded prices strictly positive on long walks.
    pub const MIN_PRICE: f64 = 0.01;
}

/// Max relative move applied to a base quote on each price board poll.
pub const QUOTE_JITTER: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_port: u16,
    /// Sleep before answering, mimicking a remote data source (SIMULATE_LATENCY)
    pub simulate_latency: bool,
    /// Ceiling applied to the `days` query parameter (MAX_HISTORY_DAYS)
    pub max_history_days: i64,
    /// Fixed RNG seed for reproducible runs (RNG_SEED). Entropy-seeded when unset.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            api_port: var("API_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            simulate_latency: parse_bool(&var("SIMULATE_LATENCY").unwrap_or_else(|| "true".to_string()))
                .ok_or_else(|| AppError::Config("SIMULATE_LATENCY must be true or false".to_string()))?,
            max_history_days: var("MAX_HISTORY_DAYS")
                .unwrap_or_else(|| MAX_HISTORY_DAYS.to_string())
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|d| (1..=MAX_HISTORY_DAYS_LIMIT).contains(d))
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "MAX_HISTORY_DAYS must be an integer between 1 and {MAX_HISTORY_DAYS_LIMIT}"
                    ))
                })?,
            rng_seed: match var("RNG_SEED") {
                Some(raw) if !raw.trim().is_empty() => Some(
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| AppError::Config("RNG_SEED must be an unsigned integer".to_string()))?,
                ),
                _ => None,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            api_port: 3000,
            simulate_latency: true,
            max_history_days: MAX_HISTORY_DAYS,
            rng_seed: None,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
