use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{AppError, Result};
use crate::generator;
use crate::types::{DailyBar, PredictionReport, PriceQuote};

/// Owns the random source behind every synthetic response.
///
/// The lock is only held for the synchronous generation call, never across an await.
pub struct MarketSimulator {
    rng: Mutex<StdRng>,
}

impl MarketSimulator {
    /// Fixed seed for reproducible runs, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng: Mutex::new(rng) }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::Internal("random source lock poisoned".to_string()))?;
        Ok(f(&mut *rng))
    }

    /// `days + 1` bars ending today (UTC).
    pub fn history(&self, days: u32) -> Result<Vec<DailyBar>> {
        self.history_until(days, Utc::now().date_naive())
    }

    pub fn history_until(&self, days: u32, today: NaiveDate) -> Result<Vec<DailyBar>> {
        self.with_rng(|rng| generator::generate_series(rng, days, today))?
            .ok_or_else(|| {
                AppError::InvalidRequest(format!(
                    "days={days} reaches before the earliest supported date"
                ))
            })
    }

    pub fn quotes(&self) -> Result<BTreeMap<String, PriceQuote>> {
        self.with_rng(|rng| generator::jitter_quotes(rng))
    }

    pub fn predict(&self, symbol: &str, current_price: f64) -> Result<PredictionReport> {
        self.with_rng(|rng| generator::predict(rng, symbol, current_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_simulators_agree() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let a = MarketSimulator::new(Some(5)).history_until(10, today).unwrap();
        let b = MarketSimulator::new(Some(5)).history_until(10, today).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn consecutive_calls_draw_fresh_numbers() {
        let sim = MarketSimulator::new(Some(5));
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let first = sim.history_until(10, today).unwrap();
        let second = sim.history_until(10, today).unwrap();
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }

    #[test]
    fn unseeded_history_ends_today() {
        let sim = MarketSimulator::new(None);
        let bars = sim.history(0).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, Utc::now().date_naive());
    }

    #[test]
    fn out_of_range_window_is_rejected_and_source_stays_usable() {
        let sim = MarketSimulator::new(Some(9));
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let err = sim.history_until(97_000_000, today).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let bars = sim.history_until(5, today).unwrap();
        assert_eq!(bars.len(), 6);
        assert!(sim.quotes().is_ok());
    }
}
