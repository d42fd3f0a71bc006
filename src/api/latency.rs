//! In-memory latency histograms for the synthetic data paths.
//! Handlers time generation only; the simulated network delay is excluded.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use hdrhistogram::Histogram;
use serde::Serialize;

/// Which generator a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    History,
    Quotes,
    Prediction,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::History, Operation::Quotes, Operation::Prediction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::History => "history",
            Operation::Quotes => "quotes",
            Operation::Prediction => "prediction",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: u64,
}

/// Values stored in microseconds. Tracks 1us to 100s, 3 significant figures.
#[derive(Default)]
pub struct LatencyStats {
    inner: Mutex<HashMap<Operation, Histogram<u64>>>,
}

impl LatencyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, op: Operation, d: Duration) {
        let us = d.as_micros().clamp(1, 100_000_000) as u64;
        let Ok(mut map) = self.inner.lock() else {
            return;
        };
        if !map.contains_key(&op) {
            match Histogram::new_with_bounds(1, 100_000_000, 3) {
                Ok(h) => {
                    map.insert(op, h);
                }
                Err(e) => {
                    tracing::warn!("latency histogram unavailable: {e}");
                    return;
                }
            }
        }
        if let Some(h) = map.get_mut(&op) {
            let _ = h.record(us);
        }
    }

    pub fn summary(&self, op: Operation) -> LatencySummary {
        let Ok(map) = self.inner.lock() else {
            return LatencySummary::default();
        };
        match map.get(&op) {
            Some(h) if h.len() > 0 => {
                let ms = |q: f64| Some(h.value_at_quantile(q) as f64 / 1000.0);
                LatencySummary {
                    p50_ms: ms(0.5),
                    p95_ms: ms(0.95),
                    p99_ms: ms(0.99),
                    sample_count: h.len(),
                }
            }
            _ => LatencySummary::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_has_no_percentiles() {
        let stats = LatencyStats::new();
        let s = stats.summary(Operation::History);
        assert_eq!(s.sample_count, 0);
        assert!(s.p50_ms.is_none());
    }

    #[test]
    fn operations_are_tracked_separately() {
        let stats = LatencyStats::new();
        for ms in 1..=100 {
            stats.record(Operation::History, Duration::from_millis(ms));
        }
        stats.record(Operation::Quotes, Duration::from_micros(250));

        let history = stats.summary(Operation::History);
        assert_eq!(history.sample_count, 100);
        let p50 = history.p50_ms.unwrap();
        assert!((49.0..=51.0).contains(&p50), "p50={p50}");
        assert!(history.p99_ms.unwrap() >= history.p95_ms.unwrap());

        assert_eq!(stats.summary(Operation::Quotes).sample_count, 1);
        assert_eq!(stats.summary(Operation::Prediction).sample_count, 0);
    }

    #[test]
    fn sub_microsecond_samples_still_count() {
        let stats = LatencyStats::new();
        stats.record(Operation::Prediction, Duration::from_nanos(10));
        assert_eq!(stats.summary(Operation::Prediction).sample_count, 1);
    }
}
