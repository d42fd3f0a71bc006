//! Shared counters for the /health endpoint.
//! Updated by the request middleware and the stock handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct HealthState {
    started_at: Instant,
    requests_served: AtomicU64,
    series_generated: AtomicU64,
    bars_generated: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            requests_served: AtomicU64::new(0),
            series_generated: AtomicU64::new(0),
            bars_generated: AtomicU64::new(0),
        }
    }

    pub fn inc_requests_served(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one generated series of `bars` bars.
    pub fn record_series(&self, bars: usize) {
        self.series_generated.fetch_add(1, Ordering::Relaxed);
        self.bars_generated.fetch_add(bars as u64, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    pub fn series_generated(&self) -> u64 {
        self.series_generated.load(Ordering::Relaxed)
    }

    pub fn bars_generated(&self) -> u64 {
        self.bars_generated.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let h = HealthState::new();
        h.inc_requests_served();
        h.inc_requests_served();
        h.record_series(31);
        h.record_series(8);
        assert_eq!(h.requests_served(), 2);
        assert_eq!(h.series_generated(), 2);
        assert_eq!(h.bars_generated(), 39);
    }
}
