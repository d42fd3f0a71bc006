//! Synthetic market data: price series, summary stats, the live price board
//! and the mock prediction panel. Everything here is pure; randomness is passed in.

pub mod prediction;
pub mod quotes;
pub mod series;
pub mod stats;

pub use prediction::predict;
pub use quotes::jitter_quotes;
pub use series::generate_series;
pub use stats::derive_stats;

/// Round to cents.
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn round2_rounds_half_up_for_prices() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(178.254), 178.25);
        assert_eq!(round2(99.999), 100.0);
    }
}
