use crate::types::{DailyBar, SeriesStats};

/// Summarise a series. Returns None for fewer than two bars, since the
/// day-over-day change needs a previous close.
pub fn derive_stats(bars: &[DailyBar]) -> Option<SeriesStats> {
    let [.., previous, latest] = bars else {
        return None;
    };

    let change = latest.close - previous.close;
    let change_percent = change / previous.close * 100.0;

    let high_52_week = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low_52_week = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

    // Integer division floors, matching the "avg volume, floored" contract.
    let total_volume: u64 = bars.iter().map(|b| b.volume).sum();
    let avg_volume = total_volume / bars.len() as u64;

    Some(SeriesStats {
        current_price: latest.close,
        change,
        change_percent,
        high_52_week,
        low_52_week,
        avg_volume,
        volume: latest.volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_series;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bar(day: u32, high: f64, low: f64, close: f64, volume: u64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn empty_series_has_no_stats() {
        assert!(derive_stats(&[]).is_none());
    }

    #[test]
    fn single_bar_has_no_stats() {
        assert!(derive_stats(&[bar(1, 101.0, 99.0, 100.0, 1_000_000)]).is_none());
    }

    #[test]
    fn two_bar_change() {
        let bars = [
            bar(1, 101.0, 99.0, 100.0, 2_000_000),
            bar(2, 106.0, 104.0, 105.0, 3_000_000),
        ];
        let stats = derive_stats(&bars).unwrap();
        assert_eq!(stats.current_price, 105.0);
        assert_eq!(stats.change, 5.0);
        assert!((stats.change_percent - 5.0).abs() < 1e-9);
        assert_eq!(stats.volume, 3_000_000);
    }

    #[test]
    fn negative_change() {
        let bars = [
            bar(1, 201.0, 199.0, 200.0, 1_000_000),
            bar(2, 191.0, 189.0, 190.0, 1_000_000),
        ];
        let stats = derive_stats(&bars).unwrap();
        assert_eq!(stats.change, -10.0);
        assert!((stats.change_percent + 5.0).abs() < 1e-9);
    }

    #[test]
    fn range_extremes_cover_whole_window() {
        let bars = [
            bar(1, 120.0, 95.0, 100.0, 1_000_000),
            bar(2, 110.0, 80.0, 90.0, 1_000_000),
            bar(3, 130.0, 99.0, 101.0, 1_000_000),
        ];
        let stats = derive_stats(&bars).unwrap();
        assert_eq!(stats.high_52_week, 130.0);
        assert_eq!(stats.low_52_week, 80.0);
    }

    #[test]
    fn avg_volume_is_floored() {
        let bars = [
            bar(1, 1.0, 1.0, 1.0, 1_000_000),
            bar(2, 1.0, 1.0, 1.0, 1_000_001),
            bar(3, 1.0, 1.0, 1.0, 1_000_001),
        ];
        // 3_000_002 / 3 = 1_000_000.67
        assert_eq!(derive_stats(&bars).unwrap().avg_volume, 1_000_000);
    }

    #[test]
    fn generated_series_stats_agree_with_bars() {
        let mut rng = StdRng::seed_from_u64(17);
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let bars = generate_series(&mut rng, 30, today).unwrap();
        let stats = derive_stats(&bars).unwrap();

        let n = bars.len();
        assert_eq!(stats.current_price, bars[n - 1].close);
        assert_eq!(stats.change, bars[n - 1].close - bars[n - 2].close);
        assert!(bars.iter().all(|b| b.high <= stats.high_52_week));
        assert!(bars.iter().all(|b| b.low >= stats.low_52_week));
        assert!(bars.iter().any(|b| b.high == stats.high_52_week));
        assert!(bars.iter().any(|b| b.low == stats.low_52_week));
        assert!((1_000_000..11_000_000).contains(&stats.avg_volume));
    }
}
