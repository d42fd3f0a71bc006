use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::config::series::{
    BASE_PRICE_MAX, BASE_PRICE_MIN, MAX_DAILY_RETURN, MAX_INTRADAY_RANGE, MIN_PRICE, VOLUME_MAX,
    VOLUME_MIN,
};
use crate::generator::round2;
use crate::types::DailyBar;

/// Generate `days + 1` daily bars ending on `today`, oldest first.
///
/// The walk starts from a base price in [50, 250) and applies a uniform daily
/// return in (-5%, +5%) to get each open. High and low sit up to 5% either side
/// of the open and the close lands uniformly between them, so
/// `low <= open <= high` and `low <= close <= high` hold for every bar, before
/// and after rounding. The rounded close seeds the next day.
///
/// All randomness comes from `rng`; the same seed and `today` give the same series.
/// Returns None, without drawing from `rng`, when the window would start before
/// the earliest representable date.
pub fn generate_series<R: Rng>(rng: &mut R, days: u32, today: NaiveDate) -> Option<Vec<DailyBar>> {
    let start = window_start(today, days)?;
    let mut bars = Vec::with_capacity(days as usize + 1);
    let mut price = rng.gen_range(BASE_PRICE_MIN..BASE_PRICE_MAX);

    for date in start.iter_days().take(days as usize + 1) {
        let daily_return = rng.gen_range(-MAX_DAILY_RETURN..MAX_DAILY_RETURN);
        let open = (price * (1.0 + daily_return)).max(MIN_PRICE);
        let high = open * (1.0 + rng.gen_range(0.0..MAX_INTRADAY_RANGE));
        let low = open * (1.0 - rng.gen_range(0.0..MAX_INTRADAY_RANGE));
        let close = low + rng.gen::<f64>() * (high - low);
        let volume = rng.gen_range(VOLUME_MIN..VOLUME_MAX);

        let bar = DailyBar {
            date,
            open: round2(open),
            high: round2(high),
            low: round2(low),
            close: round2(close),
            volume,
        };
        price = bar.close;
        bars.push(bar);
    }

    Some(bars)
}

/// First date of a `days + 1` bar window ending on `today`.
pub fn window_start(today: NaiveDate, days: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(days)))
}
