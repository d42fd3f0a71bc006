use std::collections::BTreeMap;

use rand::Rng;

use crate::config::QUOTE_JITTER;
use crate::generator::round2;
use crate::types::PriceQuote;

/// Base quote the price board jitters around: (symbol, price, change, change %).
pub const BASE_QUOTES: &[(&str, f64, f64, f64)] = &[
    ("AAPL", 178.25, 2.15, 1.22),
    ("MSFT", 342.87, -1.45, -0.42),
    ("AMZN", 127.74, 3.21, 2.58),
    ("GOOGL", 138.45, 1.87, 1.37),
    ("TSLA", 248.5, -5.23, -2.06),
    ("META", 298.58, 4.12, 1.4),
    ("NVDA", 421.13, 8.95, 2.17),
    ("BRK.B", 348.92, 0.85, 0.24),
    ("JNJ", 162.34, -0.67, -0.41),
    ("JPM", 154.78, 2.34, 1.53),
    ("PG", 147.89, 0.45, 0.31),
    ("V", 234.56, 1.78, 0.76),
];

/// One poll of the price board. Every base quote moves by up to ±1%; the move is
/// folded into the day's change. Values are rounded to cents.
pub fn jitter_quotes<R: Rng>(rng: &mut R) -> BTreeMap<String, PriceQuote> {
    BASE_QUOTES
        .iter()
        .map(|&(symbol, price, change, _)| (symbol.to_string(), jitter_quote(rng, price, change)))
        .collect()
}

fn jitter_quote<R: Rng>(rng: &mut R, price: f64, change: f64) -> PriceQuote {
    let variation = rng.gen_range(-QUOTE_JITTER..QUOTE_JITTER);
    let new_price = price * (1.0 + variation);
    let new_change = new_price - price + change;
    let new_change_percent = new_change / price * 100.0;

    PriceQuote {
        price: round2(new_price),
        change: round2(new_change),
        change_percent: round2(new_change_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_base_symbol_is_quoted() {
        let mut rng = StdRng::seed_from_u64(1);
        let quotes = jitter_quotes(&mut rng);
        assert_eq!(quotes.len(), BASE_QUOTES.len());
        for (symbol, ..) in BASE_QUOTES {
            assert!(quotes.contains_key(*symbol), "missing {symbol}");
        }
    }

    #[test]
    fn prices_stay_within_one_percent_of_base() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            let quotes = jitter_quotes(&mut rng);
            for &(symbol, base, ..) in BASE_QUOTES {
                let q = quotes[symbol];
                // ±1% plus half a cent of rounding
                assert!((q.price - base).abs() <= base * QUOTE_JITTER + 0.005, "{symbol}: {q:?}");
            }
        }
    }

    #[test]
    fn change_tracks_price_move() {
        let mut rng = StdRng::seed_from_u64(21);
        let quotes = jitter_quotes(&mut rng);
        for &(symbol, base, change, _) in BASE_QUOTES {
            let q = quotes[symbol];
            let expected_change = q.price - base + change;
            assert!((q.change - expected_change).abs() < 0.011, "{symbol}: {q:?}");
            let expected_pct = q.change / base * 100.0;
            assert!((q.change_percent - expected_pct).abs() < 0.011, "{symbol}: {q:?}");
        }
    }
}
