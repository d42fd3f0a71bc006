use rand::Rng;

use crate::types::{
    BollingerPosition, Direction, Forecast, Forecasts, PredictionReport, RiskLevel, Sentiment,
    TechnicalIndicators,
};

/// Mock forecast horizons: (price multiplier on the base move, confidence floor, confidence spread).
const NEXT_DAY: (f64, f64, f64) = (0.3, 75.0, 20.0);
const NEXT_WEEK: (f64, f64, f64) = (0.7, 65.0, 25.0);
const NEXT_MONTH: (f64, f64, f64) = (1.2, 55.0, 30.0);

/// Risk follows the next-month confidence: > 75 low, > 60 medium, else high.
pub fn risk_level(next_month_confidence: f64) -> RiskLevel {
    if next_month_confidence > 75.0 {
        RiskLevel::Low
    } else if next_month_confidence > 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Build the mock "AI" report for `symbol` around `current_price`.
///
/// A single base move in (-5%, +5%) drives all three horizons, so they always
/// agree on direction and grow with the horizon. Indicators are independent draws.
pub fn predict<R: Rng>(rng: &mut R, symbol: &str, current_price: f64) -> PredictionReport {
    let base_move = rng.gen_range(-0.05..0.05);
    let direction = if base_move > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    let mut forecast = |(scale, floor, spread): (f64, f64, f64)| Forecast {
        price: current_price * (1.0 + base_move * scale),
        confidence: floor + rng.gen::<f64>() * spread,
        direction,
    };
    let predictions = Forecasts {
        next_day: forecast(NEXT_DAY),
        next_week: forecast(NEXT_WEEK),
        next_month: forecast(NEXT_MONTH),
    };

    let technical_indicators = TechnicalIndicators {
        rsi: 30.0 + rng.gen::<f64>() * 40.0,
        macd: rng.gen_range(-1.0..1.0),
        bollinger: if rng.gen_bool(0.5) {
            BollingerPosition::Upper
        } else {
            BollingerPosition::Lower
        },
        sentiment: if rng.gen_bool(0.5) {
            Sentiment::Bullish
        } else {
            Sentiment::Bearish
        },
    };

    PredictionReport {
        symbol: symbol.to_string(),
        current_price,
        risk_level: risk_level(predictions.next_month.confidence),
        predictions,
        technical_indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn confidences_fall_in_their_bands() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let r = predict(&mut rng, "AAPL", 100.0);
            let p = r.predictions;
            assert!((75.0..95.0).contains(&p.next_day.confidence));
            assert!((65.0..90.0).contains(&p.next_week.confidence));
            assert!((55.0..85.0).contains(&p.next_month.confidence));
        }
    }

    #[test]
    fn horizons_agree_on_direction_and_scale() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let r = predict(&mut rng, "MSFT", 200.0);
            let p = r.predictions;
            let day = (p.next_day.price - 200.0).abs();
            let week = (p.next_week.price - 200.0).abs();
            let month = (p.next_month.price - 200.0).abs();
            assert!(day <= week && week <= month);
            assert!(month <= 200.0 * 0.05 * 1.2 + 1e-9);

            assert_eq!(p.next_day.direction, p.next_month.direction);
            match p.next_month.direction {
                Direction::Up => assert!(p.next_month.price > 200.0),
                Direction::Down => assert!(p.next_month.price <= 200.0),
            }
        }
    }

    #[test]
    fn indicators_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let t = predict(&mut rng, "TSLA", 50.0).technical_indicators;
            assert!((30.0..70.0).contains(&t.rsi));
            assert!((-1.0..1.0).contains(&t.macd));
        }
    }

    #[test]
    fn risk_follows_month_confidence() {
        assert_eq!(risk_level(80.0), RiskLevel::Low);
        assert_eq!(risk_level(75.0), RiskLevel::Medium);
        assert_eq!(risk_level(61.0), RiskLevel::Medium);
        assert_eq!(risk_level(60.0), RiskLevel::High);

        let mut rng = StdRng::seed_from_u64(6);
        let r = predict(&mut rng, "V", 10.0);
        assert_eq!(r.risk_level, risk_level(r.predictions.next_month.confidence));
    }

    #[test]
    fn report_echoes_inputs() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = predict(&mut rng, "JPM", 154.78);
        assert_eq!(r.symbol, "JPM");
        assert_eq!(r.current_price, 154.78);
    }
}
