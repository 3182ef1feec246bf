//! Mean-reversion deal detection, momentum and volatility indicators

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::{
    errors::{AnalysisError, AnalysisResult},
    types::{HistoricSignal, PricePoint},
    utils::{clamp_score, from_f64_or_zero, in_range},
};
use super::{price_range, PriceWindow};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoricThresholds {
    /// Current price must be at or below this fraction of the 90-day mean.
    pub reversion_threshold: Decimal,
    pub min_velocity: Decimal,
    pub max_dominance_pct: Decimal,
    pub max_oos_pct: Decimal,
    pub min_observations: usize,
    pub window_days: i64,
}

impl Default for HistoricThresholds {
    fn default() -> Self {
        Self {
            reversion_threshold: dec!(0.90),
            min_velocity: dec!(40),
            max_dominance_pct: dec!(80),
            max_oos_pct: dec!(30),
            min_observations: 3,
            window_days: 90,
        }
    }
}

/// What to do when a series is too short for the reversion window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryPolicy {
    #[default]
    TreatAsNoDeal,
    Propagate,
}

impl FromStr for HistoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "treatasnodeal" | "nodeal" | "skip" => Ok(HistoryPolicy::TreatAsNoDeal),
            "propagate" | "fail" => Ok(HistoryPolicy::Propagate),
            other => Err(format!("unknown history policy '{}'", other)),
        }
    }
}

// Missing buy-box data is read pessimistically for deal detection.
const MISSING_DOMINANCE_PCT: Decimal = dec!(100);

const VOLATILITY_WINDOWS: [(i64, f64); 3] = [(30, 0.5), (90, 0.3), (365, 0.2)];

pub fn detect_deal(
    series: &[PricePoint],
    current_price: Decimal,
    velocity_score: Decimal,
    amazon_dominance_pct: Option<Decimal>,
    oos_pct: Option<Decimal>,
    thresholds: &HistoricThresholds,
) -> AnalysisResult<HistoricSignal> {
    if current_price < Decimal::ZERO {
        return Err(AnalysisError::InvalidPrice {
            price: current_price,
            context: "current price for historic analysis".to_string(),
        });
    }

    let window = PriceWindow::trailing(series, thresholds.window_days);
    let found = window.sample_count();
    let avg_90d = match window.mean() {
        Some(avg) if found >= thresholds.min_observations.max(1) => avg,
        _ => {
            return Err(AnalysisError::InsufficientHistory {
                required: thresholds.min_observations.max(1),
                found,
            })
        }
    };

    let dominance = amazon_dominance_pct.unwrap_or(MISSING_DOMINANCE_PCT);
    let oos = oos_pct.unwrap_or(Decimal::ZERO);

    let reversion_ceiling = in_range(
        thresholds.reversion_threshold.checked_mul(avg_90d),
        avg_90d,
        "reversion ceiling",
    )?;

    let is_deal = current_price > Decimal::ZERO
        && current_price <= reversion_ceiling
        && velocity_score >= thresholds.min_velocity
        && dominance <= thresholds.max_dominance_pct
        && oos <= thresholds.max_oos_pct;

    let deviation_90d_pct = if avg_90d > Decimal::ZERO {
        let deviation = (current_price - avg_90d)
            .checked_div(avg_90d)
            .and_then(|ratio| ratio.checked_mul(dec!(100)));
        in_range(deviation, current_price, "90-day deviation")?
    } else {
        Decimal::ZERO
    };

    Ok(HistoricSignal {
        is_deal,
        momentum_index: momentum_index(series, current_price),
        volatility_index: volatility_index(series),
        avg_90d,
        deviation_90d_pct,
        observations_in_window: found,
    })
}

/// Where the current price sits in the historic range, inverted: 100 at or
/// below the low, 0 at or above the high, 50 for a flat history.
pub fn momentum_index(series: &[PricePoint], current_price: Decimal) -> Decimal {
    match price_range(series) {
        Some((low, high)) if high > low => {
            if current_price <= low {
                dec!(100)
            } else if current_price >= high {
                dec!(0)
            } else {
                // Strictly inside the range, so the ratio is below one.
                clamp_score((high - current_price) / (high - low) * dec!(100))
            }
        }
        _ => dec!(50),
    }
}

/// 100 for a flat history, falling by 200 points per unit of weighted
/// coefficient of variation (30d 50 %, 90d 30 %, 365d 20 %).
pub fn volatility_index(series: &[PricePoint]) -> Decimal {
    let weighted_cv: f64 = VOLATILITY_WINDOWS
        .iter()
        .map(|(days, weight)| PriceWindow::trailing(series, *days).coefficient_of_variation() * weight)
        .sum();
    clamp_score(from_f64_or_zero(100.0 - weighted_cv * 200.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(prices: &[Decimal]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint {
                timestamp: start + Duration::days(i as i64 * 10),
                price: *p,
            })
            .collect()
    }

    fn history() -> Vec<PricePoint> {
        series(&[dec!(100), dec!(110), dec!(90), dec!(100), dec!(105), dec!(95)])
    }

    #[test]
    fn flags_price_below_reversion_threshold() {
        let signal = detect_deal(&history(), dec!(85), dec!(55), Some(dec!(20)), Some(dec!(5)), &HistoricThresholds::default()).unwrap();
        assert!(signal.is_deal);
        assert_eq!(signal.avg_90d, dec!(100));
        assert_eq!(signal.deviation_90d_pct, dec!(-15));
        assert_eq!(signal.observations_in_window, 6);
    }

    #[test]
    fn every_condition_must_hold() {
        let t = HistoricThresholds::default();
        let h = history();
        // price not low enough
        assert!(!detect_deal(&h, dec!(95), dec!(55), Some(dec!(20)), Some(dec!(5)), &t).unwrap().is_deal);
        // slow seller
        assert!(!detect_deal(&h, dec!(85), dec!(39), Some(dec!(20)), Some(dec!(5)), &t).unwrap().is_deal);
        // Amazon dominated
        assert!(!detect_deal(&h, dec!(85), dec!(55), Some(dec!(81)), Some(dec!(5)), &t).unwrap().is_deal);
        // frequently out of stock
        assert!(!detect_deal(&h, dec!(85), dec!(55), Some(dec!(20)), Some(dec!(31)), &t).unwrap().is_deal);
        // missing dominance counts as dominated
        assert!(!detect_deal(&h, dec!(85), dec!(55), None, Some(dec!(5)), &t).unwrap().is_deal);
        // boundaries are inclusive
        assert!(detect_deal(&h, dec!(90), dec!(40), Some(dec!(80)), Some(dec!(30)), &t).unwrap().is_deal);
    }

    #[test]
    fn zero_price_is_never_a_deal() {
        let signal = detect_deal(&history(), dec!(0), dec!(90), Some(dec!(0)), None, &HistoricThresholds::default()).unwrap();
        assert!(!signal.is_deal);
    }

    #[test]
    fn short_history_is_reported() {
        let short = series(&[dec!(100), dec!(90)]);
        let err = detect_deal(&short, dec!(80), dec!(50), Some(dec!(0)), None, &HistoricThresholds::default()).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientHistory { required: 3, found: 2 });

        let err = detect_deal(&[], dec!(80), dec!(50), Some(dec!(0)), None, &HistoricThresholds::default()).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientHistory { required: 3, found: 0 });
    }

    #[test]
    fn repeated_calls_agree() {
        let t = HistoricThresholds::default();
        let h = history();
        let a = detect_deal(&h, dec!(88), dec!(60), Some(dec!(10)), Some(dec!(0)), &t).unwrap();
        let b = detect_deal(&h, dec!(88), dec!(60), Some(dec!(10)), Some(dec!(0)), &t).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn momentum_inverts_range_position() {
        let h = history();
        assert_eq!(momentum_index(&h, dec!(90)), dec!(100));
        assert_eq!(momentum_index(&h, dec!(110)), dec!(0));
        assert_eq!(momentum_index(&h, dec!(100)), dec!(50));
        assert_eq!(momentum_index(&h, dec!(70)), dec!(100));
        assert_eq!(momentum_index(&series(&[dec!(5), dec!(5)]), dec!(5)), dec!(50));
    }

    #[test]
    fn momentum_saturates_outside_a_tiny_range() {
        let tiny = series(&[Decimal::new(1, 27), Decimal::new(2, 27), Decimal::new(3, 27)]);
        assert_eq!(momentum_index(&tiny, Decimal::MAX), dec!(0));
        assert_eq!(momentum_index(&tiny, dec!(0)), dec!(100));
        assert_eq!(momentum_index(&tiny, Decimal::new(2, 27)), dec!(50));
    }

    #[test]
    fn extreme_deviation_fails_the_signal() {
        let tiny = series(&[Decimal::new(1, 27), Decimal::new(1, 27), Decimal::new(1, 27)]);
        let err = detect_deal(&tiny, dec!(90), dec!(50), Some(dec!(0)), None, &HistoricThresholds::default()).unwrap_err();
        assert_eq!(err.kind(), "invalid_price");
        assert!(err.to_string().contains("90-day deviation out of range"));

        let huge = series(&[Decimal::MAX, Decimal::MAX, Decimal::MAX]);
        let signal = detect_deal(&huge, dec!(90), dec!(50), Some(dec!(0)), None, &HistoricThresholds::default()).unwrap();
        assert!(signal.is_deal);
        assert!(signal.deviation_90d_pct < dec!(-99));
    }

    #[test]
    fn volatility_index_of_flat_history_is_full() {
        let flat = series(&[dec!(20), dec!(20), dec!(20), dec!(20)]);
        assert_eq!(volatility_index(&flat), dec!(100));
        assert!(volatility_index(&series(&[dec!(10), dec!(40), dec!(5), dec!(60)])) < dec!(50));
    }

    #[test]
    fn parses_history_policy() {
        assert_eq!("treat_as_no_deal".parse::<HistoryPolicy>(), Ok(HistoryPolicy::TreatAsNoDeal));
        assert_eq!("Propagate".parse::<HistoryPolicy>(), Ok(HistoryPolicy::Propagate));
    }
}
