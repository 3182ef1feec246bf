//! Mathematical utility functions

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use crate::errors::{AnalysisError, AnalysisResult};

pub const SCORE_MIN: Decimal = dec!(0);
pub const SCORE_MAX: Decimal = dec!(100);

/// Clip to the 0-100 score range.
pub fn clamp_score(value: Decimal) -> Decimal {
    value.max(SCORE_MIN).min(SCORE_MAX)
}

pub fn from_f64_or_zero(value: f64) -> Decimal {
    if value.is_finite() {
        Decimal::from_f64(value).unwrap_or(dec!(0))
    } else {
        dec!(0)
    }
}

/// Arithmetic mean. Falls back to f64 when the decimal sum would overflow.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let n = Decimal::from(values.len());
    match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(sum) => Some(sum / n),
        None => {
            let avg = values.iter().map(|v| v.to_f64().unwrap_or(0.0)).sum::<f64>() / values.len() as f64;
            Some(Decimal::from_f64(avg).unwrap_or(if avg > 0.0 { Decimal::MAX } else { Decimal::MIN }))
        }
    }
}

/// Turns an overflowed checked operation into a per-record price error.
pub fn in_range(value: Option<Decimal>, price: Decimal, quantity: &str) -> AnalysisResult<Decimal> {
    value.ok_or_else(|| AnalysisError::InvalidPrice {
        price,
        context: format!("{} out of range", quantity),
    })
}

/// Population coefficient of variation, 0 when fewer than two values or a
/// non-positive mean.
pub fn coefficient_of_variation(values: &[Decimal]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let prices: Vec<f64> = values.iter().map(|v| v.to_f64().unwrap_or(0.0)).collect();
    let mean: f64 = prices.iter().sum::<f64>() / prices.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance: f64 = prices.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    variance.sqrt() / mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_both_ends() {
        assert_eq!(clamp_score(dec!(-3)), dec!(0));
        assert_eq!(clamp_score(dec!(100.0001)), dec!(100));
        assert_eq!(clamp_score(dec!(42.5)), dec!(42.5));
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[dec!(10), dec!(20)]), Some(dec!(15)));
    }

    #[test]
    fn cv_of_flat_series_is_zero() {
        assert_eq!(coefficient_of_variation(&[dec!(5), dec!(5), dec!(5)]), 0.0);
        assert_eq!(coefficient_of_variation(&[dec!(5)]), 0.0);
        let cv = coefficient_of_variation(&[dec!(90), dec!(110)]);
        assert!((cv - 0.1).abs() < 1e-12);
    }

    #[test]
    fn mean_survives_sums_past_decimal_max() {
        let avg = mean(&[Decimal::MAX, Decimal::MAX]).unwrap();
        assert!(avg > Decimal::MAX / dec!(2));
    }

    #[test]
    fn overflow_maps_to_invalid_price() {
        let err = in_range(Decimal::MAX.checked_mul(dec!(2)), Decimal::MAX, "target price").unwrap_err();
        assert_eq!(err.kind(), "invalid_price");
        assert!(err.to_string().contains("target price out of range"));
        assert_eq!(in_range(Some(dec!(3)), dec!(3), "x"), Ok(dec!(3)));
    }

    #[test]
    fn non_finite_becomes_zero() {
        assert_eq!(from_f64_or_zero(f64::NAN), dec!(0));
        assert_eq!(from_f64_or_zero(f64::INFINITY), dec!(0));
    }
}
