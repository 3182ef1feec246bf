//! Scoring weights and tunables, validated once at configuration time

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use crate::errors::{AnalysisError, AnalysisResult};

pub const WEIGHT_SUM_TOLERANCE: Decimal = dec!(0.000001);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    profit: Decimal,
    velocity: Decimal,
    competition: Decimal,
}

impl ScoringWeights {
    /// Each weight must lie in [0, 1] and the three must sum to 1 within
    /// `WEIGHT_SUM_TOLERANCE`.
    pub fn new(profit: Decimal, velocity: Decimal, competition: Decimal) -> AnalysisResult<Self> {
        for (name, w) in [("profit", profit), ("velocity", velocity), ("competition", competition)] {
            if w < Decimal::ZERO || w > dec!(1) {
                return Err(AnalysisError::InvalidWeightConfiguration {
                    reason: format!("{} weight {} outside [0, 1]", name, w),
                });
            }
        }
        let sum = profit + velocity + competition;
        if (sum - dec!(1)).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AnalysisError::InvalidWeightConfiguration {
                reason: format!("weights sum to {}, expected 1", sum),
            });
        }
        Ok(Self { profit, velocity, competition })
    }

    pub fn profit(&self) -> Decimal {
        self.profit
    }

    pub fn velocity(&self) -> Decimal {
        self.velocity
    }

    pub fn competition(&self) -> Decimal {
        self.competition
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            profit: dec!(0.55),
            velocity: dec!(0.30),
            competition: dec!(0.15),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringParams {
    /// ROI (percent) at which the ROI part of the profit score saturates.
    pub excellent_roi_pct: Decimal,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            excellent_roi_pct: dec!(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let d = ScoringWeights::default();
        assert!(ScoringWeights::new(d.profit(), d.velocity(), d.competition()).is_ok());
    }

    #[test]
    fn accepts_sum_within_tolerance() {
        assert!(ScoringWeights::new(dec!(0.5), dec!(0.3), dec!(0.199999)).is_ok());
        assert!(ScoringWeights::new(dec!(0), dec!(0), dec!(1)).is_ok());
    }

    #[test]
    fn rejects_sum_outside_tolerance() {
        let err = ScoringWeights::new(dec!(0.5), dec!(0.3), dec!(0.1)).unwrap_err();
        assert_eq!(err.kind(), "invalid_weight_configuration");
        assert!(ScoringWeights::new(dec!(0.5), dec!(0.3), dec!(0.2000011)).is_err());
    }

    #[test]
    fn rejects_out_of_range_weight() {
        assert!(ScoringWeights::new(dec!(1.2), dec!(-0.2), dec!(0)).is_err());
    }
}
