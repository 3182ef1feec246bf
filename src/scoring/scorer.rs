//! Weighted opportunity score

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use crate::{
    types::{ProductObservation, RouteProfit, SubScores},
    utils::clamp_score,
};
use super::{competition_score, profit_score, velocity_score, ScoringParams, ScoringWeights};

/// Scores for one selected route, before the record is assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub opportunity_score: Decimal,
    pub sub_scores: SubScores,
}

#[derive(Debug, Clone, Copy)]
pub struct OpportunityScorer {
    weights: ScoringWeights,
    params: ScoringParams,
}

impl OpportunityScorer {
    pub fn new(weights: ScoringWeights, params: ScoringParams) -> Self {
        Self { weights, params }
    }

    /// `observation` is the sell-side listing: demand and buy-box pressure
    /// matter where the unit is resold.
    pub fn score(&self, best: &RouteProfit, observation: &ProductObservation) -> ScoreCard {
        let sub_scores = SubScores {
            profit: profit_score(best.profit.roi_pct, best.profit.margin_pct, &self.params),
            velocity: velocity_score(observation),
            competition: competition_score(observation),
        };
        ScoreCard {
            opportunity_score: self.combine(&sub_scores),
            sub_scores,
        }
    }

    pub fn combine(&self, sub: &SubScores) -> Decimal {
        clamp_score(
            self.weights.profit() * sub.profit
                + self.weights.velocity() * sub.velocity
                + self.weights.competition() * sub.competition,
        )
    }
}

fn band(score: Decimal, labels: [&'static str; 4]) -> &'static str {
    if score >= dec!(80) {
        labels[0]
    } else if score >= dec!(60) {
        labels[1]
    } else if score >= dec!(40) {
        labels[2]
    } else {
        labels[3]
    }
}

/// Human-readable breakdown of a score card.
pub fn explain(card: &ScoreCard) -> String {
    let sub = &card.sub_scores;
    format!(
        "Opportunity score {:.1}/100 ({})\n  Profit {:.1}/100: {}\n  Velocity {:.1}/100: {}\n  Competition {:.1}/100: {}",
        card.opportunity_score,
        band(card.opportunity_score, ["excellent", "good", "moderate", "poor"]),
        sub.profit,
        band(sub.profit, ["very high ROI", "solid ROI", "acceptable ROI", "insufficient ROI"]),
        sub.velocity,
        band(sub.velocity, ["sells fast", "sells steadily", "moderate liquidity", "slow seller"]),
        sub.competition,
        band(sub.competition, ["little competition", "moderate competition", "crowded", "hard to enter"]),
    )
}
