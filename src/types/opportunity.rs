//! Opportunity records: the per-product output of an analysis run

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use crate::errors::AnalysisError;
use super::{HistoricSignal, MarketCode, RouteProfit, SustainabilityReport};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub profit: Decimal,
    pub velocity: Decimal,
    pub competition: Decimal,
}

/// Final result for one product. Built once per run; a new analysis yields a
/// new record with a new id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityRecord {
    pub id: String,
    pub product_id: String,
    pub analyzed_at: DateTime<Utc>,
    pub best: RouteProfit,
    pub opportunity_score: Decimal,
    pub sub_scores: SubScores,
    pub meets_thresholds: bool,
    pub historic: Option<HistoricSignal>,
    pub sustainability: SustainabilityReport,
}

impl OpportunityRecord {
    pub fn new(
        product_id: impl Into<String>,
        best: RouteProfit,
        opportunity_score: Decimal,
        sub_scores: SubScores,
        meets_thresholds: bool,
        historic: Option<HistoricSignal>,
        sustainability: SustainabilityReport,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            analyzed_at: Utc::now(),
            best,
            opportunity_score,
            sub_scores,
            meets_thresholds,
            historic,
            sustainability,
        }
    }

    pub fn is_historic_deal(&self) -> bool {
        self.historic.as_ref().is_some_and(|h| h.is_deal)
    }

    /// Flat field mapping handed to export and visualization consumers.
    pub fn flatten(&self) -> FlatOpportunity {
        let profit = &self.best.profit;
        FlatOpportunity {
            product_id: self.product_id.clone(),
            record_id: self.id.clone(),
            net_cost: profit.net_cost.round_dp(2),
            target_price: profit.target_price.round_dp(2),
            gross_margin: profit.gross_margin.round_dp(2),
            margin_pct: profit.margin_pct.round_dp(2),
            roi_pct: profit.roi_pct.round_dp(2),
            opportunity_score: self.opportunity_score.round_dp(2),
            profit_score: self.sub_scores.profit.round_dp(2),
            velocity_score: self.sub_scores.velocity.round_dp(2),
            competition_score: self.sub_scores.competition.round_dp(2),
            is_historic_deal: self.historic.as_ref().map(|h| h.is_deal),
            momentum_index: self.historic.as_ref().map(|h| h.momentum_index.round_dp(2)),
            best_buy_market: self.best.route.buy_market,
            best_sell_market: self.best.route.sell_market,
            meets_thresholds: self.meets_thresholds,
            sustainability_confidence: self.sustainability.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatOpportunity {
    pub product_id: String,
    pub record_id: String,
    pub net_cost: Decimal,
    pub target_price: Decimal,
    pub gross_margin: Decimal,
    pub margin_pct: Decimal,
    pub roi_pct: Decimal,
    pub opportunity_score: Decimal,
    pub profit_score: Decimal,
    pub velocity_score: Decimal,
    pub competition_score: Decimal,
    pub is_historic_deal: Option<bool>,
    pub momentum_index: Option<Decimal>,
    pub best_buy_market: MarketCode,
    pub best_sell_market: MarketCode,
    pub meets_thresholds: bool,
    pub sustainability_confidence: u32,
}

/// Failure marker attached to a product whose analysis did not complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFailure {
    pub product_id: String,
    pub kind: &'static str,
    pub reason: String,
}

impl ProductFailure {
    pub fn from_error(product_id: &str, error: &AnalysisError) -> Self {
        Self {
            product_id: product_id.to_string(),
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductOutcome {
    pub product_id: String,
    pub result: Result<OpportunityRecord, ProductFailure>,
}

impl ProductOutcome {
    pub fn record(&self) -> Option<&OpportunityRecord> {
        self.result.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&ProductFailure> {
        self.result.as_ref().err()
    }
}
