//! Aggregate statistics for a finished batch

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use crate::{
    types::{OpportunityRecord, ProductOutcome},
    utils::mean,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_products: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub failures_by_kind: BTreeMap<String, usize>,
    pub meeting_thresholds: usize,
    pub historic_deals: usize,
    pub avg_opportunity_score: Decimal,
    pub avg_roi_pct: Decimal,
    pub avg_margin_pct: Decimal,
    /// Selected route label ("IT->DE") to number of products.
    pub route_distribution: BTreeMap<String, usize>,
    pub best_product: Option<String>,
    pub best_route: Option<String>,
    pub best_score: Option<Decimal>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[ProductOutcome]) -> Self {
        let mut summary = RunSummary {
            total_products: outcomes.len(),
            ..Default::default()
        };

        let records: Vec<&OpportunityRecord> = outcomes.iter().filter_map(ProductOutcome::record).collect();
        for failure in outcomes.iter().filter_map(ProductOutcome::failure) {
            *summary.failures_by_kind.entry(failure.kind.to_string()).or_default() += 1;
        }
        summary.analyzed = records.len();
        summary.failed = outcomes.len() - records.len();

        if records.is_empty() {
            return summary;
        }

        for record in &records {
            if record.meets_thresholds {
                summary.meeting_thresholds += 1;
            }
            if record.is_historic_deal() {
                summary.historic_deals += 1;
            }
            *summary
                .route_distribution
                .entry(record.best.route.to_string())
                .or_default() += 1;
        }

        let average = |field: fn(&OpportunityRecord) -> Decimal| {
            let values: Vec<Decimal> = records.iter().map(|r| field(r)).collect();
            mean(&values).unwrap_or_default().round_dp(2)
        };
        summary.avg_opportunity_score = average(|r| r.opportunity_score);
        summary.avg_roi_pct = average(|r| r.best.profit.roi_pct);
        summary.avg_margin_pct = average(|r| r.best.profit.margin_pct);

        // Highest score; product id breaks ties so the pick is stable.
        if let Some(best) = records.iter().max_by(|a, b| {
            a.opportunity_score
                .cmp(&b.opportunity_score)
                .then_with(|| b.product_id.cmp(&a.product_id))
        }) {
            summary.best_product = Some(best.product_id.clone());
            summary.best_route = Some(best.best.route.to_string());
            summary.best_score = Some(best.opportunity_score);
        }

        summary
    }

    pub fn success_rate_pct(&self) -> f64 {
        if self.total_products == 0 {
            0.0
        } else {
            self.analyzed as f64 / self.total_products as f64 * 100.0
        }
    }
}
