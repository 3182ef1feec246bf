//! Single-product analysis: route selection, scoring, historic signal

use rust_decimal::Decimal;
use tracing::{debug, info};
use crate::{
    config::AnalysisConfig,
    errors::{AnalysisError, AnalysisResult},
    historic::{detect_deal, HistoryPolicy},
    types::{HistoricSignal, MarketCode, OpportunityRecord, ProductObservation},
    validation::assess_sustainability,
};

/// Runs the full chain for one product. `observations` holds at most one
/// entry per market for the same product.
pub fn analyze_product(
    product_id: &str,
    observations: &[ProductObservation],
    config: &AnalysisConfig,
) -> AnalysisResult<OpportunityRecord> {
    let best = config.route_optimizer().select_best_route(
        product_id,
        observations,
        config.route_policy.require_positive_margin,
    )?;

    let buy_side = observation_for(product_id, observations, best.route.buy_market)?;
    let sell_side = observation_for(product_id, observations, best.route.sell_market)?;

    let card = config.scorer().score(&best, sell_side);
    let historic = historic_signal(buy_side, best.purchase_price, card.sub_scores.velocity, config)?;
    let meets_thresholds = config.route_policy.meets_thresholds(&best);
    let sustainability = assess_sustainability(&best, sell_side, historic.as_ref());

    let record = OpportunityRecord::new(
        product_id,
        best,
        card.opportunity_score,
        card.sub_scores,
        meets_thresholds,
        historic,
        sustainability,
    );

    info!(
        product = product_id,
        route = %record.best.route,
        roi_pct = %record.best.profit.roi_pct.round_dp(2),
        score = %record.opportunity_score.round_dp(1),
        meets_thresholds,
        historic_deal = record.is_historic_deal(),
        "Analyzed product"
    );

    Ok(record)
}

fn observation_for<'o>(
    product_id: &str,
    observations: &'o [ProductObservation],
    market: MarketCode,
) -> AnalysisResult<&'o ProductObservation> {
    observations
        .iter()
        .find(|o| o.market == market)
        .ok_or_else(|| AnalysisError::Input {
            context: format!("{} has no observation for {}", product_id, market),
        })
}

fn historic_signal(
    buy_side: &ProductObservation,
    purchase_price: Decimal,
    velocity_score: Decimal,
    config: &AnalysisConfig,
) -> AnalysisResult<Option<HistoricSignal>> {
    let series = buy_side.price_history.as_deref().unwrap_or_default();
    let outcome = detect_deal(
        series,
        purchase_price,
        velocity_score,
        buy_side.amazon_buy_box_share_pct,
        buy_side.out_of_stock_pct,
        &config.historic,
    );

    match (outcome, config.history_policy) {
        (Ok(signal), _) => Ok(Some(signal)),
        (Err(e @ AnalysisError::InsufficientHistory { .. }), HistoryPolicy::TreatAsNoDeal) => {
            debug!(product = %buy_side.product_id, market = %buy_side.market, reason = %e, "Historic signal omitted");
            Ok(None)
        }
        (Err(e), _) => Err(e),
    }
}
