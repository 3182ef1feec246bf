//! Cross-market route selection

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;
use crate::{
    arbitrage::compute_profit,
    errors::{AnalysisError, AnalysisResult},
    pricing::{FeeModel, PricingEngine, PurchaseStrategy, SaleScenario},
    types::{MarketCode, ProductObservation, Route, RouteProfit},
};

pub struct RouteOptimizer<'a> {
    pricing: PricingEngine<'a>,
    fees: FeeModel<'a>,
    strategy: PurchaseStrategy,
    scenario: SaleScenario,
}

impl<'a> RouteOptimizer<'a> {
    pub fn new(
        pricing: PricingEngine<'a>,
        fees: FeeModel<'a>,
        strategy: PurchaseStrategy,
        scenario: SaleScenario,
    ) -> Self {
        Self { pricing, fees, strategy, scenario }
    }

    /// Profit for buying at `buy` and selling at `sell`.
    pub fn evaluate_route(&self, buy: &ProductObservation, sell: &ProductObservation) -> AnalysisResult<RouteProfit> {
        let purchase_price = self.strategy.purchase_price(buy);
        let net_cost = self.pricing.net_cost(purchase_price, buy.market)?;
        let target_price = self.pricing.target_price(sell, self.scenario)?;
        let category = sell.category.as_deref().or(buy.category.as_deref());
        let fees = self
            .fees
            .resolve_fees(sell.market, category, sell.weight_kg.or(buy.weight_kg))?;
        let profit = compute_profit(net_cost, target_price, fees.referral_fee_pct, fees.fixed_fee)?;

        Ok(RouteProfit {
            route: Route::new(buy.market, sell.market),
            purchase_price,
            profit,
        })
    }

    /// Best route across every ordered pair of distinct observed markets, or
    /// the same-market baseline when only one market was observed.
    pub fn select_best_route(
        &self,
        product_id: &str,
        observations: &[ProductObservation],
        require_positive_margin: bool,
    ) -> AnalysisResult<RouteProfit> {
        let by_market = index_by_market(product_id, observations)?;

        let mut markets: Vec<MarketCode> = by_market.keys().copied().collect();
        markets.sort_by_key(|m| m.as_str());

        let pairs: Vec<(MarketCode, MarketCode)> = if markets.len() == 1 {
            vec![(markets[0], markets[0])]
        } else {
            markets
                .iter()
                .flat_map(|b| markets.iter().map(move |s| (*b, *s)))
                .filter(|(b, s)| b != s)
                .collect()
        };

        let mut candidates = Vec::with_capacity(pairs.len());
        let mut first_error: Option<AnalysisError> = None;

        for (buy, sell) in &pairs {
            match self.evaluate_route(by_market[buy], by_market[sell]) {
                Ok(candidate) => {
                    debug!(
                        product = product_id,
                        route = %candidate.route,
                        roi_pct = %candidate.profit.roi_pct.round_dp(2),
                        margin = %candidate.profit.gross_margin.round_dp(2),
                        "Evaluated route"
                    );
                    candidates.push(candidate);
                }
                Err(e) => {
                    debug!(product = product_id, buy = %buy, sell = %sell, error = %e, "Route skipped");
                    first_error.get_or_insert(e);
                }
            }
        }

        let best = match candidates.into_iter().max_by(compare_routes) {
            Some(best) => best,
            None => {
                return Err(first_error.unwrap_or(AnalysisError::NoViableRoute {
                    product_id: product_id.to_string(),
                    candidates: 0,
                }))
            }
        };

        if require_positive_margin && best.profit.gross_margin <= Decimal::ZERO {
            return Err(AnalysisError::NoViableRoute {
                product_id: product_id.to_string(),
                candidates: pairs.len(),
            });
        }

        Ok(best)
    }
}

/// Total order on candidates: higher ROI, then higher margin, then the
/// lexicographically smaller market pair ranks higher.
pub fn compare_routes(a: &RouteProfit, b: &RouteProfit) -> Ordering {
    a.profit
        .roi_pct
        .cmp(&b.profit.roi_pct)
        .then_with(|| a.profit.gross_margin.cmp(&b.profit.gross_margin))
        .then_with(|| b.route.sort_key().cmp(&a.route.sort_key()))
}

fn index_by_market<'o>(
    product_id: &str,
    observations: &'o [ProductObservation],
) -> AnalysisResult<HashMap<MarketCode, &'o ProductObservation>> {
    if observations.is_empty() {
        return Err(AnalysisError::Input {
            context: format!("{} has no observations", product_id),
        });
    }

    let mut by_market = HashMap::new();
    for obs in observations {
        if by_market.insert(obs.market, obs).is_some() {
            return Err(AnalysisError::Input {
                context: format!("{} observed twice in {}", product_id, obs.market),
            });
        }
    }
    Ok(by_market)
}
