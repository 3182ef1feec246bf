//! Validated analysis configuration shared by every product in a run

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use tracing::info;
use crate::{
    arbitrage::RouteOptimizer,
    errors::{AnalysisError, AnalysisResult, StartupError},
    historic::{HistoricThresholds, HistoryPolicy},
    pricing::{parse_category_fees, FeeModel, FeeSchedule, PricingEngine, PurchaseStrategy, SaleScenario},
    scoring::{OpportunityScorer, ScoringParams, ScoringWeights},
    types::{MarketCode, MarketRulesBook, RouteProfit},
};
use super::{Settings, DEFAULT_MIN_MARGIN_PCT, DEFAULT_MIN_ROI_PCT};

/// Filters applied to the selected route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePolicy {
    /// Reject products whose best route loses money instead of reporting them.
    pub require_positive_margin: bool,
    pub min_roi_pct: Decimal,
    pub min_margin_pct: Decimal,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            require_positive_margin: false,
            min_roi_pct: DEFAULT_MIN_ROI_PCT,
            min_margin_pct: DEFAULT_MIN_MARGIN_PCT,
        }
    }
}

impl RoutePolicy {
    pub fn meets_thresholds(&self, best: &RouteProfit) -> bool {
        best.profit.gross_margin > Decimal::ZERO
            && best.profit.roi_pct >= self.min_roi_pct
            && best.profit.margin_pct >= self.min_margin_pct
    }
}

/// Everything the pipeline reads. Built and validated once at startup, then
/// shared read-only across workers.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub home_market: MarketCode,
    pub rules: MarketRulesBook,
    pub fees: FeeSchedule,
    pub discount_pct: Decimal,
    pub purchase_strategy: PurchaseStrategy,
    pub sale_scenario: SaleScenario,
    pub weights: ScoringWeights,
    pub scoring: ScoringParams,
    pub route_policy: RoutePolicy,
    pub historic: HistoricThresholds,
    pub history_policy: HistoryPolicy,
}

impl AnalysisConfig {
    /// Fails on unknown market codes, an out-of-range discount, malformed
    /// category fees or weights that do not form a valid split.
    pub fn from_settings(settings: &Settings) -> Result<Self, StartupError> {
        let home_market = MarketCode::from_str(&settings.home_market)?;

        let mut markets = settings
            .markets
            .iter()
            .map(|m| MarketCode::from_str(m))
            .collect::<AnalysisResult<Vec<_>>>()?;
        if !markets.contains(&home_market) {
            markets.push(home_market);
        }

        if settings.discount_pct < Decimal::ZERO || settings.discount_pct >= dec!(1) {
            return Err(AnalysisError::Input {
                context: format!("discount {} outside [0, 1)", settings.discount_pct),
            }
            .into());
        }

        let mut fees = FeeSchedule::new(settings.fulfillment_mode, settings.inbound_logistics);
        let overrides = match settings.category_fees.as_deref() {
            Some(spec) => parse_category_fees(spec)?,
            None => Vec::new(),
        };
        for (market, category, fee) in &overrides {
            fees = fees.with_category_fee(*market, category, *fee);
        }

        let weights = ScoringWeights::new(
            settings.weight_profit,
            settings.weight_velocity,
            settings.weight_competition,
        )?;

        let config = Self {
            home_market,
            rules: MarketRulesBook::standard(home_market, &markets),
            fees,
            discount_pct: settings.discount_pct,
            purchase_strategy: settings.purchase_strategy,
            sale_scenario: settings.sale_scenario,
            weights,
            scoring: ScoringParams {
                excellent_roi_pct: settings.excellent_roi_pct,
            },
            route_policy: RoutePolicy {
                require_positive_margin: settings.require_positive_margin,
                min_roi_pct: settings.min_roi_pct,
                min_margin_pct: settings.min_margin_pct,
            },
            historic: HistoricThresholds {
                reversion_threshold: settings.deal_reversion_threshold,
                min_velocity: settings.deal_min_velocity,
                max_dominance_pct: settings.deal_max_dominance_pct,
                max_oos_pct: settings.deal_max_oos_pct,
                min_observations: settings.deal_min_observations,
                ..HistoricThresholds::default()
            },
            history_policy: settings.history_policy,
        };

        info!(
            home = %config.home_market,
            markets = config.rules.len(),
            discount = %config.discount_pct,
            scenario = ?config.sale_scenario,
            strategy = ?config.purchase_strategy,
            mode = ?config.fees.mode,
            category_fees = overrides.len(),
            "Analysis configuration loaded"
        );

        Ok(config)
    }

    pub fn pricing(&self) -> PricingEngine<'_> {
        PricingEngine::new(&self.rules, self.discount_pct)
    }

    pub fn fee_model(&self) -> FeeModel<'_> {
        FeeModel::new(&self.rules, &self.fees)
    }

    pub fn route_optimizer(&self) -> RouteOptimizer<'_> {
        RouteOptimizer::new(self.pricing(), self.fee_model(), self.purchase_strategy, self.sale_scenario)
    }

    pub fn scorer(&self) -> OpportunityScorer {
        OpportunityScorer::new(self.weights, self.scoring)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let home_market = MarketCode::IT;
        Self {
            home_market,
            rules: MarketRulesBook::standard(
                home_market,
                &[MarketCode::IT, MarketCode::DE, MarketCode::FR, MarketCode::ES],
            ),
            fees: FeeSchedule::default(),
            discount_pct: dec!(0.21),
            purchase_strategy: PurchaseStrategy::default(),
            sale_scenario: SaleScenario::default(),
            weights: ScoringWeights::default(),
            scoring: ScoringParams::default(),
            route_policy: RoutePolicy::default(),
            historic: HistoricThresholds::default(),
            history_policy: HistoryPolicy::default(),
        }
    }
}

impl TryFrom<&Settings> for AnalysisConfig {
    type Error = StartupError;

    fn try_from(settings: &Settings) -> Result<Self, Self::Error> {
        Self::from_settings(settings)
    }
}
