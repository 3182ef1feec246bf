//! Analysis settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;
use crate::{
    historic::HistoryPolicy,
    pricing::{FulfillmentMode, PurchaseStrategy, SaleScenario, DEFAULT_INBOUND_LOGISTICS},
};

// Configuration constants
pub const DEFAULT_HOME_MARKET: &str = "IT";
pub const DEFAULT_MARKETS: &str = "IT,DE,FR,ES";
pub const DEFAULT_DISCOUNT_PCT: Decimal = dec!(0.21);
pub const MAX_DISCOUNT_PCT: Decimal = dec!(0.90);
pub const MAX_INBOUND_LOGISTICS: Decimal = dec!(100);
pub const DEFAULT_MIN_ROI_PCT: Decimal = dec!(10);
pub const DEFAULT_MIN_MARGIN_PCT: Decimal = dec!(15);
pub const MAX_ANALYSIS_WORKERS: usize = 64;

/// Raw settings as read from the environment. Numeric values are clamped to
/// sane bounds; the scoring weights are kept as given so that a bad sum is
/// rejected when the analysis configuration is built.
#[derive(Debug, Clone)]
pub struct Settings {
    pub home_market: String,
    pub markets: Vec<String>,
    pub discount_pct: Decimal,
    pub inbound_logistics: Decimal,
    pub fulfillment_mode: FulfillmentMode,
    pub purchase_strategy: PurchaseStrategy,
    pub sale_scenario: SaleScenario,
    /// Raw `CATEGORY_FEES` overrides, parsed when the analysis config is built.
    pub category_fees: Option<String>,
    // Scoring
    pub weight_profit: Decimal,
    pub weight_velocity: Decimal,
    pub weight_competition: Decimal,
    pub excellent_roi_pct: Decimal,
    // Route filters
    pub min_roi_pct: Decimal,
    pub min_margin_pct: Decimal,
    pub require_positive_margin: bool,
    // Historic deal detection
    pub deal_reversion_threshold: Decimal,
    pub deal_min_velocity: Decimal,
    pub deal_max_dominance_pct: Decimal,
    pub deal_max_oos_pct: Decimal,
    pub deal_min_observations: usize,
    pub history_policy: HistoryPolicy,
    // Runtime
    pub analysis_workers: usize,
    pub input_path: Option<String>,
    pub output_path: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let decimal = |key: &str, default: Decimal| {
            lookup(key)
                .and_then(|s| Decimal::from_str(s.trim()).ok())
                .unwrap_or(default)
        };
        let parsed = |key: &str| lookup(key).map(|s| s.trim().to_string());

        Self {
            home_market: parsed("HOME_MARKET").unwrap_or_else(|| DEFAULT_HOME_MARKET.to_string()),
            markets: parsed("MARKETS")
                .unwrap_or_else(|| DEFAULT_MARKETS.to_string())
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            discount_pct: decimal("DISCOUNT_PCT", DEFAULT_DISCOUNT_PCT)
                .max(dec!(0))
                .min(MAX_DISCOUNT_PCT),
            inbound_logistics: decimal("INBOUND_LOGISTICS", DEFAULT_INBOUND_LOGISTICS)
                .max(dec!(0))
                .min(MAX_INBOUND_LOGISTICS),
            fulfillment_mode: parsed("FULFILLMENT_MODE")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            purchase_strategy: parsed("PURCHASE_STRATEGY")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            sale_scenario: parsed("SALE_SCENARIO")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            category_fees: parsed("CATEGORY_FEES").filter(|s| !s.is_empty()),
            weight_profit: decimal("WEIGHT_PROFIT", dec!(0.55)),
            weight_velocity: decimal("WEIGHT_VELOCITY", dec!(0.30)),
            weight_competition: decimal("WEIGHT_COMPETITION", dec!(0.15)),
            excellent_roi_pct: decimal("EXCELLENT_ROI_PCT", dec!(60)).max(dec!(1)),
            min_roi_pct: decimal("MIN_ROI_PCT", DEFAULT_MIN_ROI_PCT),
            min_margin_pct: decimal("MIN_MARGIN_PCT", DEFAULT_MIN_MARGIN_PCT),
            require_positive_margin: parsed("REQUIRE_POSITIVE_MARGIN")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            deal_reversion_threshold: decimal("DEAL_REVERSION_THRESHOLD", dec!(0.90))
                .max(dec!(0))
                .min(dec!(1)),
            deal_min_velocity: decimal("DEAL_MIN_VELOCITY", dec!(40)),
            deal_max_dominance_pct: decimal("DEAL_MAX_DOMINANCE", dec!(80)),
            deal_max_oos_pct: decimal("DEAL_MAX_OOS", dec!(30)),
            deal_min_observations: parsed("DEAL_MIN_OBSERVATIONS")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(3)
                .max(1),
            history_policy: parsed("HISTORY_POLICY")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            analysis_workers: parsed("ANALYSIS_WORKERS")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(4)
                .max(1)
                .min(MAX_ANALYSIS_WORKERS),
            input_path: parsed("INPUT_PATH"),
            output_path: parsed("OUTPUT_PATH"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
