//! Net acquisition cost and target sale price

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;
use crate::{
    errors::{AnalysisError, AnalysisResult},
    types::{MarketCode, MarketRules, MarketRulesBook, ProductObservation},
    utils::in_range,
};

/// Sale horizon: how patient the seller is willing to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaleScenario {
    Short,
    #[default]
    Medium,
    Long,
}

impl SaleScenario {
    pub fn adjustment_pct(&self) -> Decimal {
        match self {
            SaleScenario::Short => dec!(-0.05),
            SaleScenario::Medium => dec!(0),
            SaleScenario::Long => dec!(0.05),
        }
    }
}

impl FromStr for SaleScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "conservative" => Ok(SaleScenario::Short),
            "medium" | "current" => Ok(SaleScenario::Medium),
            "long" | "aggressive" => Ok(SaleScenario::Long),
            other => Err(format!("unknown sale scenario '{}'", other)),
        }
    }
}

/// Which listed price the operator actually pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PurchaseStrategy {
    #[default]
    BuyBoxCurrent,
    AmazonCurrent,
    NewFbaCurrent,
    NewFbmCurrent,
}

impl PurchaseStrategy {
    /// Strategy price when present and positive, else the gross listed price.
    pub fn purchase_price(&self, obs: &ProductObservation) -> Decimal {
        let selected = match self {
            PurchaseStrategy::BuyBoxCurrent => obs.prices.buy_box,
            PurchaseStrategy::AmazonCurrent => obs.prices.amazon,
            PurchaseStrategy::NewFbaCurrent => obs.prices.new_fba,
            PurchaseStrategy::NewFbmCurrent => obs.prices.new_fbm,
        };
        selected
            .filter(|p| *p > Decimal::ZERO)
            .unwrap_or(obs.gross_price)
    }
}

impl FromStr for PurchaseStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "buyboxcurrent" | "buybox" => Ok(PurchaseStrategy::BuyBoxCurrent),
            "amazoncurrent" | "amazon" => Ok(PurchaseStrategy::AmazonCurrent),
            "newfbacurrent" | "fba" => Ok(PurchaseStrategy::NewFbaCurrent),
            "newfbmcurrent" | "fbm" => Ok(PurchaseStrategy::NewFbmCurrent),
            _ => Err(format!("unknown purchase strategy '{}'", s)),
        }
    }
}

pub fn compute_net_cost(gross_price: Decimal, rules: &MarketRules, discount_pct: Decimal) -> AnalysisResult<Decimal> {
    if gross_price < Decimal::ZERO {
        return Err(AnalysisError::InvalidPrice {
            price: gross_price,
            context: format!("gross price in {}", rules.market),
        });
    }
    Ok(rules.vat_mode.net_cost(gross_price, rules.vat_rate, discount_pct))
}

pub fn compute_target_price(base_price: Decimal, scenario_adjustment_pct: Decimal) -> AnalysisResult<Decimal> {
    if base_price < Decimal::ZERO {
        return Err(AnalysisError::InvalidPrice {
            price: base_price,
            context: "target base price".to_string(),
        });
    }
    in_range(
        base_price.checked_mul(dec!(1) + scenario_adjustment_pct),
        base_price,
        "target price",
    )
}

/// Pricing bound to a rule book and a negotiated discount.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'a> {
    rules: &'a MarketRulesBook,
    discount_pct: Decimal,
}

impl<'a> PricingEngine<'a> {
    pub fn new(rules: &'a MarketRulesBook, discount_pct: Decimal) -> Self {
        Self { rules, discount_pct }
    }

    pub fn net_cost(&self, gross_price: Decimal, market: MarketCode) -> AnalysisResult<Decimal> {
        let rules = self.rules.rules_for(market)?;
        let net = compute_net_cost(gross_price, rules, self.discount_pct)?;
        trace!(%market, %gross_price, %net, mode = ?rules.vat_mode, "net cost");
        Ok(net)
    }

    /// Target sale price from the sell-market observation.
    pub fn target_price(&self, obs: &ProductObservation, scenario: SaleScenario) -> AnalysisResult<Decimal> {
        self.rules.rules_for(obs.market)?;
        let base = obs.prices.reference_price().unwrap_or(obs.gross_price);
        compute_target_price(base, scenario.adjustment_pct())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PricePoints, VatMode};

    fn book() -> MarketRulesBook {
        MarketRulesBook::standard(MarketCode::IT, &[MarketCode::IT, MarketCode::DE, MarketCode::FR])
    }

    #[test]
    fn home_market_discount_before_vat_removal() {
        let book = book();
        let engine = PricingEngine::new(&book, dec!(0.21));
        let net = engine.net_cost(dec!(200), MarketCode::IT).unwrap();
        // 200 / 1.22 = 163.934..., minus 200 * 0.21 = 42
        assert_eq!(net.round_dp(2), dec!(121.93));
    }

    #[test]
    fn foreign_market_discount_after_vat_removal() {
        let book = book();
        let engine = PricingEngine::new(&book, dec!(0.21));
        let net = engine.net_cost(dec!(200), MarketCode::DE).unwrap();
        // 200 / 1.19 = 168.067..., times 0.79
        assert_eq!(net.round_dp(2), dec!(132.77));
    }

    #[test]
    fn modes_differ_for_same_inputs() {
        let source = VatMode::InclusiveSource.net_cost(dec!(200), dec!(0.22), dec!(0.21));
        let destination = VatMode::InclusiveDestination.net_cost(dec!(200), dec!(0.22), dec!(0.21));
        assert!(source < destination);
        assert_eq!(destination.round_dp(2), dec!(129.51));
    }

    #[test]
    fn zero_discount_only_strips_vat() {
        let book = book();
        let engine = PricingEngine::new(&book, Decimal::ZERO);
        assert_eq!(engine.net_cost(dec!(120), MarketCode::FR).unwrap(), dec!(100));
    }

    #[test]
    fn negative_price_is_rejected() {
        let book = book();
        let engine = PricingEngine::new(&book, dec!(0.21));
        let err = engine.net_cost(dec!(-5), MarketCode::DE).unwrap_err();
        assert_eq!(err.kind(), "invalid_price");
    }

    #[test]
    fn unconfigured_market_is_rejected() {
        let book = book();
        let engine = PricingEngine::new(&book, dec!(0.21));
        let err = engine.net_cost(dec!(10), MarketCode::ES).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownMarket { code: "ES".into() });
    }

    #[test]
    fn scenario_adjusts_target_price() {
        assert_eq!(compute_target_price(dec!(100), SaleScenario::Short.adjustment_pct()).unwrap(), dec!(95.00));
        assert_eq!(compute_target_price(dec!(100), SaleScenario::Medium.adjustment_pct()).unwrap(), dec!(100));
        assert_eq!(compute_target_price(dec!(100), SaleScenario::Long.adjustment_pct()).unwrap(), dec!(105.00));
    }

    #[test]
    fn long_scenario_on_max_price_is_out_of_range() {
        let err = compute_target_price(Decimal::MAX, SaleScenario::Long.adjustment_pct()).unwrap_err();
        assert_eq!(err.kind(), "invalid_price");
        assert_eq!(compute_target_price(Decimal::MAX, dec!(0)), Ok(Decimal::MAX));
    }

    #[test]
    fn target_prefers_buy_box_then_amazon() {
        let book = book();
        let engine = PricingEngine::new(&book, dec!(0.21));
        let obs = ProductObservation::new("B1", MarketCode::DE, dec!(80))
            .unwrap()
            .with_prices(PricePoints {
                buy_box: None,
                amazon: Some(dec!(90)),
                new_fba: Some(dec!(95)),
                new_fbm: None,
            });
        assert_eq!(engine.target_price(&obs, SaleScenario::Medium).unwrap(), dec!(90));

        let bare = ProductObservation::new("B1", MarketCode::DE, dec!(80)).unwrap();
        assert_eq!(engine.target_price(&bare, SaleScenario::Long).unwrap(), dec!(84.00));
    }

    #[test]
    fn purchase_strategy_falls_back_to_gross_price() {
        let obs = ProductObservation::new("B1", MarketCode::IT, dec!(50))
            .unwrap()
            .with_prices(PricePoints {
                buy_box: Some(dec!(48)),
                amazon: Some(dec!(0)),
                new_fba: None,
                new_fbm: None,
            });
        assert_eq!(PurchaseStrategy::BuyBoxCurrent.purchase_price(&obs), dec!(48));
        assert_eq!(PurchaseStrategy::AmazonCurrent.purchase_price(&obs), dec!(50));
        assert_eq!(PurchaseStrategy::NewFbmCurrent.purchase_price(&obs), dec!(50));
    }

    #[test]
    fn parses_selectors() {
        assert_eq!("Buy Box Current".parse::<PurchaseStrategy>(), Ok(PurchaseStrategy::BuyBoxCurrent));
        assert_eq!("new-fbm-current".parse::<PurchaseStrategy>(), Ok(PurchaseStrategy::NewFbmCurrent));
        assert_eq!("LONG".parse::<SaleScenario>(), Ok(SaleScenario::Long));
        assert!("weekly".parse::<SaleScenario>().is_err());
    }
}
