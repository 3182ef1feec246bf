//! Marketplace fee lookup

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use crate::{
    errors::{AnalysisError, AnalysisResult},
    types::{MarketCode, MarketRulesBook},
};

pub const DEFAULT_INBOUND_LOGISTICS: Decimal = dec!(2.00);
pub const MAX_CATEGORY_FULFILLMENT_FEE: Decimal = dec!(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FulfillmentMode {
    #[default]
    Fba,
    Fbm,
}

impl FromStr for FulfillmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FBA" => Ok(FulfillmentMode::Fba),
            "FBM" => Ok(FulfillmentMode::Fbm),
            other => Err(format!("unknown fulfillment mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryFee {
    pub referral_fee_pct: Decimal,
    pub fulfillment_fee: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeQuote {
    pub referral_fee_pct: Decimal,
    pub fixed_fee: Decimal,
}

/// Fee configuration beyond the per-market defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    pub mode: FulfillmentMode,
    pub inbound_logistics_per_unit: Decimal,
    category_fees: HashMap<(MarketCode, String), CategoryFee>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            mode: FulfillmentMode::Fba,
            inbound_logistics_per_unit: DEFAULT_INBOUND_LOGISTICS,
            category_fees: HashMap::new(),
        }
    }
}

impl FeeSchedule {
    pub fn new(mode: FulfillmentMode, inbound_logistics_per_unit: Decimal) -> Self {
        Self {
            mode,
            inbound_logistics_per_unit,
            category_fees: HashMap::new(),
        }
    }

    pub fn with_category_fee(mut self, market: MarketCode, category: &str, fee: CategoryFee) -> Self {
        self.category_fees.insert((market, category_key(category)), fee);
        self
    }

    fn category_fee(&self, market: MarketCode, category: Option<&str>) -> Option<&CategoryFee> {
        let category = category?;
        self.category_fees.get(&(market, category_key(category)))
    }
}

fn category_key(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Parses category fee overrides written as `MARKET:Category=referral/fulfillment`
/// and separated by `;`, e.g. `DE:Electronics=0.08/3.50;IT:Home & Kitchen=0.15/3.00`.
/// The referral fee is a fraction in [0, 1].
pub fn parse_category_fees(spec: &str) -> AnalysisResult<Vec<(MarketCode, String, CategoryFee)>> {
    spec.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_category_fee)
        .collect()
}

fn parse_category_fee(entry: &str) -> AnalysisResult<(MarketCode, String, CategoryFee)> {
    let malformed = |reason: &str| AnalysisError::Input {
        context: format!("category fee '{}': {}", entry, reason),
    };

    let (target, fees) = entry.split_once('=').ok_or_else(|| malformed("expected MARKET:Category=referral/fulfillment"))?;
    let (market, category) = target.split_once(':').ok_or_else(|| malformed("missing market prefix"))?;
    let (referral, fulfillment) = fees.split_once('/').ok_or_else(|| malformed("expected referral/fulfillment"))?;

    let market = MarketCode::from_str(market)?;
    let category = category.trim();
    if category.is_empty() {
        return Err(malformed("empty category"));
    }

    let referral_fee_pct = Decimal::from_str(referral.trim()).map_err(|_| malformed("referral fee is not a number"))?;
    let fulfillment_fee = Decimal::from_str(fulfillment.trim()).map_err(|_| malformed("fulfillment fee is not a number"))?;
    if referral_fee_pct < Decimal::ZERO || referral_fee_pct > dec!(1) {
        return Err(malformed("referral fee outside [0, 1]"));
    }
    if fulfillment_fee < Decimal::ZERO || fulfillment_fee > MAX_CATEGORY_FULFILLMENT_FEE {
        return Err(malformed("fulfillment fee outside [0, 1000]"));
    }

    Ok((market, category.to_string(), CategoryFee { referral_fee_pct, fulfillment_fee }))
}

/// Merchant-fulfilled shipping by parcel weight.
pub fn fbm_shipping_cost(weight_kg: Option<Decimal>) -> Decimal {
    let weight = weight_kg.unwrap_or(dec!(0.5));
    if weight < dec!(1) {
        dec!(4.50)
    } else if weight < dec!(3) {
        dec!(6.50)
    } else {
        dec!(9.50)
    }
}

/// Pure lookup over the rule book and fee schedule.
#[derive(Debug, Clone, Copy)]
pub struct FeeModel<'a> {
    rules: &'a MarketRulesBook,
    schedule: &'a FeeSchedule,
}

impl<'a> FeeModel<'a> {
    pub fn new(rules: &'a MarketRulesBook, schedule: &'a FeeSchedule) -> Self {
        Self { rules, schedule }
    }

    /// Referral percentage and fixed per-unit fee for selling in `market`.
    pub fn resolve_fees(
        &self,
        market: MarketCode,
        category: Option<&str>,
        weight_kg: Option<Decimal>,
    ) -> AnalysisResult<FeeQuote> {
        let rules = self.rules.rules_for(market)?;
        let (referral_fee_pct, fulfillment_fee) = match self.schedule.category_fee(market, category) {
            Some(fee) => (fee.referral_fee_pct, fee.fulfillment_fee),
            None => (rules.referral_fee_pct, rules.fulfillment_fee),
        };
        let handling = match self.schedule.mode {
            FulfillmentMode::Fba => fulfillment_fee,
            FulfillmentMode::Fbm => fbm_shipping_cost(weight_kg),
        };
        Ok(FeeQuote {
            referral_fee_pct,
            fixed_fee: handling + self.schedule.inbound_logistics_per_unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> MarketRulesBook {
        MarketRulesBook::standard(MarketCode::IT, &[MarketCode::IT, MarketCode::DE])
    }

    #[test]
    fn falls_back_to_market_defaults() {
        let book = book();
        let schedule = FeeSchedule::default();
        let quote = FeeModel::new(&book, &schedule).resolve_fees(MarketCode::DE, Some("Toys"), None).unwrap();
        assert_eq!(quote.referral_fee_pct, dec!(0.15));
        assert_eq!(quote.fixed_fee, dec!(5.00));
    }

    #[test]
    fn category_override_is_case_insensitive() {
        let book = book();
        let schedule = FeeSchedule::default().with_category_fee(
            MarketCode::DE,
            "Electronics",
            CategoryFee { referral_fee_pct: dec!(0.08), fulfillment_fee: dec!(4.10) },
        );
        let model = FeeModel::new(&book, &schedule);
        let quote = model.resolve_fees(MarketCode::DE, Some(" electronics "), None).unwrap();
        assert_eq!(quote.referral_fee_pct, dec!(0.08));
        assert_eq!(quote.fixed_fee, dec!(6.10));

        // same category in another market keeps the defaults
        let other = model.resolve_fees(MarketCode::IT, Some("Electronics"), None).unwrap();
        assert_eq!(other.referral_fee_pct, dec!(0.15));
    }

    #[test]
    fn parses_category_fee_list() {
        let parsed = parse_category_fees(" DE:Electronics=0.08/3.50 ; it:Home & Kitchen=0.15/3 ;").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed[0],
            (MarketCode::DE, "Electronics".to_string(), CategoryFee { referral_fee_pct: dec!(0.08), fulfillment_fee: dec!(3.50) })
        );
        assert_eq!(parsed[1].0, MarketCode::IT);
        assert_eq!(parsed[1].1, "Home & Kitchen");
        assert!(parse_category_fees("").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_category_fees() {
        for bad in ["DE:Toys", "Toys=0.1/2", "DE:=0.1/2", "DE:Toys=0.1", "DE:Toys=abc/2", "DE:Toys=1.5/2", "DE:Toys=0.1/-1"] {
            let err = parse_category_fees(bad).unwrap_err();
            assert_eq!(err.kind(), "malformed_input", "{}", bad);
        }
        let err = parse_category_fees("XX:Toys=0.1/2").unwrap_err();
        assert_eq!(err, AnalysisError::UnknownMarket { code: "XX".to_string() });
    }

    #[test]
    fn fbm_ships_by_weight() {
        let book = book();
        let schedule = FeeSchedule::new(FulfillmentMode::Fbm, dec!(0));
        let model = FeeModel::new(&book, &schedule);
        assert_eq!(model.resolve_fees(MarketCode::IT, None, None).unwrap().fixed_fee, dec!(4.50));
        assert_eq!(model.resolve_fees(MarketCode::IT, None, Some(dec!(2))).unwrap().fixed_fee, dec!(6.50));
        assert_eq!(model.resolve_fees(MarketCode::IT, None, Some(dec!(3))).unwrap().fixed_fee, dec!(9.50));
    }

    #[test]
    fn unknown_market_fails() {
        let book = book();
        let schedule = FeeSchedule::default();
        assert!(FeeModel::new(&book, &schedule).resolve_fees(MarketCode::SE, None, None).is_err());
    }
}
