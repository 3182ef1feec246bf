//! Market codes and per-market VAT/fee rules

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use crate::errors::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketCode {
    IT,
    DE,
    FR,
    ES,
    NL,
    PL,
    SE,
    BE,
}

impl MarketCode {
    pub const ALL: [MarketCode; 8] = [
        MarketCode::IT,
        MarketCode::DE,
        MarketCode::FR,
        MarketCode::ES,
        MarketCode::NL,
        MarketCode::PL,
        MarketCode::SE,
        MarketCode::BE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCode::IT => "IT",
            MarketCode::DE => "DE",
            MarketCode::FR => "FR",
            MarketCode::ES => "ES",
            MarketCode::NL => "NL",
            MarketCode::PL => "PL",
            MarketCode::SE => "SE",
            MarketCode::BE => "BE",
        }
    }

    /// Standard VAT rate as a fraction.
    pub fn standard_vat_rate(&self) -> Decimal {
        match self {
            MarketCode::IT => dec!(0.22),
            MarketCode::DE => dec!(0.19),
            MarketCode::FR => dec!(0.20),
            MarketCode::ES => dec!(0.21),
            MarketCode::NL => dec!(0.21),
            MarketCode::PL => dec!(0.23),
            MarketCode::SE => dec!(0.25),
            MarketCode::BE => dec!(0.21),
        }
    }
}

impl fmt::Display for MarketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketCode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        MarketCode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == code)
            .ok_or(AnalysisError::UnknownMarket { code: s.trim().to_string() })
    }
}

/// How listed prices relate to VAT and the negotiated discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VatMode {
    /// Seller's home market: the discount is taken on the VAT-inclusive
    /// price and subtracted after VAT removal.
    InclusiveSource,
    /// Foreign market: VAT is removed first, then the discount applies.
    InclusiveDestination,
}

impl VatMode {
    /// Net acquisition cost for a gross price. Both formulas live here so the
    /// order of operations of each can be compared directly.
    pub fn net_cost(&self, gross_price: Decimal, vat_rate: Decimal, discount_pct: Decimal) -> Decimal {
        let price_ex_vat = gross_price / (dec!(1) + vat_rate);
        let net = match self {
            VatMode::InclusiveSource => {
                let discount_amount = gross_price * discount_pct;
                price_ex_vat - discount_amount
            }
            VatMode::InclusiveDestination => price_ex_vat * (dec!(1) - discount_pct),
        };
        net.max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRules {
    pub market: MarketCode,
    pub vat_rate: Decimal,
    pub vat_mode: VatMode,
    pub referral_fee_pct: Decimal,
    pub fulfillment_fee: Decimal,
}

pub const DEFAULT_REFERRAL_FEE_PCT: Decimal = dec!(0.15);
pub const DEFAULT_FULFILLMENT_FEE: Decimal = dec!(3.00);

impl MarketRules {
    pub fn standard(market: MarketCode, home: MarketCode) -> Self {
        Self {
            market,
            vat_rate: market.standard_vat_rate(),
            vat_mode: if market == home {
                VatMode::InclusiveSource
            } else {
                VatMode::InclusiveDestination
            },
            referral_fee_pct: DEFAULT_REFERRAL_FEE_PCT,
            fulfillment_fee: DEFAULT_FULFILLMENT_FEE,
        }
    }
}

/// Immutable rule table shared by every analysis in a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketRulesBook {
    rules: HashMap<MarketCode, MarketRules>,
}

impl MarketRulesBook {
    pub fn new(rules: impl IntoIterator<Item = MarketRules>) -> Self {
        Self {
            rules: rules.into_iter().map(|r| (r.market, r)).collect(),
        }
    }

    /// Standard rates for `markets`, with `home` in source-inclusive mode.
    pub fn standard(home: MarketCode, markets: &[MarketCode]) -> Self {
        Self::new(markets.iter().map(|m| MarketRules::standard(*m, home)))
    }

    pub fn rules_for(&self, market: MarketCode) -> AnalysisResult<&MarketRules> {
        self.rules.get(&market).ok_or(AnalysisError::UnknownMarket {
            code: market.as_str().to_string(),
        })
    }

    pub fn markets(&self) -> Vec<MarketCode> {
        let mut markets: Vec<MarketCode> = self.rules.keys().copied().collect();
        markets.sort_by_key(|m| m.as_str());
        markets
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
