//! Profit figures for a single buy/sell route

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use super::MarketCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    pub buy_market: MarketCode,
    pub sell_market: MarketCode,
}

impl Route {
    pub fn new(buy_market: MarketCode, sell_market: MarketCode) -> Self {
        Self { buy_market, sell_market }
    }

    pub fn is_cross_border(&self) -> bool {
        self.buy_market != self.sell_market
    }

    /// Lexicographic key on the market codes, used as the last tie-break.
    pub fn sort_key(&self) -> (&'static str, &'static str) {
        (self.buy_market.as_str(), self.sell_market.as_str())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.buy_market, self.sell_market)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitResult {
    pub net_cost: Decimal,
    pub target_price: Decimal,
    pub referral_fee: Decimal,
    pub fixed_fee: Decimal,
    pub net_revenue: Decimal,
    pub gross_margin: Decimal,
    /// Gross margin over target price, in percent.
    pub margin_pct: Decimal,
    /// Gross margin over net cost, in percent.
    pub roi_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteProfit {
    pub route: Route,
    pub purchase_price: Decimal,
    pub profit: ProfitResult,
}
