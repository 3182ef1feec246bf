//! Product observations: one product in one market at one point in time

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::errors::{AnalysisError, AnalysisResult};
use super::MarketCode;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// Current prices by offer type, when the data source provides them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoints {
    pub buy_box: Option<Decimal>,
    pub amazon: Option<Decimal>,
    pub new_fba: Option<Decimal>,
    pub new_fbm: Option<Decimal>,
}

impl PricePoints {
    /// First positive price in buy-box, Amazon, FBA, FBM order.
    pub fn reference_price(&self) -> Option<Decimal> {
        [self.buy_box, self.amazon, self.new_fba, self.new_fbm]
            .into_iter()
            .flatten()
            .find(|p| *p > Decimal::ZERO)
    }

    fn validate(&self, product_id: &str) -> AnalysisResult<()> {
        for (label, price) in [
            ("buy box", self.buy_box),
            ("amazon", self.amazon),
            ("new fba", self.new_fba),
            ("new fbm", self.new_fbm),
        ] {
            if let Some(p) = price {
                if p < Decimal::ZERO {
                    return Err(AnalysisError::InvalidPrice {
                        price: p,
                        context: format!("{} {} price", product_id, label),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Input record as produced by the ingestion side. The market code is still
/// a string here; conversion validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub product_id: String,
    pub market_code: String,
    pub gross_price: Decimal,
    #[serde(default)]
    pub prices: PricePoints,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<Decimal>,
    #[serde(default)]
    pub price_history: Option<Vec<PricePoint>>,
    #[serde(default)]
    pub sales_rank: Option<i64>,
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub offer_count: Option<u32>,
    #[serde(default)]
    pub buy_box_winner_count: Option<u32>,
    #[serde(default)]
    pub amazon_buy_box_share_pct: Option<Decimal>,
    #[serde(default)]
    pub out_of_stock_pct: Option<Decimal>,
    #[serde(default)]
    pub prime_eligible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductObservation {
    pub product_id: String,
    pub market: MarketCode,
    pub gross_price: Decimal,
    pub prices: PricePoints,
    pub category: Option<String>,
    pub weight_kg: Option<Decimal>,
    /// Sorted by timestamp, oldest first.
    pub price_history: Option<Vec<PricePoint>>,
    pub sales_rank: Option<i64>,
    pub rating: Option<Decimal>,
    pub offer_count: Option<u32>,
    pub buy_box_winner_count: Option<u32>,
    pub amazon_buy_box_share_pct: Option<Decimal>,
    pub out_of_stock_pct: Option<Decimal>,
    pub prime_eligible: bool,
}

impl ProductObservation {
    pub fn new(product_id: impl Into<String>, market: MarketCode, gross_price: Decimal) -> AnalysisResult<Self> {
        let product_id = product_id.into();
        if gross_price < Decimal::ZERO {
            return Err(AnalysisError::InvalidPrice {
                price: gross_price,
                context: format!("{} gross price in {}", product_id, market),
            });
        }
        Ok(Self {
            product_id,
            market,
            gross_price,
            prices: PricePoints::default(),
            category: None,
            weight_kg: None,
            price_history: None,
            sales_rank: None,
            rating: None,
            offer_count: None,
            buy_box_winner_count: None,
            amazon_buy_box_share_pct: None,
            out_of_stock_pct: None,
            prime_eligible: false,
        })
    }

    pub fn with_prices(mut self, prices: PricePoints) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_history(mut self, mut history: Vec<PricePoint>) -> Self {
        history.sort_by_key(|p| p.timestamp);
        self.price_history = Some(history);
        self
    }

    pub fn with_demand(mut self, sales_rank: Option<i64>, rating: Option<Decimal>, offer_count: Option<u32>) -> Self {
        self.sales_rank = sales_rank;
        self.rating = rating;
        self.offer_count = offer_count;
        self
    }

    pub fn with_buy_box(
        mut self,
        winner_count: Option<u32>,
        amazon_share_pct: Option<Decimal>,
        out_of_stock_pct: Option<Decimal>,
    ) -> Self {
        self.buy_box_winner_count = winner_count;
        self.amazon_buy_box_share_pct = amazon_share_pct;
        self.out_of_stock_pct = out_of_stock_pct;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl TryFrom<RawObservation> for ProductObservation {
    type Error = AnalysisError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        let market: MarketCode = raw.market_code.parse()?;
        raw.prices.validate(&raw.product_id)?;

        let mut obs = ProductObservation::new(raw.product_id, market, raw.gross_price)?
            .with_prices(raw.prices)
            .with_demand(raw.sales_rank, raw.rating, raw.offer_count)
            .with_buy_box(
                raw.buy_box_winner_count,
                raw.amazon_buy_box_share_pct,
                raw.out_of_stock_pct,
            );
        obs.category = raw.category;
        obs.weight_kg = raw.weight_kg;
        obs.prime_eligible = raw.prime_eligible.unwrap_or(false);
        if let Some(history) = raw.price_history {
            obs = obs.with_history(history);
        }
        Ok(obs)
    }
}
