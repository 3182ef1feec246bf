//! Historic price analysis types

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricSignal {
    pub is_deal: bool,
    /// 0 = at the historic high, 100 = at the historic low.
    pub momentum_index: Decimal,
    /// 0 = highly volatile, 100 = flat price history.
    pub volatility_index: Decimal,
    pub avg_90d: Decimal,
    /// Current price relative to the 90-day mean, in percent (negative = below).
    pub deviation_90d_pct: Decimal,
    pub observations_in_window: usize,
}
