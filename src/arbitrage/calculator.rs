//! Profit calculation for a single market pair

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use crate::{
    errors::{AnalysisError, AnalysisResult},
    types::ProfitResult,
    utils::in_range,
};

pub fn compute_profit(
    net_cost: Decimal,
    target_price: Decimal,
    referral_fee_pct: Decimal,
    fixed_fee: Decimal,
) -> AnalysisResult<ProfitResult> {
    if target_price.is_zero() {
        return Err(AnalysisError::DivisionUndefined { quantity: "margin_pct" });
    }
    if net_cost.is_zero() {
        return Err(AnalysisError::DivisionUndefined { quantity: "roi_pct" });
    }

    // Extreme prices overflow Decimal; that fails the route, never the run.
    let referral_fee = in_range(target_price.checked_mul(referral_fee_pct), target_price, "referral fee")?;
    let net_revenue = in_range(
        target_price
            .checked_sub(referral_fee)
            .and_then(|r| r.checked_sub(fixed_fee)),
        target_price,
        "net revenue",
    )?;
    let gross_margin = in_range(net_revenue.checked_sub(net_cost), net_cost, "gross margin")?;

    let margin_pct = in_range(
        gross_margin
            .checked_div(target_price)
            .and_then(|m| m.checked_mul(dec!(100))),
        target_price,
        "margin percentage",
    )?;
    let roi_pct = in_range(
        gross_margin
            .checked_div(net_cost)
            .and_then(|r| r.checked_mul(dec!(100))),
        net_cost,
        "ROI",
    )?;

    Ok(ProfitResult {
        net_cost,
        target_price,
        referral_fee,
        fixed_fee,
        net_revenue,
        gross_margin,
        margin_pct,
        roi_pct,
    })
}
