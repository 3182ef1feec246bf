//! Margin sustainability checks on a selected route

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use crate::types::{
    HistoricSignal, ProductObservation, RouteProfit, SustainabilityLevel, SustainabilityReport,
};

const SUSPICIOUS_ROI_PCT: Decimal = dec!(80);
const MIN_VOLATILITY_INDEX: Decimal = dec!(40);
const MAX_AMAZON_SHARE_PCT: Decimal = dec!(60);
const MAX_SALES_RANK: i64 = 50_000;
const MIN_GROSS_MARGIN: Decimal = dec!(5);
const MIN_TARGET_PRICE: Decimal = dec!(15);
const CHECKS: u32 = 6;

pub fn assess_sustainability(
    best: &RouteProfit,
    sell_side: &ProductObservation,
    historic: Option<&HistoricSignal>,
) -> SustainabilityReport {
    let mut warnings = Vec::new();
    let profit = &best.profit;

    if profit.roi_pct > SUSPICIOUS_ROI_PCT {
        warnings.push(format!(
            "ROI {:.1}% above {}%: verify source data",
            profit.roi_pct, SUSPICIOUS_ROI_PCT
        ));
    }

    // Without history there is nothing to judge volatility on.
    if let Some(signal) = historic {
        if signal.volatility_index < MIN_VOLATILITY_INDEX {
            warnings.push(format!(
                "Volatile price history (index {:.1}): margins may not hold",
                signal.volatility_index
            ));
        }
    }

    if let Some(share) = sell_side.amazon_buy_box_share_pct {
        if share > MAX_AMAZON_SHARE_PCT {
            warnings.push(format!("Amazon holds the buy box {:.0}% of the time: price war risk", share));
        }
    }

    if let Some(rank) = sell_side.sales_rank {
        if rank > MAX_SALES_RANK {
            warnings.push(format!("Sales rank {} above {}: slow sell-through", rank, MAX_SALES_RANK));
        }
    }

    if profit.gross_margin < MIN_GROSS_MARGIN {
        warnings.push(format!(
            "Gross margin {:.2} below {:.2}: exposed to extra fees",
            profit.gross_margin, MIN_GROSS_MARGIN
        ));
    }

    if profit.target_price < MIN_TARGET_PRICE {
        warnings.push(format!(
            "Target price {:.2} below {:.2}: fulfillment fees dominate",
            profit.target_price, MIN_TARGET_PRICE
        ));
    }

    let count = warnings.len() as u32;
    let level = match count {
        0 => SustainabilityLevel::Excellent,
        1 => SustainabilityLevel::Good,
        2 => SustainabilityLevel::Moderate,
        _ => SustainabilityLevel::Poor,
    };

    SustainabilityReport {
        is_sustainable: count <= 1,
        level,
        confidence: 100u32.saturating_sub(count * 15),
        checks_performed: CHECKS,
        checks_passed: CHECKS - count,
        warnings,
    }
}
