//! Profit, velocity and competition sub-scores, each on a 0-100 scale

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use crate::{
    types::ProductObservation,
    utils::{clamp_score, from_f64_or_zero},
};
use super::ScoringParams;

// Used when the data source leaves a field empty.
pub const DEFAULT_SALES_RANK: i64 = 999_999;
pub const DEFAULT_AMAZON_SHARE_PCT: Decimal = dec!(50);
pub const DEFAULT_WINNER_COUNT: u32 = 5;

const ROI_POINTS: Decimal = dec!(70);
const NEGATIVE_ROI_PENALTY: Decimal = dec!(40);
const RANK_FLOOR_SCORE: Decimal = dec!(10);
const RANK_CEILING: i64 = 500_000;
const MAX_RATING: Decimal = dec!(5);

pub fn profit_score(roi_pct: Decimal, margin_pct: Decimal, params: &ScoringParams) -> Decimal {
    let roi_ratio = if params.excellent_roi_pct > Decimal::ZERO {
        roi_pct
            .checked_div(params.excellent_roi_pct)
            .unwrap_or(if roi_pct > Decimal::ZERO { dec!(1) } else { dec!(0) })
            .max(dec!(0))
            .min(dec!(1))
    } else {
        dec!(0)
    };
    let mut score = roi_ratio * ROI_POINTS;
    if roi_pct < Decimal::ZERO {
        score -= NEGATIVE_ROI_PENALTY;
    }

    let margin_bonus = if margin_pct > dec!(35) {
        dec!(30)
    } else if margin_pct > dec!(25) {
        dec!(15)
    } else {
        dec!(0)
    };

    clamp_score(score + margin_bonus)
}

/// Log-scaled sales rank: rank 1 scores 100, rank 100 000 scores 25.
pub fn rank_score(sales_rank: i64) -> Decimal {
    if sales_rank <= 0 {
        return dec!(0);
    }
    if sales_rank >= RANK_CEILING {
        return RANK_FLOOR_SCORE;
    }
    let scaled = 100.0 - (sales_rank as f64).log10() * 15.0;
    from_f64_or_zero(scaled).max(RANK_FLOOR_SCORE)
}

pub fn velocity_score(obs: &ProductObservation) -> Decimal {
    let rank = rank_score(obs.sales_rank.unwrap_or(DEFAULT_SALES_RANK));

    let rating = obs.rating.unwrap_or(Decimal::ZERO).max(dec!(0)).min(MAX_RATING);
    let rating_bonus = if rating > dec!(3) {
        (rating - dec!(3)) * dec!(10)
    } else {
        dec!(0)
    };

    let offers = Decimal::from(obs.offer_count.unwrap_or(0));
    let offer_bonus = (offers * dec!(2)).min(dec!(20));

    clamp_score(rank + rating_bonus + offer_bonus)
}

/// Falls with Amazon's buy-box share and the number of rotating winners.
/// A listing Amazon holds all the time scores 0.
pub fn competition_score(obs: &ProductObservation) -> Decimal {
    let amazon_pct = obs
        .amazon_buy_box_share_pct
        .unwrap_or(DEFAULT_AMAZON_SHARE_PCT)
        .max(dec!(0))
        .min(dec!(100));
    let winners = obs.buy_box_winner_count.unwrap_or(DEFAULT_WINNER_COUNT).min(20);
    let oos_pct = obs
        .out_of_stock_pct
        .unwrap_or(Decimal::ZERO)
        .max(dec!(0))
        .min(dec!(100));

    let open_share = dec!(100) - amazon_pct;
    let winner_factor = dec!(1) - Decimal::from(winners) * dec!(0.025);

    let oos_bonus = if oos_pct > dec!(10) {
        ((oos_pct - dec!(10)) * dec!(0.5)).min(dec!(15))
    } else {
        dec!(0)
    };

    clamp_score(open_share * winner_factor + oos_bonus * open_share / dec!(100))
}
