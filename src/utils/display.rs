//! Display and printing utilities

use std::time::Instant;
use tracing::{info, warn};
use crate::{
    analysis::RunSummary,
    scoring::{explain, ScoreCard},
    types::OpportunityRecord,
};

pub fn print_run_summary(start_time: Instant, summary: &RunSummary) {
    let elapsed_ms = start_time.elapsed().as_millis();

    info!("\n📊 Run Statistics ({} ms)", elapsed_ms);
    info!("   📦 PRODUCTS:");
    info!("     Total: {}", summary.total_products);
    info!("     Analyzed: {}", summary.analyzed);
    info!("     Failed: {}", summary.failed);
    info!("     Success rate: {:.1}%", summary.success_rate_pct());

    info!("   💰 OPPORTUNITIES:");
    info!("     Meeting thresholds: {}", summary.meeting_thresholds);
    info!("     Historic deals: {}", summary.historic_deals);
    info!("     Avg score: {:.1}/100", summary.avg_opportunity_score);
    info!("     Avg ROI: {:.1}%", summary.avg_roi_pct);
    info!("     Avg margin: {:.1}%", summary.avg_margin_pct);

    if !summary.route_distribution.is_empty() {
        info!("   🗺️  ROUTES:");
        for (route, count) in &summary.route_distribution {
            info!("     {}: {}", route, count);
        }
    }

    if let (Some(product), Some(route), Some(score)) =
        (&summary.best_product, &summary.best_route, summary.best_score)
    {
        info!("   🏆 Best: {} via {} ({:.1}/100)", product, route, score);
    }

    if !summary.failures_by_kind.is_empty() {
        info!("     Error summary:");
        for (kind, count) in &summary.failures_by_kind {
            info!("       {}: {}", kind, count);
        }
    }

    info!("");
}

pub fn print_opportunity(record: &OpportunityRecord) {
    let profit = &record.best.profit;
    let card = ScoreCard {
        opportunity_score: record.opportunity_score,
        sub_scores: record.sub_scores,
    };

    warn!("\n🎯 OPPORTUNITY {} ({})", record.product_id, record.best.route);
    warn!("💰 Profit Analysis:");
    warn!("   Net Cost:     {:.2}", profit.net_cost);
    warn!("   Target Price: {:.2}", profit.target_price);
    warn!("   Fees:         {:.2} referral + {:.2} fixed", profit.referral_fee, profit.fixed_fee);
    warn!("   Gross Margin: {:.2} ({:.1}%)", profit.gross_margin, profit.margin_pct);
    warn!("   ROI:          {:.1}%", profit.roi_pct);
    for line in explain(&card).lines() {
        warn!("{}", line);
    }
    if let Some(signal) = &record.historic {
        warn!(
            "📈 History: 90d avg {:.2} ({:.1}%), momentum {:.0}, volatility {:.0}{}",
            signal.avg_90d,
            signal.deviation_90d_pct,
            signal.momentum_index,
            signal.volatility_index,
            if signal.is_deal { ", DEAL" } else { "" }
        );
    }
    for warning in &record.sustainability.warnings {
        warn!("⚠️  {}", warning);
    }
}
