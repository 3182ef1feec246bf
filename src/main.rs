//! Cross-border arbitrage analyzer - Main Entry Point
//!
//! Reads product observations, analyzes every product and writes one JSON
//! line per product.

use crossborder_arb::*;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const TOP_OPPORTUNITIES: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    // Load configuration
    let settings = CONFIG.clone();

    info!("🌍 Cross-border Arbitrage Analyzer v{}", env!("CARGO_PKG_VERSION"));
    info!("📋 Configuration:");
    info!("   Home market: {}", settings.home_market);
    info!("   Markets: {}", settings.markets.join(", "));
    info!("   Discount: {}%", settings.discount_pct * rust_decimal_macros::dec!(100));
    info!("   Fulfillment: {:?}, inbound logistics {}", settings.fulfillment_mode, settings.inbound_logistics);
    info!("   Purchase strategy: {:?}", settings.purchase_strategy);
    info!("   Sale scenario: {:?}", settings.sale_scenario);
    if let Some(fees) = &settings.category_fees {
        info!("   Category fees: {}", fees);
    }
    info!("   Weights: profit {} / velocity {} / competition {}",
        settings.weight_profit, settings.weight_velocity, settings.weight_competition);
    info!("   Thresholds: ROI >= {}%, margin >= {}%", settings.min_roi_pct, settings.min_margin_pct);
    info!("   Workers: {}", settings.analysis_workers);

    // Validate configuration before touching any product
    let config = match AnalysisConfig::from_settings(&settings) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!(kind = e.kind(), "{}", e);
            return Err(e.into());
        }
    };

    let start_time = Instant::now();

    let input = std::env::args().nth(1).or_else(|| settings.input_path.clone());
    let batch = match input.as_deref() {
        Some("-") | None => {
            info!("Reading observations from stdin");
            io::read_observations(std::io::stdin().lock())?
        }
        Some(path) => io::read_observations_file(path)?,
    };

    if !batch.skipped_lines.is_empty() {
        warn!(
            count = batch.skipped_lines.len(),
            lines = ?batch.skipped_lines,
            "Malformed input lines were skipped"
        );
    }

    let outcomes = analysis::analyze_batch_concurrent(batch.records, config.clone(), settings.analysis_workers).await;

    // Show the strongest opportunities that clear the thresholds
    let mut top: Vec<&OpportunityRecord> = outcomes
        .iter()
        .filter_map(ProductOutcome::record)
        .filter(|r| r.meets_thresholds)
        .collect();
    top.sort_by(|a, b| b.opportunity_score.cmp(&a.opportunity_score));
    for record in top.iter().take(TOP_OPPORTUNITIES) {
        utils::print_opportunity(record);
    }

    let summary = analysis::RunSummary::from_outcomes(&outcomes);

    match settings.output_path.as_deref() {
        Some("-") => {
            let stdout = std::io::stdout();
            io::write_outcomes(&mut stdout.lock(), &outcomes)?;
        }
        other => {
            let path = other.map(PathBuf::from).unwrap_or_else(io::default_output_path);
            io::save_outcomes(&path, &outcomes)?;
            io::write_summary_file(path.with_extension("summary.json"), &summary)?;
        }
    }

    utils::print_run_summary(start_time, &summary);

    Ok(())
}
