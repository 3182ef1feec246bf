//! Cross-border marketplace arbitrage analyzer
//!
//! Takes per-market product observations, works out the VAT-aware landed
//! cost and fee-adjusted resale value for every market pair, picks the best
//! route, scores the opportunity and checks its price history for
//! mean-reversion deals.

pub mod config;
pub mod types;
pub mod errors;
pub mod pricing;
pub mod arbitrage;
pub mod scoring;
pub mod historic;
pub mod validation;
pub mod analysis;
pub mod io;
pub mod utils;

// Re-export commonly used items
pub use config::{AnalysisConfig, Settings, CONFIG};
pub use errors::{AnalysisError, AnalysisResult};
pub use types::*;
