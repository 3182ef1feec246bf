//! Configuration management for the arbitrage analyzer

pub mod settings;
pub mod analysis;

pub use settings::*;
pub use analysis::*;

use lazy_static::lazy_static;

lazy_static! {
    pub static ref CONFIG: Settings = Settings::load();
}
