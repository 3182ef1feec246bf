//! Profit calculation and cross-market route selection

pub mod calculator;
pub mod router;

pub use calculator::*;
pub use router::*;
