//! Post-selection checks on opportunities

pub mod sustainability;

pub use sustainability::*;
