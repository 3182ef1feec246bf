//! VAT-aware cost model and fee lookup

pub mod engine;
pub mod fees;

pub use engine::*;
pub use fees::*;
