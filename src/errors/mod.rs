//! Error taxonomy and propagation policy

pub mod analysis_error;
pub mod classification;

pub use analysis_error::*;
pub use classification::*;
