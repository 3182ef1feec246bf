//! Core data types and structures

pub mod market;
pub mod observation;
pub mod profit;
pub mod opportunity;
pub mod historic;
pub mod validation;

pub use market::*;
pub use observation::*;
pub use profit::*;
pub use opportunity::*;
pub use historic::*;
pub use validation::*;
