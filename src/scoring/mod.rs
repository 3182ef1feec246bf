//! Opportunity scoring

pub mod weights;
pub mod components;
pub mod scorer;

pub use weights::*;
pub use components::*;
pub use scorer::*;
