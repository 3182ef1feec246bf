//! Utility functions and helpers

pub mod math;
pub mod logging;
pub mod display;

pub use math::*;
pub use logging::*;
pub use display::*;
