//! Historic price analysis

pub mod window;
pub mod analyzer;

pub use window::*;
pub use analyzer::*;
