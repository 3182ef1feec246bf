//! Product analysis pipeline and batch runners

pub mod pipeline;
pub mod batch;
pub mod summary;

pub use pipeline::*;
pub use batch::*;
pub use summary::*;
