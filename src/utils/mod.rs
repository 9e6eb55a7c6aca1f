//! Utils Module - Helper Functions & Shared Utilities

pub mod constants;
pub mod format;
pub mod serde_helpers;
pub mod validation;

pub use format::*;
pub use validation::*;
