//! Providers Module - Backend access
//!
//! The `AnalysisBackend` trait and its HTTP implementation.

pub mod backend;
pub mod http;

pub use backend::*;
pub use http::*;
