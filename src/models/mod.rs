//! Models Module - Data Structures & Configuration
//!
//! Backend payloads, client configuration and the centralized error type.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
