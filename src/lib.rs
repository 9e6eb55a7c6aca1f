//! DeFi Sentinel Library
//!
//! Terminal client for a remote contract risk-analysis backend:
//! - Contract, token and gas analysis (single request each)
//! - Contract history, including deferred analyses that are long-polled
//!   until they complete, fail or time out
//! - A local mock of the backend for demos and end-to-end tests

pub mod core;
pub mod models;
pub mod presenters;
pub mod providers;
pub mod sandbox;
pub mod utils;

pub use crate::core::{AnalysisFlow, AnalysisView, HistorySession, PollingController, SessionState};
pub use models::{
    AnalysisConfig, AnalysisDepth, AnalysisOutcome, AppError, AppResult, ClientConfig, ErrorCode,
    TimeRange,
};
pub use providers::{AnalysisBackend, ApiClient};
