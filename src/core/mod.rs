//! Core Module - Analysis flows
//!
//! - `analysis`: single-shot contract, token and gas flows
//! - `polling`: the contract-history submit/poll state machine

pub mod analysis;
pub mod polling;

pub use analysis::{AnalysisFlow, AnalysisView};
pub use polling::{HistorySession, PollingController, SessionState};
