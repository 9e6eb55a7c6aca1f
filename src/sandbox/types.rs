//! Mock backend request/response types

use serde::{Deserialize, Serialize};

use crate::models::config::{AnalysisDepth, TimeRange};
use crate::models::types::HistoryResult;

/// Error body in the backend's `detail` convention
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ErrorBody {
    pub fn invalid_address() -> Self {
        Self {
            detail: "Invalid Ethereum address".to_string(),
            error_code: Some("INVALID_ADDRESS".to_string()),
        }
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self {
            detail: format!("Analysis task {} not found", task_id),
            error_code: Some("TASK_NOT_FOUND".to_string()),
        }
    }
}

// ============================================
// Requests
// ============================================

#[derive(Debug, Deserialize)]
pub struct ContractAnalysisRequest {
    pub contract_address: String,
}

/// Query string of the history endpoint; absent parameters take the
/// client defaults
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryParams {
    pub full_analysis: bool,
    pub analysis_depth: AnalysisDepth,
    pub include_holders: bool,
    pub include_governance: bool,
    pub time_range: TimeRange,
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self {
            full_analysis: false,
            analysis_depth: AnalysisDepth::Standard,
            include_holders: true,
            include_governance: true,
            time_range: TimeRange::OneDay,
        }
    }
}

impl HistoryParams {
    /// Only a quick, non-full request is answered inline
    pub fn is_inline(&self) -> bool {
        self.analysis_depth == AnalysisDepth::Quick && !self.full_analysis
    }
}

// ============================================
// Deferred history
// ============================================

#[derive(Debug, Serialize)]
pub struct PendingBody {
    pub status: &'static str,
    pub task_id: String,
    pub estimated_completion_time: u64,
    pub quick_overview: HistoryResult,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusBody {
    Processing { checks: u32 },
    Completed { result: HistoryResult },
    Failed { error: String },
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub open_tasks: usize,
    pub requests_served: u64,
}
