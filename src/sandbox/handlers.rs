//! Mock backend request handlers

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::fixtures;
use super::types::*;
use crate::models::config::{AnalysisDepth, TimeRange};
use crate::models::types::{AnalysisResult, GasAnalysisResult, TokenAnalysisResult};
use crate::utils::constants::{
    MOCK_CHECKS_BEFORE_COMPLETE, MOCK_ESTIMATED_COMPLETION_SECS, MOCK_FAILING_ADDRESS,
    STATUS_ANALYSIS_PENDING,
};
use crate::utils::validation::is_valid_address;

type HandlerError = (StatusCode, Json<ErrorBody>);

/// A deferred history analysis
#[derive(Debug, Clone)]
pub struct MockTask {
    pub address: String,
    pub params: HistoryParamsSnapshot,
    pub checks: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Query parameters a task was created with
#[derive(Debug, Clone, Copy)]
pub struct HistoryParamsSnapshot {
    pub analysis_depth: AnalysisDepth,
    pub include_governance: bool,
    pub time_range: TimeRange,
}

impl From<&HistoryParams> for HistoryParamsSnapshot {
    fn from(p: &HistoryParams) -> Self {
        Self {
            analysis_depth: p.analysis_depth,
            include_governance: p.include_governance,
            time_range: p.time_range,
        }
    }
}

impl HistoryParamsSnapshot {
    fn to_params(self) -> HistoryParams {
        HistoryParams {
            full_analysis: true,
            analysis_depth: self.analysis_depth,
            include_governance: self.include_governance,
            time_range: self.time_range,
            ..Default::default()
        }
    }
}

/// Shared mock backend state
pub struct MockState {
    pub tasks: DashMap<String, MockTask>,
    pub checks_before_complete: u32,
    pub estimated_completion_secs: u64,
    pub start_time: Instant,
    requests: AtomicU64,
}

impl MockState {
    pub fn new() -> Self {
        Self::with_checks(MOCK_CHECKS_BEFORE_COMPLETE)
    }

    /// State whose tasks report `processing` for `checks` status calls
    pub fn with_checks(checks: u32) -> Self {
        Self {
            tasks: DashMap::new(),
            checks_before_complete: checks,
            estimated_completion_secs: MOCK_ESTIMATED_COMPLETION_SECS,
            start_time: Instant::now(),
            requests: AtomicU64::new(0),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    fn served(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

fn check_address(address: &str) -> Result<(), HandlerError> {
    if is_valid_address(address) {
        Ok(())
    } else {
        warn!("🚫 Rejected invalid address {:?}", address);
        Err((StatusCode::BAD_REQUEST, Json(ErrorBody::invalid_address())))
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<MockState>>) -> Json<HealthData> {
    Json(HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        open_tasks: state.tasks.len(),
        requests_served: state.requests.load(Ordering::Relaxed),
    })
}

// ============================================
// Single-shot analyses
// ============================================

pub async fn analyze_contract(
    State(state): State<Arc<MockState>>,
    Json(req): Json<ContractAnalysisRequest>,
) -> Result<Json<AnalysisResult>, HandlerError> {
    state.served();
    check_address(&req.contract_address)?;
    info!("🔍 Analysing contract {}", req.contract_address);
    Ok(Json(fixtures::contract_analysis(&req.contract_address)))
}

pub async fn token_analysis(
    State(state): State<Arc<MockState>>,
    Path(address): Path<String>,
) -> Result<Json<TokenAnalysisResult>, HandlerError> {
    state.served();
    check_address(&address)?;
    Ok(Json(fixtures::token_analysis(&address)))
}

pub async fn gas_analysis(
    State(state): State<Arc<MockState>>,
    Path(address): Path<String>,
) -> Result<Json<GasAnalysisResult>, HandlerError> {
    state.served();
    check_address(&address)?;
    Ok(Json(fixtures::gas_analysis(&address)))
}

// ============================================
// Contract History
// ============================================

pub async fn contract_history(
    State(state): State<Arc<MockState>>,
    Path(address): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    state.served();
    check_address(&address)?;

    if params.is_inline() {
        info!("📜 History for {} answered inline", address);
        let result = fixtures::history(&address, &params);
        return Ok(Json(serde_json::to_value(result).unwrap_or_default()));
    }

    let task_id = uuid::Uuid::new_v4().to_string();
    state.tasks.insert(
        task_id.clone(),
        MockTask {
            address: address.to_lowercase(),
            params: HistoryParamsSnapshot::from(&params),
            checks: 0,
            created_at: chrono::Utc::now(),
        },
    );
    info!(
        "⏳ History for {} deferred as task {} ({} open)",
        address,
        task_id,
        state.tasks.len()
    );

    let body = PendingBody {
        status: STATUS_ANALYSIS_PENDING,
        task_id,
        estimated_completion_time: state.estimated_completion_secs,
        quick_overview: fixtures::quick_overview(&address, &params),
    };
    Ok(Json(serde_json::to_value(body).unwrap_or_default()))
}

pub async fn history_status(
    State(state): State<Arc<MockState>>,
    Path((address, task_id)): Path<(String, String)>,
) -> Result<Json<StatusBody>, HandlerError> {
    state.served();
    check_address(&address)?;

    let not_found = || {
        warn!("❓ Unknown task {} for {}", task_id, address);
        (StatusCode::NOT_FOUND, Json(ErrorBody::task_not_found(&task_id)))
    };

    let task = {
        let mut entry = state.tasks.get_mut(&task_id).ok_or_else(not_found)?;
        if entry.address != address.to_lowercase() {
            return Err(not_found());
        }
        entry.checks += 1;
        entry.clone()
    };

    if task.address == MOCK_FAILING_ADDRESS {
        state.tasks.remove(&task_id);
        warn!("❌ Task {} failed on purpose", task_id);
        return Ok(Json(StatusBody::Failed {
            error: "Archive node unavailable for this contract".to_string(),
        }));
    }

    if task.checks <= state.checks_before_complete {
        return Ok(Json(StatusBody::Processing {
            checks: task.checks,
        }));
    }

    state.tasks.remove(&task_id);
    let elapsed = chrono::Utc::now() - task.created_at;
    info!(
        "✅ Task {} completed after {} checks ({}s)",
        task_id,
        task.checks,
        elapsed.num_seconds()
    );
    Ok(Json(StatusBody::Completed {
        result: fixtures::history(&address, &task.params.to_params()),
    }))
}
