//! Analysis backend abstraction
//!
//! `AnalysisBackend` is the seam between the flows in `core` and the transport.
//! `ApiClient` implements it over HTTP; tests plug in scripted backends.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::models::config::HistoryQuery;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{
    AnalysisResult, GasAnalysisResult, HistoryResponse, HistoryResult, PendingAnalysis,
    PollStatus, TaskHandle, TokenAnalysisResult,
};
use crate::utils::constants::{
    MSG_NO_RESPONSE, STATUS_ANALYSIS_PENDING, STATUS_COMPLETED, STATUS_FAILED,
};

/// Remote analysis service. Every error is already normalized.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// `POST /analyze-contract`
    async fn submit_contract_analysis(&self, address: &str) -> AppResult<AnalysisResult>;

    /// `GET /token-analysis/{address}`
    async fn fetch_token_analysis(&self, address: &str) -> AppResult<TokenAnalysisResult>;

    /// `GET /gas-analysis/{address}`
    async fn fetch_gas_analysis(&self, address: &str) -> AppResult<GasAnalysisResult>;

    /// `GET /contract-history/{address}`: immediate result or deferred task
    async fn request_contract_history(
        &self,
        address: &str,
        query: &HistoryQuery,
    ) -> AppResult<HistoryResponse>;

    /// `GET /contract-history/{address}/status/{task_id}`
    async fn poll_history_status(&self, address: &str, task_id: &str) -> AppResult<PollStatus>;
}

/// A JSON string that is present and non-empty
fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Classify a history response body.
///
/// A non-empty `contract_address` means the result is final; otherwise
/// `status == "analysis_pending"` plus a `task_id` means the work was
/// deferred. Anything else is `UnexpectedResponseFormat`.
pub fn parse_history_response(body: Value) -> AppResult<HistoryResponse> {
    if body.is_null() {
        return Err(AppError::new(ErrorCode::InvalidResponse, MSG_NO_RESPONSE));
    }

    if non_empty_str(&body, "contract_address").is_some() {
        let result: HistoryResult = serde_json::from_value(body)?;
        return Ok(HistoryResponse::Immediate(result));
    }

    let is_pending = body.get("status").and_then(Value::as_str) == Some(STATUS_ANALYSIS_PENDING);
    if let (true, Some(task_id)) = (is_pending, non_empty_str(&body, "task_id")) {
        let estimated_completion_secs = body
            .get("estimated_completion_time")
            .and_then(Value::as_f64)
            .map(|secs| secs.max(0.0).round() as u64)
            .unwrap_or(0);

        let quick_overview = match body.get("quick_overview") {
            None | Some(Value::Null) => None,
            Some(raw) => match serde_json::from_value::<HistoryResult>(raw.clone()) {
                Ok(preview) => Some(preview),
                Err(e) => {
                    warn!("⚠️ Ignoring undecodable quick overview for task {}: {}", task_id, e);
                    None
                }
            },
        };

        return Ok(HistoryResponse::Pending(PendingAnalysis {
            handle: TaskHandle {
                task_id: task_id.to_string(),
                estimated_completion_secs,
            },
            quick_overview,
        }));
    }

    Err(AppError::unexpected_format().with_details(body))
}

/// Classify a status-endpoint body
pub fn parse_poll_status(body: Value) -> AppResult<PollStatus> {
    let Some(status) = body.get("status").and_then(Value::as_str) else {
        return Err(AppError::unexpected_format().with_details(body.clone()));
    };

    match status {
        STATUS_COMPLETED => match body.get("result") {
            Some(raw) if !raw.is_null() => {
                let result: HistoryResult = serde_json::from_value(raw.clone())?;
                Ok(PollStatus::Completed(result))
            }
            _ => Err(AppError::unexpected_format().with_details(body.clone())),
        },
        STATUS_FAILED => Ok(PollStatus::Failed(
            non_empty_str(&body, "error").map(str::to_string),
        )),
        other => Ok(PollStatus::InProgress(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDR: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    #[test]
    fn test_direct_result_is_immediate() {
        let body = json!({
            "contract_address": ADDR,
            "transactions": { "total_count": 4 }
        });
        match parse_history_response(body).unwrap() {
            HistoryResponse::Immediate(r) => {
                assert_eq!(r.contract_address, ADDR);
                assert_eq!(r.transactions.total_count, 4);
                assert_eq!(r.events.total_count, 0);
            }
            other => panic!("expected immediate, got {:?}", other),
        }
    }

    #[test]
    fn test_pending_payload() {
        let body = json!({
            "status": "analysis_pending",
            "task_id": "T1",
            "estimated_completion_time": 12,
            "quick_overview": { "contract_address": ADDR }
        });
        match parse_history_response(body).unwrap() {
            HistoryResponse::Pending(p) => {
                assert_eq!(p.handle.task_id, "T1");
                assert_eq!(p.handle.estimated_completion_secs, 12);
                assert_eq!(p.quick_overview.unwrap().contract_address, ADDR);
            }
            other => panic!("expected pending, got {:?}", other),
        }
    }

    #[test]
    fn test_pending_without_task_id_is_unexpected() {
        let body = json!({ "status": "analysis_pending" });
        let err = parse_history_response(body).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedResponseFormat);
    }

    #[test]
    fn test_unknown_shape_is_unexpected() {
        let err = parse_history_response(json!({ "message": "ok" })).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedResponseFormat);
        assert_eq!(err.message, "Unexpected response format from server");

        let err = parse_history_response(Value::Null).unwrap_err();
        assert_eq!(err.message, "No response from server");
    }

    #[test]
    fn test_poll_status_variants() {
        assert_eq!(
            parse_poll_status(json!({ "status": "processing" })).unwrap(),
            PollStatus::InProgress("processing".into())
        );
        assert_eq!(
            parse_poll_status(json!({ "status": "failed", "error": "node unavailable" })).unwrap(),
            PollStatus::Failed(Some("node unavailable".into()))
        );
        assert_eq!(
            parse_poll_status(json!({ "status": "failed" })).unwrap(),
            PollStatus::Failed(None)
        );
        match parse_poll_status(json!({ "status": "completed", "result": { "contract_address": ADDR } }))
            .unwrap()
        {
            PollStatus::Completed(r) => assert_eq!(r.contract_address, ADDR),
            other => panic!("expected completed, got {:?}", other),
        }
    }

    #[test]
    fn test_completed_without_result_is_unexpected() {
        let err = parse_poll_status(json!({ "status": "completed" })).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedResponseFormat);
        let err = parse_poll_status(json!({ "result": {} })).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedResponseFormat);
    }
}
