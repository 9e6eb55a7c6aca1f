//! HTTP client for the analysis backend
//!
//! Wraps the five backend endpoints and normalizes every failure into an
//! `AppError`:
//! - no response        -> `Network` / `Timeout`, caller's fallback message
//! - non-2xx            -> `Server`, backend `detail` if present, else fallback
//! - undecodable 2xx    -> `InvalidResponse`, fallback message
//!
//! Raw `reqwest` errors never leave this module.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::models::config::{ClientConfig, HistoryQuery};
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{
    AnalysisResult, GasAnalysisResult, HistoryResponse, PollStatus, TokenAnalysisResult,
};
use crate::providers::backend::{parse_history_response, parse_poll_status, AnalysisBackend};
use crate::utils::constants::{
    MSG_ANALYZE_CONTRACT_FAILED, MSG_GAS_ANALYSIS_FAILED, MSG_HISTORY_FAILED, MSG_STATUS_FAILED,
    MSG_TOKEN_ANALYSIS_FAILED, PATH_ANALYZE_CONTRACT, PATH_CONTRACT_HISTORY, PATH_GAS_ANALYSIS,
    PATH_TOKEN_ANALYSIS,
};

/// Backend REST client.
///
/// Addresses are sent as given; validation belongs to `AnalysisFlow` and
/// `PollingController`. Path arguments are percent-encoded per segment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Build a client from an explicit configuration
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| {
            AppError::invalid_config(format!("Invalid user agent: {}", config.user_agent))
        })?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorCode::ConfigInvalidValue, "Failed to build HTTP client", e)
            })?;

        Ok(Self { client, config })
    }

    /// Client configured from the environment
    pub fn from_env() -> AppResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and return its JSON body, normalizing every failure
    async fn send_json(&self, request: RequestBuilder, fallback: &'static str) -> AppResult<Value> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let mut err = AppError::from(e);
                error!("❌ {} [{}]: {}", fallback, err.code_str(), err.message);
                err.message = fallback.to_string();
                return Err(err);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let mut err = AppError::from(e);
                error!("❌ {} [{}]: failed to read body: {}", fallback, err.code_str(), err.message);
                err.message = fallback.to_string();
                return Err(err);
            }
        };

        if !status.is_success() {
            let err = server_error(status, &bytes, fallback);
            error!(
                status = %status.as_u16(),
                code = err.code_str(),
                backend_code = ?err.backend_code,
                "❌ Backend error: {}",
                err.message
            );
            return Err(err);
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            error!("❌ {}: response is not JSON: {}", fallback, e);
            AppError::with_source(ErrorCode::InvalidResponse, fallback, e)
        })
    }

    /// Decode a JSON body into a typed result
    fn decode<T: DeserializeOwned>(body: Value, fallback: &'static str) -> AppResult<T> {
        serde_json::from_value(body).map_err(|e| {
            error!("❌ {}: unexpected payload: {}", fallback, e);
            AppError::with_source(ErrorCode::InvalidResponse, fallback, e)
        })
    }

    /// Keep the shape error codes, but never leak serde wording to the caller
    fn relabel(err: AppError, fallback: &'static str) -> AppError {
        match err.code {
            ErrorCode::InvalidResponse if err.source.is_some() => {
                error!("❌ {}: {}", fallback, err.message);
                AppError {
                    message: fallback.to_string(),
                    ..err
                }
            }
            _ => {
                warn!("⚠️ {} [{}]", err.message, err.code_str());
                err
            }
        }
    }
}

/// Build the normalized error for a non-2xx response.
///
/// Message policy: the backend's `detail` string when present, otherwise the
/// caller's fallback message.
pub fn server_error(status: StatusCode, body: &[u8], fallback: &str) -> AppError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("detail"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback)
        .to_string();

    let mut err = AppError::server(message);

    if let Some(code) = parsed.as_ref().and_then(|v| {
        v.get("error_code")
            .or_else(|| v.get("code"))
            .and_then(|c| match c {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }) {
        err = err.with_backend_code(code);
    } else {
        err = err.with_backend_code(status.as_u16().to_string());
    }

    match parsed {
        Some(body) => err.with_details(body),
        None if !body.is_empty() => {
            err.with_details(Value::String(String::from_utf8_lossy(body).into_owned()))
        }
        None => err,
    }
}

#[async_trait]
impl AnalysisBackend for ApiClient {
    async fn submit_contract_analysis(&self, address: &str) -> AppResult<AnalysisResult> {
        let url = self.config.endpoint(&[PATH_ANALYZE_CONTRACT])?;
        info!("🔍 Submitting contract analysis for {}", address);

        let request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "contract_address": address }));
        let body = self.send_json(request, MSG_ANALYZE_CONTRACT_FAILED).await?;
        Self::decode(body, MSG_ANALYZE_CONTRACT_FAILED)
    }

    async fn fetch_token_analysis(&self, address: &str) -> AppResult<TokenAnalysisResult> {
        let url = self.config.endpoint(&[PATH_TOKEN_ANALYSIS, address])?;
        info!("🔍 Fetching token analysis for {}", address);

        let body = self
            .send_json(self.client.get(url), MSG_TOKEN_ANALYSIS_FAILED)
            .await?;
        Self::decode(body, MSG_TOKEN_ANALYSIS_FAILED)
    }

    async fn fetch_gas_analysis(&self, address: &str) -> AppResult<GasAnalysisResult> {
        let url = self.config.endpoint(&[PATH_GAS_ANALYSIS, address])?;
        info!("⛽ Fetching gas analysis for {}", address);

        let body = self
            .send_json(self.client.get(url), MSG_GAS_ANALYSIS_FAILED)
            .await?;
        Self::decode(body, MSG_GAS_ANALYSIS_FAILED)
    }

    async fn request_contract_history(
        &self,
        address: &str,
        query: &HistoryQuery,
    ) -> AppResult<HistoryResponse> {
        let url = self.config.endpoint(&[PATH_CONTRACT_HISTORY, address])?;
        info!(
            "📜 Requesting contract history for {} (depth: {}, range: {}, full: {})",
            address, query.analysis_depth, query.time_range, query.full_analysis
        );

        let body = self
            .send_json(self.client.get(url).query(query), MSG_HISTORY_FAILED)
            .await?;
        parse_history_response(body).map_err(|e| Self::relabel(e, MSG_HISTORY_FAILED))
    }

    async fn poll_history_status(&self, address: &str, task_id: &str) -> AppResult<PollStatus> {
        let url = self
            .config
            .endpoint(&[PATH_CONTRACT_HISTORY, address, "status", task_id])?;
        debug!("⏳ Checking status of task {} for {}", task_id, address);

        let body = self
            .send_json(self.client.get(url), MSG_STATUS_FAILED)
            .await?;
        parse_poll_status(body).map_err(|e| Self::relabel(e, MSG_STATUS_FAILED))
    }
}
