//! Client & analysis configuration
//!
//! `ClientConfig` is resolved once at startup and handed to `ApiClient` and
//! `PollingController`; nothing reads the environment after that.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, ENV_API_BASE_URL, ENV_HTTP_TIMEOUT_SECS,
    MAX_POLL_ATTEMPTS, POLL_INTERVAL_MS, USER_AGENT,
};

/// Configuration for talking to the analysis backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to (no trailing slash)
    pub base_url: String,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// Delay between two status checks
    pub poll_interval: Duration,
    /// Status checks before a deferred analysis times out
    pub max_poll_attempts: u32,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_poll_attempts: MAX_POLL_ATTEMPTS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `SENTINEL_API_BASE_URL` / `SENTINEL_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url);
            }
        }

        if let Ok(raw) = std::env::var(ENV_HTTP_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid {}={:?}", ENV_HTTP_TIMEOUT_SECS, raw),
            }
        }

        info!("🔗 Backend: {}", config.base_url);
        config
    }

    /// Replace the base URL, trimming any trailing slash
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded, so a caller-supplied address or a
    /// backend-supplied task id cannot add path components or a query.
    pub fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::with_source(
                ErrorCode::ConfigInvalidValue,
                format!("Invalid backend URL: {}", self.base_url),
                e,
            )
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::invalid_config(format!("Backend URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

// ============================================
// History analysis parameters
// ============================================

/// How thorough the backend history analysis should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl AnalysisDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisDepth::Quick => "quick",
            AnalysisDepth::Standard => "standard",
            AnalysisDepth::Deep => "deep",
        }
    }
}

impl FromStr for AnalysisDepth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "standard" => Ok(Self::Standard),
            "deep" => Ok(Self::Deep),
            other => Err(AppError::invalid_config(format!(
                "Unknown analysis depth: {} (expected quick, standard or deep)",
                other
            ))),
        }
    }
}

impl fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look-back window of the history analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::OneDay => "24h",
            TimeRange::SevenDays => "7d",
            TimeRange::ThirtyDays => "30d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "Last Hour",
            TimeRange::OneDay => "Last 24 Hours",
            TimeRange::SevenDays => "Last 7 Days",
            TimeRange::ThirtyDays => "Last 30 Days",
        }
    }
}

impl FromStr for TimeRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Self::OneHour),
            "24h" => Ok(Self::OneDay),
            "7d" => Ok(Self::SevenDays),
            "30d" => Ok(Self::ThirtyDays),
            other => Err(AppError::invalid_config(format!(
                "Unknown time range: {} (expected 1h, 24h, 7d or 30d)",
                other
            ))),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis configuration submitted with a history request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub depth: AnalysisDepth,
    pub include_holders: bool,
    pub include_governance: bool,
    pub time_range: TimeRange,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: AnalysisDepth::Standard,
            include_holders: true,
            include_governance: true,
            time_range: TimeRange::OneDay,
        }
    }
}

/// Query string of `GET /contract-history/{address}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub full_analysis: bool,
    pub analysis_depth: AnalysisDepth,
    pub include_holders: bool,
    pub include_governance: bool,
    pub time_range: TimeRange,
}

impl HistoryQuery {
    /// `full_analysis` is forwarded as-is; it mirrors the caller's wait choice
    pub fn new(config: &AnalysisConfig, full_analysis: bool) -> Self {
        Self {
            full_analysis,
            analysis_depth: config.depth,
            include_holders: config.include_holders,
            include_governance: config.include_governance,
            time_range: config.time_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://backend-defi.onrender.com/api");
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.max_poll_attempts, 30);
    }

    #[test]
    fn test_endpoint_join() {
        let config = ClientConfig::default().with_base_url("http://localhost:8000/api/");
        assert_eq!(
            config.endpoint(&["gas-analysis", "0xabc"]).unwrap().as_str(),
            "http://localhost:8000/api/gas-analysis/0xabc"
        );
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let config = ClientConfig::default().with_base_url("http://localhost:8000/api");
        let url = config
            .endpoint(&["contract-history", "0xabc", "status", "../../admin?x=1#f"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/contract-history/0xabc/status/..%2F..%2Fadmin%3Fx=1%23f"
        );
        assert!(url.query().is_none());
        assert_eq!(url.path_segments().map(|s| s.count()), Some(5));
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        let config = ClientConfig::default().with_base_url("not a url");
        let err = config.endpoint(&["gas-analysis"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn test_parse_analysis_options() {
        assert_eq!("Deep".parse::<AnalysisDepth>().unwrap(), AnalysisDepth::Deep);
        assert_eq!("7d".parse::<TimeRange>().unwrap(), TimeRange::SevenDays);
        assert!("90d".parse::<TimeRange>().is_err());
        assert!("thorough".parse::<AnalysisDepth>().is_err());
    }

    #[test]
    fn test_history_query_serializes_wire_names() {
        let query = HistoryQuery::new(&AnalysisConfig::default(), true);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["full_analysis"], true);
        assert_eq!(value["analysis_depth"], "standard");
        assert_eq!(value["time_range"], "24h");
        assert_eq!(value["include_holders"], true);
    }
}
