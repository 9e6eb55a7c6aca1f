//! Centralized Error Handling Module
//!
//! Every failure in the client flows through `AppError`, carrying a
//! display-ready message plus optional diagnostics from the backend.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - VALIDATION_xxx: Input rejected before any network call
//! - HTTP_xxx: Transport and server errors
//! - RESPONSE_xxx: Payload shape errors
//! - ANALYSIS_xxx: Deferred analysis outcomes
//! - CFG_xxx: Configuration errors

use std::fmt;
use std::sync::Arc;

/// Application-wide error type
#[derive(Debug, Clone)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message, safe to show to the user as-is
    pub message: String,
    /// Error code reported by the backend, if any
    pub backend_code: Option<String>,
    /// Raw diagnostic payload (usually the backend's error body)
    pub details: Option<serde_json::Value>,
    /// Optional underlying error
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            backend_code: None,
            details: None,
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Arc::new(source)),
            ..Self::new(code, message)
        }
    }

    /// Attach the backend's own error code
    pub fn with_backend_code(mut self, code: impl Into<String>) -> Self {
        self.backend_code = Some(code.into());
        self
    }

    /// Attach a raw diagnostic payload
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl PartialEq for AppError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.backend_code == other.backend_code
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ============================================
    // Validation Errors
    // ============================================
    /// Address is empty or not `0x` + 40 hex characters
    InvalidAddress,

    // ============================================
    // Transport / Server Errors
    // ============================================
    /// No response from the backend (connect/DNS/reset)
    Network,
    /// Request exceeded the client timeout
    Timeout,
    /// Backend answered with a non-2xx status
    Server,

    // ============================================
    // Response Errors
    // ============================================
    /// 2xx response whose body could not be decoded
    InvalidResponse,
    /// 2xx response matching neither the immediate nor the pending shape
    UnexpectedResponseFormat,

    // ============================================
    // Deferred Analysis Errors
    // ============================================
    /// Backend reported the deferred analysis as failed
    AnalysisFailed,
    /// Poll ceiling reached without a terminal status
    PollTimeout,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidAddress => "VALIDATION_INVALID_ADDRESS",

            Self::Network => "HTTP_NETWORK_ERROR",
            Self::Timeout => "HTTP_TIMEOUT",
            Self::Server => "HTTP_SERVER_ERROR",

            Self::InvalidResponse => "RESPONSE_INVALID",
            Self::UnexpectedResponseFormat => "RESPONSE_UNEXPECTED_FORMAT",

            Self::AnalysisFailed => "ANALYSIS_FAILED",
            Self::PollTimeout => "ANALYSIS_POLL_TIMEOUT",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::PollTimeout)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Address failed validation
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    /// Transport-level failure
    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, msg)
    }

    /// Non-2xx response
    pub fn server(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Server, msg)
    }

    /// Response matched no known shape
    pub fn unexpected_format() -> Self {
        Self::new(
            ErrorCode::UnexpectedResponseFormat,
            crate::utils::constants::MSG_UNEXPECTED_FORMAT,
        )
    }

    /// Deferred analysis failed on the backend
    pub fn analysis_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AnalysisFailed, msg)
    }

    /// Poll ceiling reached
    pub fn poll_timeout() -> Self {
        Self::new(
            ErrorCode::PollTimeout,
            crate::utils::constants::MSG_POLL_TIMEOUT,
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::with_source(ErrorCode::Timeout, "Request timeout", err)
        } else if err.is_connect() {
            Self::with_source(ErrorCode::Network, "Connection failed", err)
        } else if err.is_decode() {
            Self::with_source(ErrorCode::InvalidResponse, "Invalid response body", err)
        } else {
            let message = err.to_string();
            Self::with_source(ErrorCode::Network, message, err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::InvalidResponse, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::invalid_address("Please enter an address");
        assert_eq!(err.code, ErrorCode::InvalidAddress);
        assert_eq!(err.code_str(), "VALIDATION_INVALID_ADDRESS");
        assert_eq!(err.to_string(), "Please enter an address");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::Network.is_retryable());
        assert!(ErrorCode::Timeout.is_retryable());
        assert!(!ErrorCode::InvalidAddress.is_retryable());
        assert!(!ErrorCode::UnexpectedResponseFormat.is_retryable());
    }

    #[test]
    fn test_builders_keep_diagnostics() {
        let err = AppError::server("Contract not found")
            .with_backend_code("NOT_FOUND")
            .with_details(serde_json::json!({ "detail": "Contract not found" }));
        assert_eq!(err.backend_code.as_deref(), Some("NOT_FOUND"));
        assert!(err.details.is_some());
        assert_eq!(err.code_str(), "HTTP_SERVER_ERROR");
    }

    #[test]
    fn test_every_code_has_a_distinct_string() {
        let codes = [
            ErrorCode::InvalidAddress,
            ErrorCode::Network,
            ErrorCode::Timeout,
            ErrorCode::Server,
            ErrorCode::InvalidResponse,
            ErrorCode::UnexpectedResponseFormat,
            ErrorCode::AnalysisFailed,
            ErrorCode::PollTimeout,
            ErrorCode::ConfigInvalidValue,
        ];
        let strings: std::collections::HashSet<_> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(strings.len(), codes.len());
        assert!(!strings.contains("UNKNOWN_ERROR"));
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            AppError::poll_timeout().message,
            "Analysis timed out. Please try again."
        );
        assert_eq!(
            AppError::unexpected_format().code,
            ErrorCode::UnexpectedResponseFormat
        );
    }
}
