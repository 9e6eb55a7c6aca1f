//! Constants Module - Single Source of Truth
//!
//! Endpoint paths, timing defaults and user-facing messages used across the
//! client, the polling controller and the mock backend.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "DeFi Sentinel";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = concat!("defi-sentinel/", env!("CARGO_PKG_VERSION"));

// ============================================
// BACKEND CONFIGURATION
// ============================================

/// Environment variable overriding the backend base URL
pub const ENV_API_BASE_URL: &str = "SENTINEL_API_BASE_URL";

/// Environment variable overriding the HTTP timeout (seconds)
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SENTINEL_HTTP_TIMEOUT_SECS";

/// Backend used when no override is configured
pub const DEFAULT_API_BASE_URL: &str = "https://backend-defi.onrender.com/api";

/// Default timeout for a single backend request (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// ============================================
// POLLING
// ============================================

/// Delay between two status checks of a deferred analysis
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Status checks issued before a deferred analysis is declared timed out
pub const MAX_POLL_ATTEMPTS: u32 = 30;

/// Status value marking a deferred history analysis
pub const STATUS_ANALYSIS_PENDING: &str = "analysis_pending";

/// Terminal status values of the status endpoint
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

// ============================================
// ENDPOINT PATHS
// ============================================

pub const PATH_ANALYZE_CONTRACT: &str = "analyze-contract";
pub const PATH_TOKEN_ANALYSIS: &str = "token-analysis";
pub const PATH_GAS_ANALYSIS: &str = "gas-analysis";
pub const PATH_CONTRACT_HISTORY: &str = "contract-history";

// ============================================
// USER-FACING MESSAGES
// ============================================

pub const MSG_EMPTY_ADDRESS: &str = "Please enter an address";
pub const MSG_INVALID_ADDRESS: &str = "Please enter a valid Ethereum address";

pub const MSG_POLL_TIMEOUT: &str = "Analysis timed out. Please try again.";
pub const MSG_ANALYSIS_FAILED: &str = "Analysis failed";
pub const MSG_UNEXPECTED_FORMAT: &str = "Unexpected response format from server";
pub const MSG_NO_RESPONSE: &str = "No response from server";

/// Fallback messages used when the backend supplies none
pub const MSG_ANALYZE_CONTRACT_FAILED: &str = "Failed to analyze contract";
pub const MSG_TOKEN_ANALYSIS_FAILED: &str = "Failed to get token analysis";
pub const MSG_GAS_ANALYSIS_FAILED: &str = "Failed to get gas analysis";
pub const MSG_HISTORY_FAILED: &str = "Failed to get contract history";
pub const MSG_STATUS_FAILED: &str = "Failed to check analysis status";

// ============================================
// MOCK BACKEND
// ============================================

/// Path prefix the mock backend mounts its routes under
pub const MOCK_API_PREFIX: &str = "/api";

/// Default port of the mock backend
pub const MOCK_DEFAULT_PORT: u16 = 8000;

/// Status checks a deferred mock analysis reports as in progress
pub const MOCK_CHECKS_BEFORE_COMPLETE: u32 = 2;

/// Estimated completion (seconds) advertised by the mock backend
pub const MOCK_ESTIMATED_COMPLETION_SECS: u64 = 12;

/// Address whose deferred history analysis always fails in the mock backend
pub const MOCK_FAILING_ADDRESS: &str = "0x000000000000000000000000000000000000dead";
