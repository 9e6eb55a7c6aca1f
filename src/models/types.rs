//! Type definitions for backend payloads
//!
//! Every optional sub-field is filled with its default when a response is
//! decoded (`#[serde(default)]` + `nullable`), so presenters and callers always
//! work on fully populated structures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::serde_helpers::{lenient_int, lenient_opt_int, nullable};

/// Severity classification of a reported vulnerability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.to_uppercase().as_str() {
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Colour name used by the report
    pub fn color(&self) -> &'static str {
        match self {
            Severity::High => "red",
            Severity::Medium => "orange",
            Severity::Low => "yellow",
            Severity::Unknown => "gray",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::High => "🔴",
            Severity::Medium => "🟠",
            Severity::Low => "🟡",
            Severity::Unknown => "⚪",
        }
    }
}

// ============================================
// Contract Analysis
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Vulnerability {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub severity: Severity,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Result of `POST /analyze-contract`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "nullable")]
    pub contract_address: String,
    #[serde(deserialize_with = "lenient_int")]
    pub code_size: u64,
    #[serde(deserialize_with = "nullable")]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(deserialize_with = "nullable")]
    pub risk_score: f64,
    #[serde(deserialize_with = "lenient_int")]
    pub timestamp: i64,
    /// Free-form stats keyed by snake_case label
    #[serde(deserialize_with = "nullable")]
    pub transaction_summary: BTreeMap<String, serde_json::Value>,
    #[serde(deserialize_with = "nullable")]
    pub holder_stats: BTreeMap<String, serde_json::Value>,
}

// ============================================
// Token Analysis
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BasicInfo {
    pub total_supply: Option<f64>,
    #[serde(deserialize_with = "lenient_int")]
    pub decimals: u8,
    #[serde(deserialize_with = "nullable")]
    pub symbol: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SupplyMechanics {
    #[serde(deserialize_with = "nullable")]
    pub is_mintable: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_burnable: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_transfer_fee: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_max_transaction_limit: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_blacklist: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_whitelist: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_anti_whale: bool,
    #[serde(deserialize_with = "nullable")]
    pub suspicious_features: Vec<String>,
}

impl SupplyMechanics {
    /// Flags in display order
    pub fn flags(&self) -> [(&'static str, bool); 7] {
        [
            ("Mintable", self.is_mintable),
            ("Burnable", self.is_burnable),
            ("Transfer Fee", self.has_transfer_fee),
            ("Max Transaction Limit", self.has_max_transaction_limit),
            ("Blacklist", self.has_blacklist),
            ("Whitelist", self.has_whitelist),
            ("Anti-Whale", self.has_anti_whale),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TradingMetrics {
    pub volume_24h: Option<f64>,
    pub liquidity: Option<f64>,
    pub price_impact: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HolderAnalysis {
    #[serde(deserialize_with = "lenient_opt_int")]
    pub total_holders: Option<u64>,
    pub top_holder_percentage: Option<f64>,
    pub distribution_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OwnershipAnalysis {
    #[serde(deserialize_with = "nullable")]
    pub has_owner: bool,
    #[serde(deserialize_with = "nullable")]
    pub can_renounce_ownership: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_multiple_admins: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_timelock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RiskIndicators {
    #[serde(deserialize_with = "nullable")]
    pub high_risk_functions: bool,
    #[serde(deserialize_with = "nullable")]
    pub centralized_control: bool,
    #[serde(deserialize_with = "nullable")]
    pub unsafe_design: bool,
    #[serde(deserialize_with = "nullable")]
    pub complexity_risk: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecurityAnalysis {
    #[serde(deserialize_with = "nullable")]
    pub vulnerabilities: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub security_features: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub ownership_analysis: OwnershipAnalysis,
    #[serde(deserialize_with = "nullable")]
    pub risk_indicators: RiskIndicators,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssessment {
    #[serde(deserialize_with = "nullable")]
    pub risk_score: f64,
    #[serde(deserialize_with = "risk_level_or_unknown")]
    pub risk_level: String,
    #[serde(deserialize_with = "nullable")]
    pub risk_factors: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub recommendations: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub immediate_concerns: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            risk_score: 0.0,
            risk_level: "UNKNOWN".to_string(),
            risk_factors: Vec::new(),
            recommendations: Vec::new(),
            immediate_concerns: Vec::new(),
        }
    }
}

fn risk_level_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "UNKNOWN".to_string()))
}

/// Result of `GET /token-analysis/{address}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TokenAnalysisResult {
    #[serde(deserialize_with = "nullable")]
    pub contract_address: String,
    #[serde(deserialize_with = "nullable")]
    pub token_type: String,
    #[serde(deserialize_with = "nullable")]
    pub basic_info: BasicInfo,
    #[serde(deserialize_with = "nullable")]
    pub supply_mechanics: SupplyMechanics,
    #[serde(deserialize_with = "nullable")]
    pub trading_metrics: TradingMetrics,
    #[serde(deserialize_with = "nullable")]
    pub holder_analysis: HolderAnalysis,
    #[serde(deserialize_with = "nullable")]
    pub security_analysis: SecurityAnalysis,
    #[serde(deserialize_with = "nullable")]
    pub risk_assessment: RiskAssessment,
    #[serde(deserialize_with = "lenient_int")]
    pub timestamp: i64,
}

// ============================================
// Gas Analysis
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GasTrendPoint {
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub average_gas: f64,
}

/// Result of `GET /gas-analysis/{address}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GasAnalysisResult {
    #[serde(deserialize_with = "nullable")]
    pub average_gas_used: f64,
    #[serde(deserialize_with = "nullable")]
    pub highest_gas_operation: String,
    #[serde(deserialize_with = "nullable")]
    pub optimization_suggestions: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub estimated_savings: f64,
    #[serde(deserialize_with = "nullable")]
    pub historical_gas_trends: Vec<GasTrendPoint>,
}

impl GasAnalysisResult {
    /// 0..=100, higher is cheaper: `100 - average_gas_used / 100_000`
    pub fn efficiency_score(&self) -> f64 {
        (100.0 - self.average_gas_used / 100_000.0).max(0.0)
    }
}

// ============================================
// Contract History
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisPeriod {
    #[serde(deserialize_with = "lenient_int")]
    pub from_block: u64,
    #[serde(deserialize_with = "lenient_int")]
    pub to_block: u64,
    #[serde(deserialize_with = "lenient_int")]
    pub block_range: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryTransaction {
    #[serde(deserialize_with = "lenient_int")]
    pub timestamp: i64,
    #[serde(deserialize_with = "nullable")]
    pub transaction_hash: String,
    #[serde(deserialize_with = "nullable")]
    pub from_address: String,
    #[serde(deserialize_with = "nullable")]
    pub to_address: String,
    #[serde(deserialize_with = "nullable")]
    pub value: f64,
    #[serde(deserialize_with = "lenient_int")]
    pub block_number: u64,
    #[serde(deserialize_with = "lenient_int")]
    pub gas_used: u64,
    #[serde(deserialize_with = "nullable")]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TransactionHistory {
    #[serde(deserialize_with = "lenient_int")]
    pub total_count: u64,
    #[serde(deserialize_with = "lenient_int")]
    pub unique_senders: u64,
    #[serde(deserialize_with = "lenient_int")]
    pub unique_receivers: u64,
    #[serde(deserialize_with = "nullable")]
    pub total_volume: f64,
    #[serde(deserialize_with = "nullable")]
    pub successful_ratio: f64,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<HistoryTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryEvent {
    #[serde(deserialize_with = "nullable")]
    pub event_type: String,
    #[serde(deserialize_with = "lenient_int")]
    pub timestamp: i64,
    #[serde(deserialize_with = "nullable")]
    pub transaction_hash: String,
    #[serde(deserialize_with = "lenient_int")]
    pub block_number: u64,
    #[serde(deserialize_with = "nullable")]
    pub details: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EventHistory {
    #[serde(deserialize_with = "lenient_int")]
    pub total_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub event_types: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<HistoryEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryModification {
    #[serde(deserialize_with = "lenient_int")]
    pub timestamp: i64,
    #[serde(deserialize_with = "nullable")]
    pub transaction_hash: String,
    #[serde(deserialize_with = "lenient_int")]
    pub block_number: u64,
    #[serde(deserialize_with = "nullable")]
    pub modification_type: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModificationHistory {
    #[serde(deserialize_with = "lenient_int")]
    pub total_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub modification_types: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<HistoryModification>,
}

/// Fully populated contract-history result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryResult {
    #[serde(deserialize_with = "nullable")]
    pub contract_address: String,
    #[serde(deserialize_with = "nullable")]
    pub analysis_period: AnalysisPeriod,
    #[serde(deserialize_with = "nullable")]
    pub transactions: TransactionHistory,
    #[serde(deserialize_with = "nullable")]
    pub events: EventHistory,
    #[serde(deserialize_with = "nullable")]
    pub modifications: ModificationHistory,
}

// ============================================
// Deferred History Analysis
// ============================================

/// Backend-issued handle of a deferred analysis job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub task_id: String,
    pub estimated_completion_secs: u64,
}

/// Deferred answer of the history endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnalysis {
    pub handle: TaskHandle,
    /// Partial result shown while the full analysis runs
    pub quick_overview: Option<HistoryResult>,
}

/// The two shapes the history endpoint may answer with
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryResponse {
    Immediate(HistoryResult),
    Pending(PendingAnalysis),
}

/// Interpreted answer of the history status endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus {
    Completed(HistoryResult),
    /// Backend-supplied reason, if any
    Failed(Option<String>),
    /// Any other status value, e.g. `processing`
    InProgress(String),
}

/// Final, tagged outcome of a history request
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Immediate(HistoryResult),
    Pending {
        preview: Option<HistoryResult>,
        handle: TaskHandle,
    },
    Completed(HistoryResult),
    Failed(crate::models::errors::AppError),
    TimedOut,
}

impl AnalysisOutcome {
    /// Only immediate and completed outcomes carry a final result
    pub fn final_result(&self) -> Option<&HistoryResult> {
        match self {
            AnalysisOutcome::Immediate(r) | AnalysisOutcome::Completed(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_defaults_fill_missing_sections() {
        let token: TokenAnalysisResult = serde_json::from_value(serde_json::json!({
            "contract_address": "0xdAC17F958D2ee523a2206206994597C13D831ec7",
            "basic_info": { "symbol": "USDT", "total_supply": null },
            "security_analysis": null,
            "risk_assessment": { "risk_score": 12.5 }
        }))
        .unwrap();

        assert_eq!(token.basic_info.symbol, "USDT");
        assert_eq!(token.basic_info.total_supply, None);
        assert!(!token.security_analysis.ownership_analysis.has_owner);
        assert_eq!(token.risk_assessment.risk_level, "UNKNOWN");
        assert_eq!(token.risk_assessment.risk_score, 12.5);
        assert!(token.supply_mechanics.suspicious_features.is_empty());
    }

    #[test]
    fn test_contract_analysis_tolerates_float_integers() {
        let result: AnalysisResult = serde_json::from_value(serde_json::json!({
            "contract_address": "0xdAC17F958D2ee523a2206206994597C13D831ec7",
            "risk_score": 40,
            "timestamp": 1700000000.25,
            "code_size": 1024
        }))
        .unwrap();
        assert_eq!(result.timestamp, 1_700_000_000);
        assert_eq!(result.code_size, 1024);
        assert_eq!(result.risk_score, 40.0);

        let history: HistoryResult = serde_json::from_value(serde_json::json!({
            "transactions": {
                "total_count": 1.0,
                "items": [{ "timestamp": 1700000123.9, "block_number": 18000000.0 }]
            }
        }))
        .unwrap();
        assert_eq!(history.transactions.total_count, 1);
        assert_eq!(history.transactions.items[0].timestamp, 1_700_000_123);
        assert_eq!(history.transactions.items[0].block_number, 18_000_000);
    }

    #[test]
    fn test_unknown_severity() {
        let v: Vulnerability = serde_json::from_value(serde_json::json!({
            "type": "reentrancy",
            "severity": "CRITICAL",
            "description": "external call before state update"
        }))
        .unwrap();
        assert_eq!(v.kind, "reentrancy");
        assert_eq!(v.severity, Severity::Unknown);
        assert_eq!(v.severity.color(), "gray");
    }

    #[test]
    fn test_severity_is_case_insensitive() {
        let v: Vulnerability =
            serde_json::from_value(serde_json::json!({ "severity": "medium" })).unwrap();
        assert_eq!(v.severity, Severity::Medium);
        assert_eq!(v.description, "");
    }

    #[test]
    fn test_gas_efficiency_score() {
        let gas = GasAnalysisResult {
            average_gas_used: 2_500_000.0,
            ..Default::default()
        };
        assert_eq!(gas.efficiency_score(), 75.0);

        let heavy = GasAnalysisResult {
            average_gas_used: 50_000_000.0,
            ..Default::default()
        };
        assert_eq!(heavy.efficiency_score(), 0.0);
    }

    #[test]
    fn test_final_result_only_for_terminal_success() {
        let r = HistoryResult::default();
        assert!(AnalysisOutcome::Immediate(r.clone()).final_result().is_some());
        assert!(AnalysisOutcome::Completed(r.clone()).final_result().is_some());
        assert!(AnalysisOutcome::TimedOut.final_result().is_none());
        assert!(AnalysisOutcome::Pending {
            preview: Some(r),
            handle: TaskHandle {
                task_id: "T1".into(),
                estimated_completion_secs: 12,
            },
        }
        .final_result()
        .is_none());
    }
}
