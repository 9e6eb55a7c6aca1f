//! Integration tests for DeFi Sentinel

use defi_sentinel::{
    models::{AnalysisOutcome, HistoryQuery, HistoryResult, TaskHandle},
    presenters::{render_gas_analysis, render_history, render_session},
    utils::{format_number, is_valid_address, validate_address},
    AnalysisConfig, AnalysisDepth, ErrorCode, SessionState, TimeRange,
};

#[test]
fn test_address_validation_table() {
    let cases = [
        ("0xdAC17F958D2ee523a2206206994597C13D831ec7", true),
        ("0x0000000000000000000000000000000000000000", true),
        ("dAC17F958D2ee523a2206206994597C13D831ec7", false),
        ("0x123", false),
        ("0xZZC17F958D2ee523a2206206994597C13D831ec7", false),
        ("", false),
    ];
    for (address, expected) in cases {
        assert_eq!(is_valid_address(address), expected, "address {:?}", address);
    }

    let empty = validate_address("").unwrap_err();
    assert_eq!(empty.code, ErrorCode::InvalidAddress);
    assert_eq!(empty.message, "Please enter an address");

    let malformed = validate_address("0x123").unwrap_err();
    assert_eq!(malformed.message, "Please enter a valid Ethereum address");
}

#[test]
fn test_history_query_from_config() {
    let config = AnalysisConfig {
        depth: AnalysisDepth::Deep,
        time_range: TimeRange::SevenDays,
        ..Default::default()
    };
    let query = HistoryQuery::new(&config, true);
    assert!(query.full_analysis);
    assert_eq!(query.analysis_depth.as_str(), "deep");
    assert_eq!(query.time_range.to_string(), "7d");
    assert!(query.include_holders && query.include_governance);
}

#[test]
fn test_history_payload_decodes_with_defaults() {
    let result: HistoryResult = serde_json::from_value(serde_json::json!({
        "contract_address": "0xdAC17F958D2ee523a2206206994597C13D831ec7",
        "transactions": { "total_count": 2, "items": null },
        "events": null
    }))
    .unwrap();

    assert_eq!(result.transactions.total_count, 2);
    assert!(result.transactions.items.is_empty());
    assert_eq!(result.events.total_count, 0);

    let text = render_history(&result);
    assert!(text.contains("No transactions found"));
}

#[test]
fn test_outcome_final_result() {
    let done = AnalysisOutcome::Completed(HistoryResult::default());
    assert!(done.final_result().is_some());

    let pending = AnalysisOutcome::Pending {
        preview: Some(HistoryResult::default()),
        handle: TaskHandle {
            task_id: "T1".into(),
            estimated_completion_secs: 12,
        },
    };
    assert!(pending.final_result().is_none());
    assert!(AnalysisOutcome::TimedOut.final_result().is_none());
}

#[test]
fn test_session_rendering() {
    let state = SessionState::TimedOut {
        message: "Analysis timed out. Please try again.".into(),
        preview: None,
    };
    assert!(render_session(&state).contains("Analysis timed out. Please try again."));
    assert!(render_session(&SessionState::Idle).is_empty());
}

#[test]
fn test_number_formatting() {
    assert_eq!(format_number(Some(1_500_000_000.0)), "1.50B");
    assert_eq!(format_number(Some(2_250_000.0)), "2.25M");
    assert_eq!(format_number(Some(3_100.0)), "3.10K");
    assert_eq!(format_number(None), "N/A");

    let text = render_gas_analysis(&Default::default());
    assert!(text.contains("100.0%"));
}
