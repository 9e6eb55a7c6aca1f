//! End-to-end tests: real HTTP client against the local mock backend

use defi_sentinel::{
    models::HistoryQuery,
    sandbox::{create_router, MockState},
    utils::constants::{MOCK_API_PREFIX, MOCK_FAILING_ADDRESS},
    AnalysisBackend, AnalysisConfig, AnalysisDepth, AnalysisFlow, AnalysisOutcome, ApiClient,
    ClientConfig, ErrorCode, PollingController, SessionState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const ADDR: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

/// Serve the mock backend on an ephemeral port, returning its API base URL
async fn start_mock(checks: u32) -> (String, Arc<MockState>) {
    let state = Arc::new(MockState::with_checks(checks));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state.clone(), MOCK_API_PREFIX);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}{}", addr, MOCK_API_PREFIX), state)
}

fn client(base_url: &str, max_polls: u32) -> Arc<ApiClient> {
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_poll_interval(Duration::from_millis(50))
        .with_max_poll_attempts(max_polls);
    Arc::new(ApiClient::new(config).unwrap())
}

#[tokio::test]
async fn test_single_shot_flows() {
    let (base, _) = start_mock(2).await;
    let flow = AnalysisFlow::new(client(&base, 10));

    let contract = flow.analyze_contract(ADDR).await.unwrap();
    assert_eq!(contract.contract_address, ADDR);
    assert!(contract.risk_score <= 100.0);

    let token = flow.analyze_token(ADDR).await.unwrap();
    assert_eq!(token.basic_info.decimals, 18);
    assert_ne!(token.risk_assessment.risk_level, "UNKNOWN");

    let gas = flow.analyze_gas(ADDR).await.unwrap();
    assert_eq!(gas.historical_gas_trends.len(), 7);
}

#[tokio::test]
async fn test_server_rejection_uses_detail() {
    let (base, _) = start_mock(2).await;
    let api = client(&base, 10);

    // Bypasses local validation on purpose
    let err = api.fetch_gas_analysis("0x123").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Server);
    assert_eq!(err.message, "Invalid Ethereum address");
    assert_eq!(err.backend_code.as_deref(), Some("INVALID_ADDRESS"));
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let (base, _) = start_mock(2).await;
    let api = client(&base, 10);

    let err = api.poll_history_status(ADDR, "missing-task").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Server);
    assert!(err.message.contains("missing-task"));
    assert_eq!(err.backend_code.as_deref(), Some("TASK_NOT_FOUND"));
}

#[tokio::test]
async fn test_task_id_stays_in_its_path_segment() {
    let (base, _) = start_mock(2).await;
    let api = client(&base, 10);

    let err = api
        .poll_history_status(ADDR, "../../gas-analysis/x?y=1")
        .await
        .unwrap_err();
    assert_eq!(err.backend_code.as_deref(), Some("TASK_NOT_FOUND"));
    assert!(err.message.contains("../../gas-analysis/x?y=1"));
}

#[tokio::test]
async fn test_unreachable_backend_uses_fallback_message() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let flow = AnalysisFlow::new(client(&format!("http://{}/api", addr), 10));
    let err = flow.analyze_token(ADDR).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Network);
    assert_eq!(err.message, "Failed to get token analysis");
    assert!(err.code.is_retryable());
}

#[tokio::test]
async fn test_quick_history_is_immediate() {
    let (base, state) = start_mock(2).await;
    let controller = PollingController::new(client(&base, 10));
    let config = AnalysisConfig {
        depth: AnalysisDepth::Quick,
        ..Default::default()
    };

    let outcome = controller.run(ADDR, &config, false).await;
    match outcome {
        AnalysisOutcome::Immediate(result) => assert_eq!(result.contract_address, ADDR),
        other => panic!("expected immediate result, got {:?}", other),
    }
    assert!(state.tasks.is_empty());
}

#[tokio::test]
async fn test_deferred_history_without_wait() {
    let (base, state) = start_mock(2).await;
    let api = client(&base, 10);
    let controller = PollingController::with_config(api.clone(), api.config());

    let mut session = controller.submit(ADDR, &AnalysisConfig::default(), false).await;
    let settled = session.wait_for_terminal().await;
    let handle = settled.task_handle().cloned().unwrap();
    assert_eq!(handle.estimated_completion_secs, 12);
    assert!(settled.data().is_some());
    assert!(!session.is_polling());

    tokio::time::sleep(Duration::from_millis(200)).await;
    // Never polled, so the task is still open
    assert!(state.tasks.contains_key(&handle.task_id));
}

#[tokio::test]
async fn test_deferred_history_completes() {
    let (base, state) = start_mock(2).await;
    let api = client(&base, 10);
    let controller = PollingController::with_config(api.clone(), api.config());

    let outcome = controller.run(ADDR, &AnalysisConfig::default(), true).await;
    let result = outcome.final_result().cloned().unwrap();
    assert_eq!(result.contract_address, ADDR);
    assert!(!result.transactions.items.is_empty());
    assert!(state.tasks.is_empty());
}

#[tokio::test]
async fn test_deferred_history_failure() {
    let (base, _) = start_mock(2).await;
    let api = client(&base, 10);
    let controller = PollingController::with_config(api.clone(), api.config());

    let mut session = controller
        .submit(MOCK_FAILING_ADDRESS, &AnalysisConfig::default(), true)
        .await;
    match session.wait_for_terminal().await {
        SessionState::Failed { error, preview } => {
            assert_eq!(error.code, ErrorCode::AnalysisFailed);
            assert_eq!(error.message, "Archive node unavailable for this contract");
            assert!(preview.is_some());
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deferred_history_times_out() {
    let (base, _) = start_mock(100).await;
    let api = client(&base, 3);
    let controller = PollingController::with_config(api.clone(), api.config());

    let outcome = controller.run(ADDR, &AnalysisConfig::default(), true).await;
    assert_eq!(outcome, AnalysisOutcome::TimedOut);
}

#[tokio::test]
async fn test_history_query_reaches_backend() {
    let (base, state) = start_mock(2).await;
    let api = client(&base, 10);
    let config = AnalysisConfig {
        depth: AnalysisDepth::Quick,
        ..Default::default()
    };

    // full_analysis forces a deferred answer even for quick depth
    let response = api
        .request_contract_history(ADDR, &HistoryQuery::new(&config, true))
        .await
        .unwrap();
    assert!(matches!(
        response,
        defi_sentinel::models::HistoryResponse::Pending(_)
    ));
    assert_eq!(state.tasks.len(), 1);
}
