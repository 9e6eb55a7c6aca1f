//! DeFi Sentinel Mock API Server
//!
//! Local stand-in for the analysis backend, serving generated payloads
//!
//! Usage:
//!   cargo run --bin sentinel_mock_api
//!
//! Environment:
//!   SENTINEL_MOCK_PORT - Server port (default: 8000, `PORT` also honoured)
//!   SENTINEL_MOCK_HOST - Server host (default: 127.0.0.1)
//!   RUST_LOG           - Log filter (default: info)

use defi_sentinel::sandbox::{create_router, MockState};
use defi_sentinel::utils::constants::{
    MOCK_API_PREFIX, MOCK_CHECKS_BEFORE_COMPLETE, MOCK_DEFAULT_PORT, MOCK_FAILING_ADDRESS,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .compact()
        .init();

    let state = Arc::new(MockState::new());
    let state_for_shutdown = state.clone();
    let app = create_router(state, MOCK_API_PREFIX);

    let host = std::env::var("SENTINEL_MOCK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("SENTINEL_MOCK_PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(MOCK_DEFAULT_PORT);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("🚀 Mock backend starting on http://{}{}", addr, MOCK_API_PREFIX);
    info!("");
    info!("Endpoints:");
    info!("  POST {}/analyze-contract", MOCK_API_PREFIX);
    info!("  GET  {}/token-analysis/{{address}}", MOCK_API_PREFIX);
    info!("  GET  {}/gas-analysis/{{address}}", MOCK_API_PREFIX);
    info!("  GET  {}/contract-history/{{address}}", MOCK_API_PREFIX);
    info!("  GET  {}/contract-history/{{address}}/status/{{task_id}}", MOCK_API_PREFIX);
    info!("  GET  /health");
    info!("");
    info!(
        "Deferred tasks complete after {} status checks; {} always fails",
        MOCK_CHECKS_BEFORE_COMPLETE, MOCK_FAILING_ADDRESS
    );
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("");
    info!("🛑 Shutdown signal received");
    let open = state_for_shutdown.tasks.len();
    if open > 0 {
        warn!("   {} deferred tasks were never collected", open);
    }
    info!("👋 Mock backend shutdown complete");

    Ok(())
}
