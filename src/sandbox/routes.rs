//! Mock backend route configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, MockState};
use super::middleware::logging_middleware;

/// In-flight request cap of the mock backend
const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Create the mock router with the backend routes mounted under `prefix`
pub fn create_router(state: Arc<MockState>, prefix: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/analyze-contract", post(handlers::analyze_contract))
        .route("/token-analysis/:address", get(handlers::token_analysis))
        .route("/gas-analysis/:address", get(handlers::gas_analysis))
        .route("/contract-history/:address", get(handlers::contract_history))
        .route(
            "/contract-history/:address/status/:task_id",
            get(handlers::history_status),
        );

    let router = if prefix.is_empty() || prefix == "/" {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    router
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(GlobalConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
}
