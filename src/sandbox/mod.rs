//! Sandbox Module - Local mock of the analysis backend
//!
//! Serves the same REST surface as the real backend with generated payloads.
//! Deferred history tasks report `processing` for a few checks, then complete.

pub mod fixtures;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::MockState;
pub use routes::create_router;
