//! HTTP surface
//!
//! The axum router, handlers, shared state, and the error-to-status
//! mapping. Everything request-scoped lives here; domain logic lives in
//! `ops` and `classify`.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
