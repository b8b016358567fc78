//! Thin HTTP facade over `corelog-core`, demonstrating the append/read
//! capability boundary a real RPC layer (out of scope) would sit behind.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use corelog_core::CommitLog;
use state::AppState;

/// Builds the router: `POST /records`, `GET /records/:offset`,
/// `GET /healthz`. Takes the `CommitLog` capability, not the concrete
/// engine, so the facade only ever depends on the boundary a real RPC layer
/// would depend on.
pub fn router(log: Arc<dyn CommitLog>) -> Router {
    let state = AppState::new(log);
    Router::new()
        .route("/records", post(handlers::append_record))
        .route("/records/:offset", get(handlers::read_record))
        .route("/healthz", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
