//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::ledger::LoanLedger;

pub use routes::create_router;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LoanLedger>,
}

impl AppState {
    pub fn new(ledger: LoanLedger) -> Self {
        Self {
            ledger: Arc::new(ledger),
        }
    }
}

/// Build the full application: loan routes, middleware and health check
pub fn build_app(state: AppState) -> Router {
    // Axum layers run in reverse order: correlation -> logging -> handler
    let loan_routes = create_router()
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::correlation_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(loan_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
