pub mod health;
pub mod me;
pub mod transactions;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Protected routes
        .route("/me", get(me::get_me))
        .route("/transactions", post(transactions::submit_transaction))
        .route("/transactions/:tx_id", get(transactions::get_transaction))
        .route("/queries", post(transactions::evaluate_query))
}
