use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;

use crate::api::Created;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestIdExt;
use crate::peer::{InvocationOutcome, Proposal, TransactionRecord};

/// Submit a transaction: simulate on the chosen peer, then commit
pub async fn submit_transaction(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(proposal): Json<Proposal>,
) -> ApiResult<Created<InvocationOutcome>> {
    tracing::info!(
        request_id = ?headers.request_id(),
        subject = %auth.subject,
        org = %auth.org_id,
        function = %proposal.function,
        peer = ?proposal.peer,
        args = proposal.args.len(),
        transient_keys = proposal.transient.len(),
        "Submitting transaction"
    );

    state
        .network
        .peer_for(&auth.org_id, &proposal)
        .and_then(|peer| peer.submit(auth.org_id.clone(), &proposal))
        .map(Created)
        .map_err(|e| ApiError::from(e).for_request(&headers))
}

/// Evaluate a query: simulate only, nothing is committed
pub async fn evaluate_query(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(proposal): Json<Proposal>,
) -> ApiResult<Json<InvocationOutcome>> {
    tracing::debug!(
        request_id = ?headers.request_id(),
        org = %auth.org_id,
        function = %proposal.function,
        peer = ?proposal.peer,
        "Evaluating query"
    );

    state
        .network
        .peer_for(&auth.org_id, &proposal)
        .and_then(|peer| peer.evaluate(auth.org_id.clone(), &proposal))
        .map(Json)
        .map_err(|e| ApiError::from(e).for_request(&headers))
}

/// Look up a committed transaction
pub async fn get_transaction(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(tx_id): Path<String>,
) -> ApiResult<Json<TransactionRecord>> {
    state
        .network
        .channel()
        .transaction(&tx_id)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("transaction {tx_id} not found")).for_request(&headers)
        })
}
