//! Gateway error handling
//!
//! Turns contract and gateway failures into `{code, message, request_id}`
//! JSON with a matching HTTP status.

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::middleware::RequestIdExt;
use crate::tender::ContractError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

fn contract_status(err: &ContractError) -> StatusCode {
    match err {
        ContractError::Validation(_) => StatusCode::BAD_REQUEST,
        ContractError::Identity(_) => StatusCode::UNAUTHORIZED,
        ContractError::Authorization(_) => StatusCode::FORBIDDEN,
        ContractError::NotFound(_) => StatusCode::NOT_FOUND,
        ContractError::Conflict(_) => StatusCode::CONFLICT,
        ContractError::State(_) | ContractError::Deadline(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ContractError::Ledger(LedgerError::MvccConflict { .. }) => StatusCode::CONFLICT,
        ContractError::Ledger(LedgerError::IdentityUnavailable(_)) => StatusCode::UNAUTHORIZED,
        ContractError::CorruptRecord { .. } | ContractError::Ledger(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Contract(e) => contract_status(e),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Contract(e) => e.code(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Contract(e) => e.to_string(),
        }
    }

    /// Tie the error to the request it answers
    pub fn for_request(self, headers: &HeaderMap) -> RequestError {
        RequestError {
            request_id: headers.request_id().map(str::to_string),
            error: self,
        }
    }
}

/// An [`ApiError`] carrying the `x-request-id` of the failed request
#[derive(Debug)]
pub struct RequestError {
    pub error: ApiError,
    pub request_id: Option<String>,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let Self { error, request_id } = self;
        let status = error.status_code();

        if status.is_server_error() {
            tracing::error!(error = %error, code = error.error_code(), request_id = ?request_id, "Contract failure");
        } else {
            tracing::warn!(error = %error, code = error.error_code(), request_id = ?request_id, "API error");
        }

        let body = ErrorResponse {
            code: error.error_code().to_string(),
            message: error.public_message(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, RequestError>;
