//! Contract error taxonomy
//!
//! Every variant aborts the invocation; staged writes are discarded by the
//! ledger and the message is returned to the caller unchanged.

use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("identity unavailable: {0}")]
    Identity(String),

    #[error("not authorized: {0}")]
    Authorization(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    State(String),

    #[error("deadline passed: {0}")]
    Deadline(String),

    #[error("corrupt record at {key:?}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ContractError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn corrupt(key: impl Into<String>, err: serde_json::Error) -> Self {
        Self::CorruptRecord {
            key: key.into(),
            reason: err.to_string(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Identity(_) => "IDENTITY_ERROR",
            Self::Authorization(_) => "AUTHORIZATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::State(_) => "STATE_ERROR",
            Self::Deadline(_) => "DEADLINE_ERROR",
            Self::CorruptRecord { .. } => "CORRUPT_RECORD",
            Self::Ledger(LedgerError::MvccConflict { .. }) => "MVCC_READ_CONFLICT",
            Self::Ledger(LedgerError::IdentityUnavailable(_)) => "IDENTITY_ERROR",
            Self::Ledger(_) => "LEDGER_ERROR",
        }
    }
}
