use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use super::AuthContext;
use crate::app::AppState;
use crate::error::{ApiError, RequestError};

/// Extractor that requires a verified caller identity token
///
/// Example:
/// ```ignore
/// async fn protected_route(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, {} of {}", auth.subject, auth.org_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl std::ops::Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken(String),
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidFormat => "Invalid authorization format",
            AuthError::InvalidToken(reason) => {
                tracing::debug!(reason = %reason, "Rejected identity token");
                "Invalid or expired token"
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(RequireAuth).map_err(|e| {
            ApiError::Unauthorized(e.message().to_string()).for_request(&parts.headers)
        })
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthContext, AuthError> {
    // Extract Authorization header
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    // Parse Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    // Verify token
    let claims = state.verifier.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT verification failed");
        AuthError::InvalidToken(e.to_string())
    })?;

    // Build auth context
    let context = AuthContext::from_claims(&claims).map_err(|e| {
        tracing::warn!(error = %e, "Failed to build auth context");
        AuthError::InvalidToken(e.to_string())
    })?;

    tracing::debug!(subject = %context.subject, org = %context.org_id, "Caller authenticated");

    Ok(context)
}
