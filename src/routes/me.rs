use axum::Json;
use serde::Serialize;

use crate::auth::RequireAuth;
use crate::ledger::OrgId;

#[derive(Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub org_id: OrgId,
    pub issuer: String,
}

/// Get current authenticated caller info
pub async fn get_me(auth: RequireAuth) -> Json<MeResponse> {
    Json(MeResponse {
        subject: auth.subject.clone(),
        org_id: auth.org_id.clone(),
        issuer: auth.issuer.clone(),
    })
}
