use serde::{Deserialize, Serialize};

use crate::ledger::OrgId;

/// JWT claims carried by a caller's identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (client name)
    pub sub: String,

    /// Membership service id of the caller's organization
    pub mspid: OrgId,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp) - optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}
