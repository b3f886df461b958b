use super::Claims;
use crate::ledger::OrgId;

/// Authenticated caller extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Client name (from JWT sub claim)
    pub subject: String,

    /// Organization the caller acts for
    pub org_id: OrgId,

    /// Token issuer
    pub issuer: String,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, &'static str> {
        if claims.sub.trim().is_empty() {
            return Err("Token has an empty subject");
        }
        if claims.mspid.is_empty() {
            return Err("Token does not name an organization");
        }

        Ok(Self {
            subject: claims.sub.clone(),
            org_id: claims.mspid.clone(),
            issuer: claims.iss.clone(),
        })
    }
}
