//! Private collection addressing

use crate::ledger::{CollectionName, OrgId};

use super::ContractError;

/// Prefix of the implicit per-organization collection
pub const PARTITION_PREFIX: &str = "_implicit_org_";

/// Name of the private collection owned by `org`.
pub fn partition_for(org: &OrgId) -> Result<CollectionName, ContractError> {
    if org.is_empty() {
        return Err(ContractError::validation(
            "cannot address a private collection for an empty organization id",
        ));
    }
    Ok(CollectionName::new(format!("{PARTITION_PREFIX}{org}")))
}
