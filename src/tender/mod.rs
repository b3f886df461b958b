//! Tender contract
//!
//! Business rules of the sealed-bid workflow, layered leaf-first:
//! access guard, collection addressing, composite keys, then the contract
//! lifecycle, bid submission and bid enumeration. All state goes through a
//! [`LedgerStub`]; nothing here reads a clock or iterates an unordered map.

pub mod access;
pub mod dispatch;
pub mod enumerator;
pub mod error;
pub mod keys;
pub mod lifecycle;
pub mod partition;
pub mod roster;
pub mod submission;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::{guard, OrgRequirement};
pub use dispatch::Function;
pub use error::ContractError;
pub use keys::BidKey;
pub use partition::{partition_for, PARTITION_PREFIX};
pub use roster::{RosterParseError, TenderConfig, VendorRoster};

use serde::{de::DeserializeOwned, Serialize};

use crate::ledger::{LedgerError, LedgerStub, OrgId};

/// Transient key carrying a bid payload
pub const BID_DETAILS_KEY: &str = "bid_details";

/// Transient key carrying a contract payload when no args are given
pub const CONTRACT_DETAILS_KEY: &str = "contract_details";

/// The sealed-bid tender contract
#[derive(Debug, Clone)]
pub struct TenderContract {
    config: TenderConfig,
}

impl TenderContract {
    pub fn new(config: TenderConfig) -> Self {
        Self { config }
    }

    /// Organizations that run a peer for this contract
    pub fn member_orgs(&self) -> Vec<OrgId> {
        self.config.member_orgs()
    }
}

fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(record)
        .map_err(|e| LedgerError::Backend(format!("failed to encode record: {e}")).into())
}

fn decode_record<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, ContractError> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::corrupt(key, e))
}

fn transient_payload(stub: &dyn LedgerStub, key: &str) -> Result<Vec<u8>, ContractError> {
    stub.transient().get(key).cloned().ok_or_else(|| {
        ContractError::validation(format!("{key} not found in the transient map input"))
    })
}
