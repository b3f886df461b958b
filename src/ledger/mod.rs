//! Transactional key-value store seam
//!
//! The tender contract never owns storage. Each invocation receives a
//! [`LedgerStub`] that exposes the shared world state, the per-organization
//! private collections, the caller identity and the transient input map.
//! Writes made through a stub are staged; the platform commits them together
//! or discards them together.

pub mod memory;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::{Invocation, MemoryLedger, ReadWriteSet, TxSimulator};

/// Organization identity of a caller or of the hosting peer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrgId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OrgId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Name of a private data collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry yielded by a range or prefix scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Forward-only scan over committed entries. Dropping it closes the scan.
pub type StateIterator<'a> = Box<dyn Iterator<Item = Result<KeyValue, LedgerError>> + 'a>;

/// Confidential per-invocation input; only its digest leaves the peer.
pub type TransientMap = BTreeMap<String, Vec<u8>>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("caller identity unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("read conflict on {key}: read at version {read:?}, committed version is {current:?}")]
    MvccConflict {
        key: String,
        read: Option<u64>,
        current: Option<u64>,
    },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("ledger backend failure: {0}")]
    Backend(String),
}

/// Store primitives available to a single invocation.
///
/// Reads observe committed state only, never the invocation's own staged
/// writes.
pub trait LedgerStub {
    fn tx_id(&self) -> &str;

    /// Organization of the client that submitted the invocation
    fn client_org_id(&self) -> Result<OrgId, LedgerError>;

    /// Organization hosting this execution instance
    fn peer_org_id(&self) -> Result<OrgId, LedgerError>;

    fn transient(&self) -> &TransientMap;

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Scan the shared namespace over `[start, end)`. Empty bounds are open.
    fn get_state_by_range(&mut self, start: &str, end: &str)
        -> Result<StateIterator<'_>, LedgerError>;

    fn get_private_data(
        &mut self,
        collection: &CollectionName,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError>;

    fn put_private_data(
        &mut self,
        collection: &CollectionName,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), LedgerError>;

    fn get_private_data_by_prefix(
        &mut self,
        collection: &CollectionName,
        prefix: &str,
    ) -> Result<StateIterator<'_>, LedgerError>;
}
