//! In-memory reference ledger
//!
//! Holds committed world state and private collections in ordered maps so
//! every scan is deterministic. An invocation runs against a [`TxSimulator`]
//! that records the version of every key it reads and stages its writes; the
//! resulting [`ReadWriteSet`] is validated against current versions at commit
//! time (optimistic concurrency).

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use super::{CollectionName, KeyValue, LedgerError, LedgerStub, OrgId, StateIterator, TransientMap};

/// Keys in the shared namespace that start with this character belong to the
/// composite-key space and are skipped by range scans.
const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

#[derive(Debug, Clone)]
struct Versioned {
    value: Vec<u8>,
    version: u64,
}

type Namespace = BTreeMap<String, Versioned>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum StateKey {
    Public(String),
    Private(CollectionName, String),
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public(key) => write!(f, "{key:?}"),
            Self::Private(collection, key) => write!(f, "{collection}/{key:?}"),
        }
    }
}

/// Everything a single invocation needs besides committed state
#[derive(Debug, Clone)]
pub struct Invocation {
    pub tx_id: String,
    /// `None` when the proposal carried no usable credential
    pub creator: Option<OrgId>,
    pub peer_org: OrgId,
    pub transient: TransientMap,
}

impl Invocation {
    pub fn new(tx_id: impl Into<String>, creator: OrgId, peer_org: OrgId) -> Self {
        Self {
            tx_id: tx_id.into(),
            creator: Some(creator),
            peer_org,
            transient: TransientMap::new(),
        }
    }

    pub fn anonymous(tx_id: impl Into<String>, peer_org: OrgId) -> Self {
        Self {
            tx_id: tx_id.into(),
            creator: None,
            peer_org,
            transient: TransientMap::new(),
        }
    }

    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }
}

/// Reads and staged writes of one simulated invocation
#[derive(Debug, Clone, Default)]
pub struct ReadWriteSet {
    tx_id: String,
    reads: BTreeMap<StateKey, Option<u64>>,
    writes: BTreeMap<StateKey, Vec<u8>>,
}

impl ReadWriteSet {
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn read_count(&self) -> usize {
        self.reads.len()
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }
}

/// Committed state of the reference ledger
#[derive(Debug, Default)]
pub struct MemoryLedger {
    public: Namespace,
    private: BTreeMap<CollectionName, Namespace>,
    height: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed invocations
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn committed_state(&self, key: &str) -> Option<&[u8]> {
        self.public.get(key).map(|v| v.value.as_slice())
    }

    pub fn committed_private_data(&self, collection: &CollectionName, key: &str) -> Option<&[u8]> {
        self.private
            .get(collection)
            .and_then(|ns| ns.get(key))
            .map(|v| v.value.as_slice())
    }

    /// Start simulating an invocation against the current committed state.
    pub fn simulate(&self, invocation: Invocation) -> TxSimulator<'_> {
        let rwset = ReadWriteSet {
            tx_id: invocation.tx_id.clone(),
            ..ReadWriteSet::default()
        };

        TxSimulator {
            ledger: self,
            invocation,
            rwset,
        }
    }

    /// Validate the read set and apply every staged write at a new height.
    pub fn commit(&mut self, rwset: ReadWriteSet) -> Result<u64, LedgerError> {
        for (key, read) in &rwset.reads {
            let current = self.version_of(key);
            if current != *read {
                tracing::warn!(tx_id = %rwset.tx_id, key = %key, "MVCC read conflict");
                return Err(LedgerError::MvccConflict {
                    key: key.to_string(),
                    read: *read,
                    current,
                });
            }
        }

        self.height += 1;
        let version = self.height;
        let write_count = rwset.writes.len();

        for (key, value) in rwset.writes {
            let (namespace, key) = match key {
                StateKey::Public(key) => (&mut self.public, key),
                StateKey::Private(collection, key) => (self.private.entry(collection).or_default(), key),
            };
            namespace.insert(key, Versioned { value, version });
        }

        tracing::debug!(
            tx_id = %rwset.tx_id,
            height = version,
            writes = write_count,
            "Committed write set"
        );

        Ok(version)
    }

    /// Simulate `op` and commit its write set on success. On failure nothing
    /// staged by `op` reaches committed state.
    pub fn execute<T, E, F>(&mut self, invocation: Invocation, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut TxSimulator<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let mut simulator = self.simulate(invocation);
        let output = op(&mut simulator)?;
        let rwset = simulator.into_rwset();
        self.commit(rwset)?;
        Ok(output)
    }

    fn version_of(&self, key: &StateKey) -> Option<u64> {
        let entry = match key {
            StateKey::Public(key) => self.public.get(key),
            StateKey::Private(collection, key) => {
                self.private.get(collection).and_then(|ns| ns.get(key))
            }
        };
        entry.map(|v| v.version)
    }
}

/// [`LedgerStub`] implementation for one invocation over a [`MemoryLedger`]
pub struct TxSimulator<'a> {
    ledger: &'a MemoryLedger,
    invocation: Invocation,
    rwset: ReadWriteSet,
}

impl TxSimulator<'_> {
    pub fn into_rwset(self) -> ReadWriteSet {
        self.rwset
    }

    pub fn rwset(&self) -> &ReadWriteSet {
        &self.rwset
    }
}

fn check_key(key: &str) -> Result<(), LedgerError> {
    if key.is_empty() {
        return Err(LedgerError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

impl LedgerStub for TxSimulator<'_> {
    fn tx_id(&self) -> &str {
        &self.invocation.tx_id
    }

    fn client_org_id(&self) -> Result<OrgId, LedgerError> {
        self.invocation.creator.clone().ok_or_else(|| {
            LedgerError::IdentityUnavailable("no client credential attached to the invocation".to_string())
        })
    }

    fn peer_org_id(&self) -> Result<OrgId, LedgerError> {
        if self.invocation.peer_org.is_empty() {
            return Err(LedgerError::IdentityUnavailable(
                "peer organization is not configured".to_string(),
            ));
        }
        Ok(self.invocation.peer_org.clone())
    }

    fn transient(&self) -> &TransientMap {
        &self.invocation.transient
    }

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        check_key(key)?;
        let entry = self.ledger.public.get(key);
        self.rwset
            .reads
            .entry(StateKey::Public(key.to_string()))
            .or_insert(entry.map(|v| v.version));
        Ok(entry.map(|v| v.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        check_key(key)?;
        self.rwset.writes.insert(StateKey::Public(key.to_string()), value);
        Ok(())
    }

    fn get_state_by_range(
        &mut self,
        start: &str,
        end: &str,
    ) -> Result<StateIterator<'_>, LedgerError> {
        if !start.is_empty() && !end.is_empty() && start > end {
            return Err(LedgerError::InvalidKey(format!(
                "range start {start:?} is after range end {end:?}"
            )));
        }

        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        let ledger = self.ledger;
        let reads = &mut self.rwset.reads;
        let entries = ledger
            .public
            .range::<String, _>((lower, upper))
            .filter(|(key, _)| !key.starts_with(COMPOSITE_KEY_NAMESPACE))
            .map(move |(key, entry)| {
                reads
                    .entry(StateKey::Public(key.clone()))
                    .or_insert(Some(entry.version));
                Ok(KeyValue {
                    key: key.clone(),
                    value: entry.value.clone(),
                })
            });

        Ok(Box::new(entries))
    }

    fn get_private_data(
        &mut self,
        collection: &CollectionName,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        check_key(key)?;
        let entry = self
            .ledger
            .private
            .get(collection)
            .and_then(|ns| ns.get(key));
        self.rwset
            .reads
            .entry(StateKey::Private(collection.clone(), key.to_string()))
            .or_insert(entry.map(|v| v.version));
        Ok(entry.map(|v| v.value.clone()))
    }

    fn put_private_data(
        &mut self,
        collection: &CollectionName,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        check_key(key)?;
        self.rwset
            .writes
            .insert(StateKey::Private(collection.clone(), key.to_string()), value);
        Ok(())
    }

    fn get_private_data_by_prefix(
        &mut self,
        collection: &CollectionName,
        prefix: &str,
    ) -> Result<StateIterator<'_>, LedgerError> {
        check_key(prefix)?;

        let Some(namespace) = self.ledger.private.get(collection) else {
            return Ok(Box::new(std::iter::empty()));
        };

        let reads = &mut self.rwset.reads;
        let collection = collection.clone();
        let prefix = prefix.to_string();
        let entries = namespace
            .range::<String, _>((Bound::Included(prefix.clone()), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix.as_str()))
            .map(move |(key, entry)| {
                reads
                    .entry(StateKey::Private(collection.clone(), key.clone()))
                    .or_insert(Some(entry.version));
                Ok(KeyValue {
                    key: key.clone(),
                    value: entry.value.clone(),
                })
            });

        Ok(Box::new(entries))
    }
}
