//! Endorsing peers
//!
//! Every member organization runs a [`Peer`] hosting the tender contract. All
//! peers of a [`PeerNetwork`] sit on one [`Channel`]: a single
//! [`MemoryLedger`] plus the log of committed transactions. Submissions are
//! simulated under a shared lock and committed under an exclusive one, so a
//! stale read set fails with an MVCC conflict instead of overwriting a
//! concurrent commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::ledger::{Invocation, MemoryLedger, OrgId, ReadWriteSet, TransientMap};
use crate::tender::{ContractError, TenderContract};

/// A function call as received from a client
#[derive(Debug, Clone, Deserialize)]
pub struct Proposal {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Confidential input. Never recorded, only digested.
    #[serde(default)]
    pub transient: BTreeMap<String, String>,
    /// Org whose peer executes the call; the caller's own when absent
    #[serde(default)]
    pub peer: Option<OrgId>,
}

impl Proposal {
    pub fn new(function: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            function: function.into(),
            args,
            transient: BTreeMap::new(),
            peer: None,
        }
    }

    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }

    pub fn on_peer(mut self, org: impl Into<OrgId>) -> Self {
        self.peer = Some(org.into());
        self
    }

    fn transient_map(&self) -> TransientMap {
        self.transient
            .iter()
            .map(|(k, v)| (k.clone(), v.as_bytes().to_vec()))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvocationOutcome {
    pub tx_id: String,
    pub result: Value,
}

/// What the peer keeps about a committed transaction
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub tx_id: String,
    pub function: String,
    pub args: Vec<String>,
    pub creator: OrgId,
    /// SHA-256 over the transient map, absent when the map was empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transient_digest: Option<String>,
    pub write_count: usize,
    pub height: u64,
    pub committed_at: DateTime<Utc>,
}

/// Hex SHA-256 over every transient entry in key order, each key and value
/// prefixed with its big-endian `u64` length.
pub fn transient_digest(transient: &TransientMap) -> Option<String> {
    if transient.is_empty() {
        return None;
    }

    let mut hasher = Sha256::new();
    for (key, value) in transient {
        hasher.update((key.len() as u64).to_be_bytes());
        hasher.update(key.as_bytes());
        hasher.update((value.len() as u64).to_be_bytes());
        hasher.update(value);
    }
    Some(hex::encode(hasher.finalize()))
}

/// Ledger and transaction log shared by every peer on the channel
#[derive(Default)]
pub struct Channel {
    ledger: RwLock<MemoryLedger>,
    transactions: RwLock<HashMap<String, TransactionRecord>>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(&self) -> u64 {
        self.ledger.read().height()
    }

    pub fn transaction(&self, tx_id: &str) -> Option<TransactionRecord> {
        self.transactions.read().get(tx_id).cloned()
    }
}

pub struct Peer {
    org: OrgId,
    contract: TenderContract,
    channel: Arc<Channel>,
}

impl Peer {
    pub fn new(org: OrgId, contract: TenderContract, channel: Arc<Channel>) -> Self {
        Self {
            org,
            contract,
            channel,
        }
    }

    pub fn org(&self) -> &OrgId {
        &self.org
    }

    /// Simulate `proposal` as `creator` and commit its write set.
    pub fn submit(
        &self,
        creator: OrgId,
        proposal: &Proposal,
    ) -> Result<InvocationOutcome, ContractError> {
        let tx_id = Uuid::new_v4().to_string();
        let invocation = self.invocation(&tx_id, creator.clone(), proposal);
        let digest = transient_digest(&invocation.transient);

        let (result, rwset) = self.simulate(invocation, proposal)?;
        let write_count = rwset.write_count();
        let height = self.channel.ledger.write().commit(rwset)?;

        let record = TransactionRecord {
            tx_id: tx_id.clone(),
            function: proposal.function.clone(),
            args: proposal.args.clone(),
            creator,
            transient_digest: digest,
            write_count,
            height,
            committed_at: Utc::now(),
        };
        self.channel.transactions.write().insert(tx_id.clone(), record);

        tracing::info!(
            tx_id = %tx_id,
            peer = %self.org,
            function = %proposal.function,
            height = height,
            writes = write_count,
            "Transaction committed"
        );

        Ok(InvocationOutcome { tx_id, result })
    }

    /// Simulate `proposal` as `creator` without committing anything.
    pub fn evaluate(
        &self,
        creator: OrgId,
        proposal: &Proposal,
    ) -> Result<InvocationOutcome, ContractError> {
        let tx_id = Uuid::new_v4().to_string();
        let invocation = self.invocation(&tx_id, creator, proposal);

        let (result, rwset) = self.simulate(invocation, proposal)?;
        tracing::debug!(
            tx_id = %tx_id,
            function = %proposal.function,
            reads = rwset.read_count(),
            discarded_writes = rwset.write_count(),
            "Evaluated"
        );

        Ok(InvocationOutcome { tx_id, result })
    }

    fn invocation(&self, tx_id: &str, creator: OrgId, proposal: &Proposal) -> Invocation {
        Invocation {
            tx_id: tx_id.to_string(),
            creator: Some(creator),
            peer_org: self.org.clone(),
            transient: proposal.transient_map(),
        }
    }

    fn simulate(
        &self,
        invocation: Invocation,
        proposal: &Proposal,
    ) -> Result<(Value, ReadWriteSet), ContractError> {
        let ledger = self.channel.ledger.read();
        let mut simulator = ledger.simulate(invocation);
        let result = self
            .contract
            .invoke(&mut simulator, &proposal.function, &proposal.args)?;
        Ok((result, simulator.into_rwset()))
    }
}

/// One peer per member organization, all on the same channel
pub struct PeerNetwork {
    channel: Arc<Channel>,
    peers: BTreeMap<OrgId, Peer>,
}

impl PeerNetwork {
    /// Hosts a peer for the government and for every roster org.
    pub fn new(contract: TenderContract) -> Self {
        let channel = Arc::new(Channel::new());
        let peers = contract
            .member_orgs()
            .into_iter()
            .map(|org| {
                let peer = Peer::new(org.clone(), contract.clone(), Arc::clone(&channel));
                (org, peer)
            })
            .collect();

        Self { channel, peers }
    }

    pub fn peer(&self, org: &OrgId) -> Result<&Peer, ContractError> {
        self.peers
            .get(org)
            .ok_or_else(|| ContractError::authorization(format!("no peer is hosted for org {org}")))
    }

    /// The peer named by `proposal`, or the caller's own
    pub fn peer_for(&self, caller: &OrgId, proposal: &Proposal) -> Result<&Peer, ContractError> {
        self.peer(proposal.peer.as_ref().unwrap_or(caller))
    }

    pub fn orgs(&self) -> Vec<OrgId> {
        self.peers.keys().cloned().collect()
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }
}
