//! Caller identity resolution and the per-operation access guard

use crate::ledger::{LedgerError, LedgerStub, OrgId};

use super::ContractError;

/// Which callers an operation admits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgRequirement {
    /// Caller org must equal the org hosting this peer
    PeerMatch,
    /// Caller org must equal the given org; the hosting peer is irrelevant
    Org(OrgId),
    /// Any identified caller
    Any,
}

/// Read the caller's organization from its credential.
pub fn resolve_caller_org(stub: &dyn LedgerStub) -> Result<OrgId, ContractError> {
    let org = stub.client_org_id().map_err(|err| match err {
        LedgerError::IdentityUnavailable(msg) => ContractError::Identity(msg),
        other => ContractError::Ledger(other),
    })?;

    if org.is_empty() {
        return Err(ContractError::Identity(
            "client credential carries an empty organization id".to_string(),
        ));
    }

    Ok(org)
}

/// Private data may only be read or written by clients of the hosting org.
pub fn authorize_local_only(stub: &dyn LedgerStub, caller: OrgId) -> Result<OrgId, ContractError> {
    let peer = stub.peer_org_id()?;
    if caller != peer {
        return Err(ContractError::authorization(format!(
            "client from org {caller} is not authorized to read or write private data from an org {peer} peer"
        )));
    }
    Ok(caller)
}

/// Resolve the caller and check it against `requirement`.
pub fn guard(stub: &dyn LedgerStub, requirement: &OrgRequirement) -> Result<OrgId, ContractError> {
    let caller = resolve_caller_org(stub)?;

    match requirement {
        OrgRequirement::PeerMatch => authorize_local_only(stub, caller),
        OrgRequirement::Org(required) if caller != *required => {
            Err(ContractError::authorization(format!(
                "org {caller} is not allowed to perform this operation; it is reserved for {required}"
            )))
        }
        OrgRequirement::Org(_) | OrgRequirement::Any => Ok(caller),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Invocation, MemoryLedger};

    fn org(id: &str) -> OrgId {
        OrgId::from(id)
    }

    #[test]
    fn peer_match_admits_local_clients_only() {
        let ledger = MemoryLedger::new();

        let local = ledger.simulate(Invocation::new("tx1", org("Org2MSP"), org("Org2MSP")));
        assert_eq!(guard(&local, &OrgRequirement::PeerMatch).unwrap(), org("Org2MSP"));

        let remote = ledger.simulate(Invocation::new("tx2", org("Org3MSP"), org("Org2MSP")));
        let err = guard(&remote, &OrgRequirement::PeerMatch).unwrap_err();
        assert!(matches!(err, ContractError::Authorization(_)));
    }

    #[test]
    fn fixed_org_ignores_the_hosting_peer() {
        let ledger = MemoryLedger::new();
        let required = OrgRequirement::Org(org("Org1MSP"));

        let gov_on_vendor_peer = ledger.simulate(Invocation::new("tx1", org("Org1MSP"), org("Org2MSP")));
        assert!(guard(&gov_on_vendor_peer, &required).is_ok());

        let vendor = ledger.simulate(Invocation::new("tx2", org("Org2MSP"), org("Org2MSP")));
        assert!(matches!(guard(&vendor, &required), Err(ContractError::Authorization(_))));
    }

    #[test]
    fn missing_or_empty_identity_is_an_identity_error() {
        let ledger = MemoryLedger::new();

        let anonymous = ledger.simulate(Invocation::anonymous("tx1", org("Org1MSP")));
        assert!(matches!(guard(&anonymous, &OrgRequirement::Any), Err(ContractError::Identity(_))));

        let blank = ledger.simulate(Invocation::new("tx2", org(""), org("Org1MSP")));
        assert!(matches!(resolve_caller_org(&blank), Err(ContractError::Identity(_))));
    }
}
