//! Contract lifecycle: create, query and list tenders
//!
//! Tenders are public information and live in the shared world state keyed
//! by contract id, never in a private collection.

use crate::domain::{ContractWork, CreateContractRequest};
use crate::ledger::LedgerStub;

use super::access::{guard, OrgRequirement};
use super::{decode_record, encode_record, transient_payload, ContractError, TenderContract, CONTRACT_DETAILS_KEY};

impl TenderContract {
    /// Create a tender. Only the government organization may call this, from
    /// any peer.
    pub fn create_contract(
        &self,
        stub: &mut dyn LedgerStub,
        request: CreateContractRequest,
    ) -> Result<ContractWork, ContractError> {
        let contract = request.into_contract()?;
        if contract.contract_id.contains('\u{0}') {
            return Err(ContractError::validation(
                "ContractId must not contain NUL characters",
            ));
        }

        let required = OrgRequirement::Org(self.config.government_org.clone());
        let caller = guard(&*stub, &required)?;

        if stub.get_state(&contract.contract_id)?.is_some() {
            return Err(ContractError::conflict(format!(
                "this contract already exists: {}",
                contract.contract_id
            )));
        }

        stub.put_state(&contract.contract_id, encode_record(&contract)?)?;

        tracing::info!(
            tx_id = %stub.tx_id(),
            org = %caller,
            contract_id = %contract.contract_id,
            status = %contract.status,
            "Contract created"
        );

        Ok(contract)
    }

    /// Read the `contract_details` JSON from the transient map.
    pub fn contract_request_from_transient(
        &self,
        stub: &dyn LedgerStub,
    ) -> Result<CreateContractRequest, ContractError> {
        let payload = transient_payload(stub, CONTRACT_DETAILS_KEY)?;
        serde_json::from_slice(&payload).map_err(|e| {
            ContractError::validation(format!("failed to parse {CONTRACT_DETAILS_KEY}: {e}"))
        })
    }

    pub fn query_contract(
        &self,
        stub: &mut dyn LedgerStub,
        contract_id: &str,
    ) -> Result<ContractWork, ContractError> {
        guard(&*stub, &OrgRequirement::PeerMatch)?;

        if contract_id.trim().is_empty() {
            return Err(ContractError::validation("ContractId must not be empty"));
        }

        self.read_contract(stub, contract_id)?.ok_or_else(|| {
            ContractError::not_found(format!("contract {contract_id} does not exist"))
        })
    }

    /// Every tender in the shared state, in key order.
    pub fn list_all_contracts(
        &self,
        stub: &mut dyn LedgerStub,
    ) -> Result<Vec<ContractWork>, ContractError> {
        let caller = guard(&*stub, &OrgRequirement::Any)?;
        let tx_id = stub.tx_id().to_string();

        let mut contracts = Vec::new();
        for entry in stub.get_state_by_range("", "")? {
            let entry = entry?;
            contracts.push(decode_record(&entry.key, &entry.value)?);
        }

        tracing::debug!(tx_id = %tx_id, org = %caller, count = contracts.len(), "Listed contracts");
        Ok(contracts)
    }

    pub(super) fn read_contract(
        &self,
        stub: &mut dyn LedgerStub,
        contract_id: &str,
    ) -> Result<Option<ContractWork>, ContractError> {
        stub.get_state(contract_id)?
            .map(|bytes| decode_record(contract_id, &bytes))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContractStatus;
    use crate::ledger::LedgerError;
    use crate::tender::test_support::{Fixture, GOV, VENDOR_A};

    fn request(id: &str) -> CreateContractRequest {
        CreateContractRequest {
            contract_id: id.to_string(),
            name: "Bridge repair".to_string(),
            brief: "Repair span 3".to_string(),
            last_date: "2024-06-30".to_string(),
            status: "open".to_string(),
        }
    }

    #[test]
    fn create_then_query_returns_the_same_record() {
        let mut fx = Fixture::new();

        let created = fx.run(GOV, |c, stub| c.create_contract(stub, request("C1"))).unwrap();
        let queried = fx.run(GOV, |c, stub| c.query_contract(stub, "C1")).unwrap();

        assert_eq!(created, queried);
        assert_eq!(queried.status, ContractStatus::Open);
    }

    #[test]
    fn duplicate_contract_is_a_conflict_and_keeps_the_original() {
        let mut fx = Fixture::new();
        fx.run(GOV, |c, stub| c.create_contract(stub, request("C1"))).unwrap();

        let mut second = request("C1");
        second.name = "Something else".to_string();
        let err = fx.run(GOV, |c, stub| c.create_contract(stub, second)).unwrap_err();

        assert!(matches!(err, ContractError::Conflict(_)));
        let stored = fx.run(GOV, |c, stub| c.query_contract(stub, "C1")).unwrap();
        assert_eq!(stored.name, "Bridge repair");
    }

    #[test]
    fn vendors_cannot_create_contracts() {
        let mut fx = Fixture::new();

        let err = fx
            .run(VENDOR_A, |c, stub| c.create_contract(stub, request("C1")))
            .unwrap_err();

        assert!(matches!(err, ContractError::Authorization(_)));
        assert_eq!(fx.ledger.committed_state("C1"), None);
        assert_eq!(fx.ledger.height(), 0);
    }

    #[test]
    fn government_may_create_through_a_vendor_peer() {
        let mut fx = Fixture::new();
        let invocation = fx.invocation(GOV, VENDOR_A);

        fx.run_as(invocation, |c, stub| c.create_contract(stub, request("C1")))
            .unwrap();
        assert!(fx.ledger.committed_state("C1").is_some());
    }

    #[test]
    fn query_requires_peer_match_and_existing_record() {
        let mut fx = Fixture::new();
        fx.run(GOV, |c, stub| c.create_contract(stub, request("C1"))).unwrap();

        let remote = fx.invocation(VENDOR_A, GOV);
        let err = fx.run_as(remote, |c, stub| c.query_contract(stub, "C1")).unwrap_err();
        assert!(matches!(err, ContractError::Authorization(_)));

        let err = fx.run(VENDOR_A, |c, stub| c.query_contract(stub, "C9")).unwrap_err();
        assert!(matches!(err, ContractError::NotFound(_)));
    }

    #[test]
    fn list_is_in_key_order_for_any_caller_peer() {
        let mut fx = Fixture::new();
        for id in ["C2", "C1", "C3"] {
            fx.run(GOV, |c, stub| c.create_contract(stub, request(id))).unwrap();
        }

        let remote = fx.invocation(VENDOR_A, GOV);
        let ids: Vec<String> = fx
            .run_as(remote, |c, stub| c.list_all_contracts(stub))
            .unwrap()
            .into_iter()
            .map(|c| c.contract_id)
            .collect();

        assert_eq!(ids, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn corrupt_contract_fails_the_listing() {
        let mut fx = Fixture::new();
        fx.run(GOV, |_, stub| {
            stub.put_state("C1", b"not json".to_vec())?;
            Ok::<_, ContractError>(())
        })
        .unwrap();

        let err = fx.run(GOV, |c, stub| c.list_all_contracts(stub)).unwrap_err();
        assert!(matches!(err, ContractError::CorruptRecord { ref key, .. } if key == "C1"));
    }

    #[test]
    fn contract_can_come_from_the_transient_map() {
        let mut fx = Fixture::new();
        let invocation = fx.invocation(GOV, GOV).with_transient(
            "contract_details",
            br#"{"contractid":"C7","name":"n","brief":"b","lastdate":"2024-01-31","status":"open"}"#.to_vec(),
        );

        let created = fx
            .run_as(invocation, |c, stub| {
                let request = c.contract_request_from_transient(&*stub)?;
                c.create_contract(stub, request)
            })
            .unwrap();
        assert_eq!(created.contract_id, "C7");

        let missing = fx.invocation(GOV, GOV);
        let err = fx
            .run_as(missing, |c, stub| c.contract_request_from_transient(&*stub))
            .unwrap_err();
        assert!(matches!(err, ContractError::Validation(_)));
    }

    #[test]
    fn ledger_errors_pass_through() {
        let err: ContractError = LedgerError::Backend("disk".to_string()).into();
        assert_eq!(err.code(), "LEDGER_ERROR");
    }
}
