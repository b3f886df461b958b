use crate::ledger::{Invocation, LedgerStub, MemoryLedger, OrgId};

use super::{ContractError, TenderConfig, TenderContract, VendorRoster, BID_DETAILS_KEY};

pub(crate) const GOV: &str = "Org1MSP";
pub(crate) const VENDOR_A: &str = "Org2MSP";
pub(crate) const VENDOR_B: &str = "Org3MSP";

/// Ledger plus contract where government is `Org1MSP`, vendor A bids as
/// `300` and vendor B bids as `400`. Every call runs on the caller's own peer
/// unless a peer is named.
pub(crate) struct Fixture {
    pub ledger: MemoryLedger,
    pub contract: TenderContract,
    seq: u64,
}

impl Fixture {
    pub fn new() -> Self {
        let roster = VendorRoster::new()
            .with_org(VENDOR_A, ["300"])
            .with_org(VENDOR_B, ["400"]);

        Self {
            ledger: MemoryLedger::new(),
            contract: TenderContract::new(TenderConfig::new(GOV, roster)),
            seq: 0,
        }
    }

    pub fn invocation(&mut self, caller: &str, peer: &str) -> Invocation {
        self.seq += 1;
        Invocation::new(format!("tx{}", self.seq), OrgId::from(caller), OrgId::from(peer))
    }

    pub fn run_as<T>(
        &mut self,
        invocation: Invocation,
        op: impl FnOnce(&TenderContract, &mut dyn LedgerStub) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        let contract = &self.contract;
        self.ledger.execute(invocation, |sim| op(contract, sim))
    }

    pub fn run<T>(
        &mut self,
        org: &str,
        op: impl FnOnce(&TenderContract, &mut dyn LedgerStub) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        let invocation = self.invocation(org, org);
        self.run_as(invocation, op)
    }

    pub fn create_contract(&mut self, id: &str, last_date: &str, status: &str) {
        let args: Vec<String> = [id, "Road works", "Resurface NH-7", last_date, status]
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.run(GOV, |c, stub| c.invoke(stub, "createContract", &args))
            .expect("contract creation");
    }

    pub fn submit_bid(&mut self, org: &str, payload: &str) -> Result<(), ContractError> {
        let invocation = self
            .invocation(org, org)
            .with_transient(BID_DETAILS_KEY, payload.as_bytes().to_vec());
        self.run_as(invocation, |c, stub| c.create_bid(stub).map(|_| ()))
    }
}

pub(crate) fn bid_json(vendor: &str, contract: &str, amount: i64, date: &str) -> String {
    format!(r#"{{"vendorid":"{vendor}","contractid":"{contract}","bidamt":{amount},"biddate":"{date}"}}"#)
}
