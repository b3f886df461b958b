//! Bid submission and private bid lookup
//!
//! A bid is written to the submitting org's collection and to the
//! government's collection under the same composite key. Both puts belong to
//! the same write set, so they commit together or not at all.

use crate::domain::{parse_date, CreateBidRequest, VendorBid};
use crate::ledger::LedgerStub;

use super::access::{guard, OrgRequirement};
use super::keys::BidKey;
use super::partition::partition_for;
use super::{decode_record, transient_payload, ContractError, TenderContract, BID_DETAILS_KEY};

impl TenderContract {
    /// Submit the bid carried in the `bid_details` transient entry.
    pub fn create_bid(&self, stub: &mut dyn LedgerStub) -> Result<VendorBid, ContractError> {
        let payload = transient_payload(&*stub, BID_DETAILS_KEY)?;
        self.submit_bid(stub, payload)
    }

    /// Validate and store `payload`. The stored bytes are exactly `payload`.
    pub fn submit_bid(
        &self,
        stub: &mut dyn LedgerStub,
        payload: Vec<u8>,
    ) -> Result<VendorBid, ContractError> {
        let request: CreateBidRequest = serde_json::from_slice(&payload).map_err(|e| {
            ContractError::validation(format!("failed to parse {BID_DETAILS_KEY}: {e}"))
        })?;
        let bid = request.into_bid()?;

        let caller = guard(&*stub, &OrgRequirement::PeerMatch)?;
        let registered = self.config.roster.vendor_ids(&caller).unwrap_or_default();
        if !registered.contains(&bid.vendor_id) {
            return Err(ContractError::authorization(format!(
                "org {caller} is not registered to bid as vendor {}",
                bid.vendor_id
            )));
        }

        let vendor_partition = partition_for(&caller)?;
        let government_partition = partition_for(&self.config.government_org)?;
        let key = BidKey::new(&bid.vendor_id, &bid.contract_id)?.encode();

        for partition in [&vendor_partition, &government_partition] {
            if stub.get_private_data(partition, &key)?.is_some() {
                return Err(ContractError::conflict(format!(
                    "bid already exists for vendor {} on contract {}",
                    bid.vendor_id, bid.contract_id
                )));
            }
        }

        let contract = self.read_contract(stub, &bid.contract_id)?.ok_or_else(|| {
            ContractError::not_found(format!("contract {} does not exist", bid.contract_id))
        })?;

        if !contract.status.is_open() {
            return Err(ContractError::State(format!(
                "contract {} not open for bidding (status {:?})",
                contract.contract_id,
                contract.status.as_str()
            )));
        }

        let bid_date = parse_date("biddate", &bid.bid_date)?;
        let last_date = parse_date("lastdate", &contract.last_date)?;
        if bid_date > last_date {
            return Err(ContractError::Deadline(format!(
                "bid date {bid_date} is after the last date {last_date} of contract {}",
                contract.contract_id
            )));
        }

        stub.put_private_data(&vendor_partition, &key, payload.clone())?;
        stub.put_private_data(&government_partition, &key, payload)?;

        tracing::info!(
            tx_id = %stub.tx_id(),
            org = %caller,
            vendor_id = %bid.vendor_id,
            contract_id = %bid.contract_id,
            "Bid submitted"
        );

        Ok(bid)
    }

    /// Look up a bid in the caller's own collection.
    ///
    /// Without `vendor_id` the caller's roster vendor ids are tried in order
    /// and the first bid found is returned.
    pub fn query_bid_private(
        &self,
        stub: &mut dyn LedgerStub,
        contract_id: &str,
        vendor_id: Option<&str>,
    ) -> Result<VendorBid, ContractError> {
        let caller = guard(&*stub, &OrgRequirement::PeerMatch)?;
        let partition = partition_for(&caller)?;

        let candidates = match vendor_id {
            Some(vendor_id) => vec![vendor_id.to_string()],
            None => self.config.authorized_vendor_ids(&caller).ok_or_else(|| {
                ContractError::not_found(format!("no vendor ids are registered for org {caller}"))
            })?,
        };

        for vendor_id in &candidates {
            let key = BidKey::new(vendor_id, contract_id)?.encode();
            if let Some(bytes) = stub.get_private_data(&partition, &key)? {
                return decode_record(&key, &bytes);
            }
        }

        Err(ContractError::not_found(format!(
            "bid private details do not exist in {partition} for contract {contract_id}"
        )))
    }
}
