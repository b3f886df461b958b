//! Bid enumeration scoped by the vendor roster

use crate::domain::VendorBid;
use crate::ledger::LedgerStub;

use super::access::{guard, OrgRequirement};
use super::keys::BidKey;
use super::partition::partition_for;
use super::{decode_record, ContractError, TenderContract};

impl TenderContract {
    /// All bids the caller may see, read from its own collection.
    ///
    /// Vendor ids are scanned in roster order; within one vendor, bids come
    /// back in key order. An org missing from the roster is a configuration
    /// gap and fails with `NotFound` rather than returning an empty list.
    pub fn list_all_bids(&self, stub: &mut dyn LedgerStub) -> Result<Vec<VendorBid>, ContractError> {
        let caller = guard(&*stub, &OrgRequirement::PeerMatch)?;
        let vendor_ids = self.config.authorized_vendor_ids(&caller).ok_or_else(|| {
            ContractError::not_found(format!("no vendor ids are authorized for org {caller}"))
        })?;
        let partition = partition_for(&caller)?;
        let tx_id = stub.tx_id().to_string();

        let mut bids = Vec::new();
        for vendor_id in &vendor_ids {
            let prefix = BidKey::vendor_prefix(vendor_id)?;
            let before = bids.len();

            for entry in stub.get_private_data_by_prefix(&partition, &prefix)? {
                let entry = entry?;
                bids.push(decode_record(&entry.key, &entry.value)?);
            }

            tracing::debug!(
                tx_id = %tx_id,
                vendor_id = %vendor_id,
                count = bids.len() - before,
                "Scanned vendor bids"
            );
        }

        tracing::info!(tx_id = %tx_id, org = %caller, count = bids.len(), "Listed bids");
        Ok(bids)
    }
}
