use serde::{Deserialize, Serialize};

use crate::tender::ContractError;

/// Sealed bid as stored in the vendor's and the government's collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorBid {
    #[serde(rename = "vendorid")]
    pub vendor_id: String,
    #[serde(rename = "contractid")]
    pub contract_id: String,
    #[serde(rename = "bidamt")]
    pub bid_amount: u64,
    /// `YYYY-MM-DD`
    #[serde(rename = "biddate")]
    pub bid_date: String,
}

/// Request DTO for submitting a bid through the transient map
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBidRequest {
    #[serde(default, rename = "vendorid")]
    pub vendor_id: String,
    #[serde(default, rename = "contractid")]
    pub contract_id: String,
    #[serde(default, rename = "bidamt")]
    pub bid_amount: i64,
    #[serde(default, rename = "biddate")]
    pub bid_date: String,
}

impl CreateBidRequest {
    pub fn into_bid(self) -> Result<VendorBid, ContractError> {
        if self.vendor_id.trim().is_empty() {
            return Err(ContractError::validation("VendorId field must not be empty"));
        }
        if self.contract_id.trim().is_empty() {
            return Err(ContractError::validation("ContractId field must not be empty"));
        }
        if self.bid_amount <= 0 {
            return Err(ContractError::validation(
                "BidAmount field must be a positive number",
            ));
        }
        if self.bid_date.trim().is_empty() {
            return Err(ContractError::validation("BidDate field must not be empty"));
        }

        Ok(VendorBid {
            vendor_id: self.vendor_id,
            contract_id: self.contract_id,
            bid_amount: self.bid_amount.unsigned_abs(),
            bid_date: self.bid_date,
        })
    }
}
