//! Composite key codec for bids
//!
//! A bid key is `\0 vendorId \0 contractId \0`. Because components may not
//! contain `\0`, the vendor prefix `\0 vendorId \0` is terminated by a
//! delimiter no vendor id can contain, so the prefix of vendor `30` never
//! matches a key of vendor `300`. Keys that start with `\0` also never collide
//! with plain keys in the same collection.

use super::ContractError;

const DELIMITER: char = '\u{0}';

/// Decoded `(vendorId, contractId)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidKey {
    pub vendor_id: String,
    pub contract_id: String,
}

fn check_component(field: &str, value: &str) -> Result<(), ContractError> {
    if value.is_empty() {
        return Err(ContractError::validation(format!(
            "{field} must not be empty in a composite key"
        )));
    }
    if value.contains(DELIMITER) {
        return Err(ContractError::validation(format!(
            "{field} {value:?} contains a NUL character"
        )));
    }
    Ok(())
}

impl BidKey {
    pub fn new(vendor_id: &str, contract_id: &str) -> Result<Self, ContractError> {
        check_component("vendorId", vendor_id)?;
        check_component("contractId", contract_id)?;
        Ok(Self {
            vendor_id: vendor_id.to_string(),
            contract_id: contract_id.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{DELIMITER}{}{DELIMITER}{}{DELIMITER}",
            self.vendor_id, self.contract_id
        )
    }

    /// Prefix shared by every bid key of `vendor_id` and by no other vendor.
    pub fn vendor_prefix(vendor_id: &str) -> Result<String, ContractError> {
        check_component("vendorId", vendor_id)?;
        Ok(format!("{DELIMITER}{vendor_id}{DELIMITER}"))
    }

    pub fn decode(key: &str) -> Result<Self, ContractError> {
        let malformed = || ContractError::validation(format!("{key:?} is not a bid composite key"));

        let body = key
            .strip_prefix(DELIMITER)
            .and_then(|rest| rest.strip_suffix(DELIMITER))
            .ok_or_else(malformed)?;

        let mut parts = body.split(DELIMITER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(vendor_id), Some(contract_id), None) => Self::new(vendor_id, contract_id),
            _ => Err(malformed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_key_starts_with_vendor_prefix() {
        let key = BidKey::new("300", "C1").unwrap().encode();

        assert_eq!(key, "\u{0}300\u{0}C1\u{0}");
        assert!(key.starts_with(&BidKey::vendor_prefix("300").unwrap()));
    }

    #[test]
    fn vendor_prefixes_do_not_nest() {
        let short = BidKey::vendor_prefix("30").unwrap();
        let long_key = BidKey::new("300", "C1").unwrap().encode();
        let other_key = BidKey::new("30", "0C1").unwrap().encode();

        assert!(!long_key.starts_with(&short));
        assert!(other_key.starts_with(&short));
        assert_ne!(long_key, other_key);
    }

    #[test]
    fn decode_inverts_encode() {
        let key = BidKey::new("400", "C-17").unwrap();
        assert_eq!(BidKey::decode(&key.encode()).unwrap(), key);
    }

    #[test]
    fn rejects_empty_and_nul_components() {
        assert!(matches!(BidKey::new("", "C1"), Err(ContractError::Validation(_))));
        assert!(matches!(BidKey::new("300", ""), Err(ContractError::Validation(_))));
        assert!(BidKey::new("3\u{0}0", "C1").is_err());
        assert!(BidKey::vendor_prefix("").is_err());
    }

    #[test]
    fn decode_rejects_foreign_keys() {
        for key in ["C1", "\u{0}300\u{0}", "\u{0}300\u{0}C1\u{0}x\u{0}", "\u{0}\u{0}C1\u{0}"] {
            assert!(BidKey::decode(key).is_err(), "{key:?}");
        }
    }
}
