//! Domain types and DTOs
//!
//! Records stored on the ledger and the request shapes used to create them.
//! Field names on the wire are lower-case (`contractid`, `lastdate`, `bidamt`).

pub mod bids;
pub mod tenders;

pub use bids::*;
pub use tenders::*;

use chrono::NaiveDate;

use crate::tender::ContractError;

/// Calendar date format used by every date field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` field. Zero padding is required.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ContractError> {
    let malformed = || {
        ContractError::validation(format!(
            "failed to parse {field} {value:?}: expected YYYY-MM-DD"
        ))
    };

    if value.len() != 10 {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| malformed())
}
