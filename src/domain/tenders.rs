use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tender::ContractError;

/// Status value that opens a contract for bidding
pub const STATUS_OPEN: &str = "open";

/// Contract status
///
/// Only `open` has defined behavior. Any other value is kept verbatim so a
/// stored record serializes back to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContractStatus {
    Open,
    Other(String),
}

impl ContractStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => STATUS_OPEN,
            Self::Other(status) => status,
        }
    }
}

impl From<String> for ContractStatus {
    fn from(status: String) -> Self {
        if status == STATUS_OPEN {
            Self::Open
        } else {
            Self::Other(status)
        }
    }
}

impl From<&str> for ContractStatus {
    fn from(status: &str) -> Self {
        Self::from(status.to_string())
    }
}

impl From<ContractStatus> for String {
    fn from(status: ContractStatus) -> Self {
        match status {
            ContractStatus::Open => STATUS_OPEN.to_string(),
            ContractStatus::Other(status) => status,
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tender record kept in the shared world state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractWork {
    #[serde(rename = "contractid")]
    pub contract_id: String,
    pub name: String,
    pub brief: String,
    /// Bid deadline, `YYYY-MM-DD`
    #[serde(rename = "lastdate")]
    pub last_date: String,
    pub status: ContractStatus,
}

/// Request DTO for creating a contract
///
/// Missing fields deserialize as empty strings so validation can name them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContractRequest {
    #[serde(default, rename = "contractid")]
    pub contract_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brief: String,
    #[serde(default, rename = "lastdate")]
    pub last_date: String,
    #[serde(default)]
    pub status: String,
}

impl CreateContractRequest {
    /// Positional form: `contractId, name, brief, lastDate, status`
    pub fn from_args(args: &[String]) -> Result<Self, ContractError> {
        match args {
            [contract_id, name, brief, last_date, status] => Ok(Self {
                contract_id: contract_id.clone(),
                name: name.clone(),
                brief: brief.clone(),
                last_date: last_date.clone(),
                status: status.clone(),
            }),
            _ => Err(ContractError::validation(format!(
                "createContract expects 5 arguments (contractId, name, brief, lastDate, status), got {}",
                args.len()
            ))),
        }
    }

    pub fn into_contract(self) -> Result<ContractWork, ContractError> {
        let fields = [
            ("ContractId", &self.contract_id),
            ("Contract Name", &self.name),
            ("Contract Brief", &self.brief),
            ("Contract LastDate", &self.last_date),
            ("Contract Status", &self.status),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(ContractError::validation(format!(
                    "{label} field must not be empty"
                )));
            }
        }

        Ok(ContractWork {
            contract_id: self.contract_id,
            name: self.name,
            brief: self.brief,
            last_date: self.last_date,
            status: ContractStatus::from(self.status),
        })
    }
}
