//! Function dispatch
//!
//! Maps an invocation's function name and positional string arguments onto
//! the contract operations and renders the result as JSON.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::domain::CreateContractRequest;
use crate::ledger::{LedgerError, LedgerStub};

use super::{ContractError, TenderContract};

/// Externally invocable functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    CreateContract,
    QueryContract,
    ListAllContracts,
    CreateBid,
    QueryBidPrivate,
    ListAllBids,
}

impl Function {
    pub const ALL: [Function; 6] = [
        Self::CreateContract,
        Self::QueryContract,
        Self::ListAllContracts,
        Self::CreateBid,
        Self::QueryBidPrivate,
        Self::ListAllBids,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateContract => "createContract",
            Self::QueryContract => "queryContract",
            Self::ListAllContracts => "listAllContracts",
            Self::CreateBid => "createBid",
            Self::QueryBidPrivate => "queryBidPrivate",
            Self::ListAllBids => "listAllBids",
        }
    }

    /// Whether the function only reads state
    pub fn is_query(&self) -> bool {
        !matches!(self, Self::CreateContract | Self::CreateBid)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive, so `CreateBid` and `createBid` name the same function
impl FromStr for Function {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContractError::validation(format!("unknown function {s:?}")))
    }
}

fn expect_args<'a, const N: usize>(
    function: Function,
    args: &'a [String],
) -> Result<&'a [String; N], ContractError> {
    args.try_into().map_err(|_| {
        ContractError::validation(format!(
            "{function} expects {N} argument(s), got {}",
            args.len()
        ))
    })
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ContractError> {
    serde_json::to_value(value)
        .map_err(|e| LedgerError::Backend(format!("failed to encode response: {e}")).into())
}

impl TenderContract {
    /// Run `function` against `stub`. Writes return `null`.
    pub fn invoke(
        &self,
        stub: &mut dyn LedgerStub,
        function: &str,
        args: &[String],
    ) -> Result<Value, ContractError> {
        let function: Function = function.parse()?;
        tracing::debug!(tx_id = %stub.tx_id(), function = %function, args = args.len(), "Dispatching");

        match function {
            Function::CreateContract => {
                let request = if args.is_empty() {
                    self.contract_request_from_transient(&*stub)?
                } else {
                    CreateContractRequest::from_args(args)?
                };
                self.create_contract(stub, request)?;
                Ok(Value::Null)
            }
            Function::QueryContract => {
                let [contract_id] = expect_args::<1>(function, args)?;
                to_payload(&self.query_contract(stub, contract_id)?)
            }
            Function::ListAllContracts => {
                expect_args::<0>(function, args)?;
                to_payload(&self.list_all_contracts(stub)?)
            }
            Function::CreateBid => {
                if !args.is_empty() {
                    return Err(ContractError::validation(
                        "bid details must be passed in the transient map, not as arguments",
                    ));
                }
                self.create_bid(stub)?;
                Ok(Value::Null)
            }
            Function::QueryBidPrivate => {
                let bid = match args {
                    [contract_id] => self.query_bid_private(stub, contract_id, None)?,
                    [contract_id, vendor_id] => {
                        self.query_bid_private(stub, contract_id, Some(vendor_id.as_str()))?
                    }
                    _ => {
                        return Err(ContractError::validation(format!(
                            "{function} expects contractId and an optional vendorId, got {} argument(s)",
                            args.len()
                        )))
                    }
                };
                to_payload(&bid)
            }
            Function::ListAllBids => {
                expect_args::<0>(function, args)?;
                to_payload(&self.list_all_bids(stub)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tender::test_support::{bid_json, Fixture, GOV, VENDOR_A};
    use crate::tender::BID_DETAILS_KEY;
    use serde_json::json;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn function_names_are_case_insensitive() {
        assert_eq!("CreateBid".parse::<Function>().unwrap(), Function::CreateBid);
        assert_eq!("listallbids".parse::<Function>().unwrap(), Function::ListAllBids);
        assert!(matches!("DeleteBid".parse::<Function>(), Err(ContractError::Validation(_))));
        assert!(Function::ListAllContracts.is_query());
        assert!(!Function::CreateBid.is_query());
    }

    #[test]
    fn queries_render_records_as_json() {
        let mut fx = Fixture::new();
        fx.create_contract("C1", "2024-06-30", "open");

        let value = fx
            .run(GOV, |c, stub| c.invoke(stub, "queryContract", &args(&["C1"])))
            .unwrap();
        assert_eq!(value["contractid"], json!("C1"));
        assert_eq!(value["lastdate"], json!("2024-06-30"));

        let list = fx
            .run(GOV, |c, stub| c.invoke(stub, "ListAllContracts", &[]))
            .unwrap();
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn empty_listing_is_an_empty_array() {
        let mut fx = Fixture::new();
        let list = fx
            .run(VENDOR_A, |c, stub| c.invoke(stub, "listAllBids", &[]))
            .unwrap();
        assert_eq!(list, json!([]));
    }

    #[test]
    fn arity_is_checked() {
        let mut fx = Fixture::new();

        for (function, given) in [
            ("queryContract", args(&[])),
            ("listAllContracts", args(&["x"])),
            ("createContract", args(&["C1", "n"])),
            ("queryBidPrivate", args(&["C1", "300", "extra"])),
            ("createBid", args(&["300"])),
        ] {
            let err = fx
                .run(GOV, |c, stub| c.invoke(stub, function, &given))
                .unwrap_err();
            assert!(matches!(err, ContractError::Validation(_)), "{function}");
        }
    }

    #[test]
    fn create_bid_then_query_through_dispatch() {
        let mut fx = Fixture::new();
        fx.create_contract("C1", "2024-06-30", "open");

        let invocation = fx
            .invocation(VENDOR_A, VENDOR_A)
            .with_transient(BID_DETAILS_KEY, bid_json("300", "C1", 500, "2024-06-01"));
        let written = fx
            .run_as(invocation, |c, stub| c.invoke(stub, "createBid", &[]))
            .unwrap();
        assert_eq!(written, Value::Null);

        let bid = fx
            .run(VENDOR_A, |c, stub| c.invoke(stub, "queryBidPrivate", &args(&["C1"])))
            .unwrap();
        assert_eq!(
            bid,
            json!({"vendorid": "300", "contractid": "C1", "bidamt": 500, "biddate": "2024-06-01"})
        );
    }
}
