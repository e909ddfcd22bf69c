//! Scripted call sequences replayed against a ledger.
//!
//! A scenario is a JSON document listing calls by operation name:
//!
//! ```json
//! { "calls": [ { "caller": "owner", "op": "mint", "args": { "account": "alice", "value": 10 } } ] }
//! ```

use crate::call::{parse_named_call, CallOutcome};
use crate::crypto::{resolve_address, Address};
use crate::error::LedgerError;
use crate::host::Ledger;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub calls: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioStep {
    pub caller: String,
    pub op: String,
    #[serde(default)]
    pub args: Value,
}

/// Result of one replayed step. Rejected calls are results, not failures of
/// the replay.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub index: usize,
    pub caller: Address,
    pub op: String,
    pub result: Result<CallOutcome, LedgerError>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Executes every step in order against `ledger`.
    pub fn run(&self, ledger: &mut Ledger) -> Vec<StepResult> {
        self.calls
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let caller = resolve_address(&step.caller);
                let result = parse_named_call(&step.op, &step.args)
                    .and_then(|call| ledger.execute(&caller, &call));
                StepResult {
                    index,
                    caller,
                    op: step.op.clone(),
                    result,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address_from_string;
    use crate::error::ErrorKind;

    #[test]
    fn test_run_reports_each_step() {
        let scenario = Scenario::from_json(
            r#"{"calls": [
                {"caller": "owner", "op": "mint", "args": {"account": "alice", "value": 10}},
                {"caller": "alice", "op": "transfer", "args": {"to": "bob", "value": 4}},
                {"caller": "bob", "op": "mint", "args": {"account": "bob", "value": 1}},
                {"caller": "bob", "op": "balance_of", "args": {"who": "bob"}},
                {"caller": "bob", "op": "fly"}
            ]}"#,
        )
        .unwrap();

        let mut ledger = Ledger::new(address_from_string("owner"));
        let results = scenario.run(&mut ledger);

        assert_eq!(results.len(), 5);
        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_ok());
        assert_eq!(
            results[2].result.as_ref().unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(results[3].result.as_ref().unwrap(), &CallOutcome::Amount(4));
        assert_eq!(
            results[4].result.as_ref().unwrap_err().kind(),
            ErrorKind::InvalidCall
        );
        assert_eq!(ledger.state().total_supply(), 10);
    }

    #[test]
    fn test_malformed_json() {
        let err = Scenario::from_json("{\"calls\": 3}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
