use serde::{Deserialize, Serialize};
use tally_ledger::Operation;

/// Move `value` units of `coin` from one party to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Value")]
    pub value: i64,
    #[serde(rename = "Coin")]
    pub coin: String,
}

impl Operation for Transfer {
    fn name(&self) -> &str {
        "transfer"
    }
}
