pub mod protocol_tests;
pub mod exchange_tests;

use crate::clock::FixedClock;
use crate::operation::Operation;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Funds transfer used as the application payload throughout the tests.
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

impl Transfer {
    pub fn new(from: &str, to: &str, value: i64, coin: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            value,
            coin: coin.to_string(),
        }
    }
}

impl Operation for Transfer {
    fn name(&self) -> &str {
        "transfer"
    }
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()))
}
