// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Transaction Instance Model
//!
//! An [`Instance`] is one logical event: which operation, its payload, who
//! attests it, and when it was created. A [`Transaction`] pairs an instance
//! with the exact bytes it occupies in a ledger line.
//!
//! # Wire form
//! One line of compact JSON:
//! ```text
//! {"Op":"transfer","OpInfo":{...},"SponsorList":["b@x"],"Date":"2025-03-01T12:00:00Z"}
//! ```
//! Older ledgers carry a fixed `From`/`To` pair instead of `SponsorList`;
//! those decode into a two-element counterparty list.
//!
//! # Invariant
//! Once a transaction line is appended it is never re-encoded. Acceptance
//! appends the proposer's bytes verbatim so that both ledgers hold the same
//! line even if the two sides would serialize the instance differently.

use crate::error::{LedgerError, Result};
use crate::operation::Operation;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireInstance")]
pub struct Instance {
    /// Stable operation name, taken from [`Operation::name`].
    #[serde(rename = "Op")]
    pub op: String,

    /// Structured operation payload.
    #[serde(rename = "OpInfo")]
    pub op_info: Value,

    /// Ordered identifiers of the parties expected to attest this event.
    #[serde(rename = "SponsorList")]
    pub counterparties: Vec<String>,

    /// Creation time, stamped once by the proposer.
    #[serde(rename = "Date")]
    pub date: DateTime<Utc>,
}

/// Accepts both the list schema and the legacy pair schema.
#[derive(Deserialize)]
struct WireInstance {
    #[serde(rename = "Op")]
    op: String,
    #[serde(rename = "OpInfo", default)]
    op_info: Value,
    #[serde(rename = "SponsorList", default)]
    sponsor_list: Option<Vec<String>>,
    #[serde(rename = "From", default)]
    from: Option<String>,
    #[serde(rename = "To", default)]
    to: Option<String>,
    #[serde(rename = "Date")]
    date: DateTime<Utc>,
}

impl From<WireInstance> for Instance {
    fn from(wire: WireInstance) -> Self {
        let counterparties = match wire.sponsor_list {
            Some(list) => list,
            None => wire.from.into_iter().chain(wire.to).collect(),
        };
        Self {
            op: wire.op,
            op_info: wire.op_info,
            counterparties,
            date: wire.date,
        }
    }
}

impl Instance {
    /// Build an instance from a typed operation.
    ///
    /// Fails if the payload cannot be represented as JSON.
    pub fn new<O: Operation>(
        op: &O,
        counterparties: Vec<String>,
        date: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            op: op.name().to_string(),
            op_info: serde_json::to_value(op)?,
            counterparties,
            date,
        })
    }

    /// Two-party form: `from` and `to` become an ordered counterparty list.
    pub fn between<O: Operation>(
        op: &O,
        from: impl Into<String>,
        to: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self> {
        Self::new(op, vec![from.into(), to.into()], date)
    }

    /// Decode the payload back into an application type.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.op_info.clone())?)
    }

    pub fn involves(&self, party: &str) -> bool {
        self.counterparties.iter().any(|c| c == party)
    }
}

/// Wire form of a freshly made instance. Borrows the typed payload so its
/// fields are written in declared order rather than through a `Value` map.
#[derive(Serialize)]
struct OutgoingInstance<'a, O> {
    #[serde(rename = "Op")]
    op: &'a str,
    #[serde(rename = "OpInfo")]
    op_info: &'a O,
    #[serde(rename = "SponsorList")]
    counterparties: &'a [String],
    #[serde(rename = "Date")]
    date: &'a DateTime<Utc>,
}

/// An instance together with its ledger line.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    instance: Instance,
    line: Vec<u8>,
}

impl Transaction {
    /// Build and serialize an instance straight from a typed operation.
    /// Used only by the proposer.
    pub fn from_operation<O: Operation>(
        op: &O,
        counterparties: Vec<String>,
        date: DateTime<Utc>,
    ) -> Result<Self> {
        let line = serde_json::to_vec(&OutgoingInstance {
            op: op.name(),
            op_info: op,
            counterparties: &counterparties,
            date: &date,
        })?;
        let instance = Instance::new(op, counterparties, date)?;
        Ok(Self { instance, line })
    }

    /// Serialize an already built instance. The payload goes through its
    /// `Value` form, so object keys come out sorted.
    pub fn encode(instance: Instance) -> Result<Self> {
        let line = serde_json::to_vec(&instance)?;
        Ok(Self { instance, line })
    }

    /// Adopt a line produced elsewhere, keeping its bytes untouched.
    ///
    /// A single trailing newline is tolerated and dropped. Embedded newlines
    /// are rejected because they would split the record across lines.
    pub fn from_line(line: impl Into<Vec<u8>>) -> Result<Self> {
        let mut line = line.into();
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        if line.is_empty() {
            return Err(LedgerError::InvalidInstance("empty line".to_string()));
        }
        if line.contains(&b'\n') {
            return Err(LedgerError::InvalidInstance(
                "instance spans more than one line".to_string(),
            ));
        }
        let instance: Instance = serde_json::from_slice(&line)
            .map_err(|e| LedgerError::InvalidInstance(e.to_string()))?;
        Ok(Self { instance, line })
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Exact bytes of the ledger line, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.line
    }

    pub fn into_instance(self) -> Instance {
        self.instance
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.line))
    }
}
