use std::path::Path;
use tally_ledger::{Config, Digest, Transaction};

use super::{commit_durably, open_for_write};
use crate::ops::Transfer;

/// Record a transfer from the configured party to `to` and persist it.
///
/// The returned line is what the counterparty passes to `accept`.
pub fn execute(
    ledger: &Path,
    config: &Config,
    to: &str,
    amount: i64,
    unit: &str,
) -> anyhow::Result<(Transaction, Digest)> {
    if !config.is_contact(to) {
        tracing::warn!(to, "Counterparty is not a known contact");
    }
    let op = Transfer {
        from: config.self_id.clone(),
        to: to.to_string(),
        value: amount,
        coin: unit.to_string(),
    };

    let mut ledger = open_for_write(ledger, Some(config))?;
    let (transaction, digest) = ledger.make(&op, vec![to.to_string()])?;
    commit_durably(&mut ledger, &[])?;
    Ok((transaction, digest))
}

pub fn run(ledger: &Path, config: &Config, to: &str, amount: i64, unit: &str) -> anyhow::Result<()> {
    let (transaction, digest) = execute(ledger, config, to, amount, unit)?;
    println!("{}", transaction);
    println!("{}", digest);
    Ok(())
}
