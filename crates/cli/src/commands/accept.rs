use std::path::Path;
use tally_ledger::{Config, Digest};

use super::{commit_durably, open_for_write};

/// Append a proposer's transaction line verbatim and persist.
pub fn execute(ledger: &Path, config: Option<&Config>, instance: &str) -> anyhow::Result<Digest> {
    let mut ledger = open_for_write(ledger, config)?;
    let (_, digest) = ledger.accept_line(instance)?;
    commit_durably(&mut ledger, &[])?;
    Ok(digest)
}

pub fn run(ledger: &Path, config: Option<&Config>, instance: &str) -> anyhow::Result<()> {
    println!("{}", execute(ledger, config, instance)?);
    Ok(())
}
