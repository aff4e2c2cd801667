use std::path::Path;
use tally_ledger::{Config, Digest, Signature};

use super::{commit_durably, open_for_write};

/// Record `author`'s digest as a signature line and persist.
pub fn run(ledger: &Path, config: Option<&Config>, author: &str, digest: Digest) -> anyhow::Result<()> {
    let mut ledger = open_for_write(ledger, config)?;
    let signature = Signature::new(author, digest);
    commit_durably(&mut ledger, std::slice::from_ref(&signature))?;
    println!("{}", signature.to_line());
    Ok(())
}
