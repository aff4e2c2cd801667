use std::path::Path;
use tally_ledger::{digest_of, DigestAlgorithm};

use super::read_ledger;

pub fn run(ledger: &Path, algorithm: DigestAlgorithm) -> anyhow::Result<()> {
    let content = read_ledger(ledger)?;
    println!("{}", digest_of(algorithm, &content));
    Ok(())
}
