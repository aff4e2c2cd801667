use crate::error::Result;
use crate::file_store::FileStore;
use std::fs;
use std::path::{Path, PathBuf};
use tally_ledger::{Exchange, Ledger, Operation};

pub const ALICE: &str = "alice@example.org";
pub const BOB: &str = "bob@example.org";

pub struct ScenarioPaths {
    pub alice: PathBuf,
    pub bob: PathBuf,
}

/// Write two ledgers that completed one exchange of `op`, ALICE initiating.
///
/// Each ledger starts from its own seed line, so the two sides end up with
/// the same transaction line but different cumulative digests, each signed
/// by the other party.
pub fn generate_two_party_scenario<O: Operation>(dir: &Path, op: &O) -> Result<ScenarioPaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let alice_path = dir.join("alice.log");
    let bob_path = dir.join("bob.log");

    let mut alice = Ledger::open(FileStore::new(&alice_path))?;
    let mut bob = Ledger::open(FileStore::new(&bob_path))?;
    alice.push(format!("opened by {}", ALICE).as_bytes());
    bob.push(format!("opened by {}", BOB).as_bytes());

    let mut proposal = Exchange::create(&mut alice, op, vec![BOB.to_string()])?;
    let (transaction, alice_digest) = proposal.propose()?;
    let transaction = transaction.clone();

    let mut reply = Exchange::receive(&mut bob, transaction)?;
    let bob_digest = reply.local_digest();

    // Each side persists only after it holds the other's digest.
    reply.record_acceptance(ALICE, alice_digest)?;
    proposal.record_acceptance(BOB, bob_digest)?;
    reply.commit(&mut bob)?;
    proposal.commit(&mut alice)?;

    Ok(ScenarioPaths {
        alice: alice_path,
        bob: bob_path,
    })
}
