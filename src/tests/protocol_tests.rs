// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::{fixed_clock, Transfer};
use crate::digest::{digest_of, DigestAlgorithm};
use crate::entry::LedgerEntry;
use crate::instance::Transaction;
use crate::ledger::Ledger;
use crate::shared::{share, LedgerRegistry};
use crate::signature::Signature;
use crate::storage::MemoryStore;
use std::thread;

fn last_line(content: &[u8]) -> String {
    let text = String::from_utf8(content.to_vec()).unwrap();
    text.trim_end_matches('\n').rsplit('\n').next().unwrap().to_string()
}

#[test]
fn test_two_party_mutual_attestation() {
    let alice_store = MemoryStore::with_content("alice.log", "alice genesis\n");
    let bob_store = MemoryStore::with_content("bob.log", "bob genesis\nolder entry\n");
    let mut alice = Ledger::open(alice_store.clone()).unwrap().with_clock(fixed_clock());
    let mut bob = Ledger::open(bob_store.clone()).unwrap();

    // A makes the transfer.
    let transfer = Transfer::new("a@x", "b@x", 100, "US$");
    let (tx, d1) = alice.make(&transfer, vec!["b@x".into()]).unwrap();

    // B accepts the exact bytes it received.
    let wire = tx.as_bytes().to_vec();
    let received = Transaction::from_line(wire).unwrap();
    let d2 = bob.accept(&received);

    assert_ne!(d1, d2, "ledgers were seeded differently");

    alice.commit(&[Signature::new("b@x", d2)]).unwrap();
    bob.commit(&[Signature::new("a@x", d1)]).unwrap();

    let alice_persisted = alice_store.contents().unwrap();
    let bob_persisted = bob_store.contents().unwrap();

    // Transaction lines are byte-identical on both sides.
    let tx_line = String::from_utf8(tx.as_bytes().to_vec()).unwrap();
    assert!(String::from_utf8_lossy(&alice_persisted).contains(&format!("\n{}\n", tx_line)));
    assert!(String::from_utf8_lossy(&bob_persisted).contains(&format!("\n{}\n", tx_line)));

    // Each trailing signature names the other party and its digest.
    let alice_sig = Signature::parse(&last_line(&alice_persisted)).unwrap();
    assert_eq!(alice_sig, Signature::new("b@x", d2));
    let bob_sig = Signature::parse(&last_line(&bob_persisted)).unwrap();
    assert_eq!(bob_sig, Signature::new("a@x", d1));

    // D2 is what B's ledger hashed to right before B's signature line.
    let bob_before_sig = &bob_persisted[..bob_persisted.len() - bob_sig.to_line().len() - 1];
    assert_eq!(digest_of(DigestAlgorithm::Sha256, bob_before_sig), d2);
}

#[test]
fn test_initiator_can_persist_before_attestation() {
    let store = MemoryStore::new("alice.log");
    let mut alice = Ledger::open(store.clone()).unwrap();
    let (tx, _) = alice.make(&Transfer::new("a@x", "b@x", 1, "US$"), vec!["b@x".into()]).unwrap();

    alice.commit(&[]).unwrap();
    assert_eq!(store.contents().unwrap(), [tx.as_bytes(), &b"\n"[..]].concat());

    // The attestation arrives later.
    let late = digest_of(DigestAlgorithm::Blake3, b"bob's ledger");
    alice.commit(&[Signature::new("b@x", late)]).unwrap();
    assert_eq!(
        alice.entries().last().map(|(_, e)| e.kind()),
        Some("signature")
    );
}

#[test]
fn test_multiple_attestations_in_one_commit() {
    let store = MemoryStore::new("alice.log");
    let mut alice = Ledger::open(store.clone()).unwrap();
    alice.make(&Transfer::new("a@x", "b@x", 1, "US$"), vec!["b@x".into(), "c@x".into()]).unwrap();

    let db = digest_of(DigestAlgorithm::Blake3, b"b");
    let dc = digest_of(DigestAlgorithm::Blake3, b"c");
    alice
        .commit(&[Signature::new("b@x", db), Signature::new("c@x", dc)])
        .unwrap();

    let signatures: Vec<Signature> = alice
        .entries()
        .into_iter()
        .filter_map(|(_, e)| match e {
            LedgerEntry::Signature(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(signatures, vec![Signature::new("b@x", db), Signature::new("c@x", dc)]);
}

#[test]
fn test_shared_ledger_serializes_makes() {
    let store = MemoryStore::new("shared.log");
    let ledger = share(Ledger::open(store.clone()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                let mut guard = ledger.lock();
                let (_, digest) = guard
                    .make(&Transfer::new("a@x", "b@x", i, "US$"), vec!["b@x".into()])
                    .unwrap();
                // Under the lock the returned digest matches the buffer.
                assert_eq!(digest, guard.digest());
                guard.commit(&[]).unwrap();
                digest
            })
        })
        .collect();

    let digests: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let persisted = store.contents().unwrap();
    assert_eq!(persisted.iter().filter(|b| **b == b'\n').count(), 8);
    // One of the handed-out digests is the digest of the final persisted state.
    assert!(digests.contains(&digest_of(DigestAlgorithm::Sha256, &persisted)));
}

#[test]
fn test_registry_shares_ledger_between_callers() {
    let registry = LedgerRegistry::default();
    let store = MemoryStore::new("alice.log");

    let first = registry.open(store.clone()).unwrap();
    let second = registry.open(store.clone()).unwrap();

    first.lock().push(b"from first");
    second.lock().push(b"from second");
    second.lock().commit(&[]).unwrap();

    assert_eq!(store.contents().unwrap(), b"from first\nfrom second\n".to_vec());
}
