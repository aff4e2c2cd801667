// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::Transfer;
use crate::digest::{digest_of, DigestAlgorithm};
use crate::error::LedgerError;
use crate::exchange::{Exchange, Phase};
use crate::instance::Transaction;
use crate::ledger::Ledger;
use crate::signature::Signature;
use crate::storage::MemoryStore;

fn parties() -> (Ledger<MemoryStore>, MemoryStore, Ledger<MemoryStore>, MemoryStore) {
    let a_store = MemoryStore::with_content("a.log", "seed a\n");
    let b_store = MemoryStore::with_content("b.log", "seed b\n");
    (
        Ledger::open(a_store.clone()).unwrap(),
        a_store,
        Ledger::open(b_store.clone()).unwrap(),
        b_store,
    )
}

#[test]
fn test_full_exchange() {
    let (mut alice, a_store, mut bob, b_store) = parties();
    let transfer = Transfer::new("a@x", "b@x", 100, "US$");

    let mut outgoing = Exchange::create(&mut alice, &transfer, vec!["b@x".into()]).unwrap();
    assert_eq!(outgoing.phase(), Phase::Created);

    let (tx, d1) = outgoing.propose().unwrap();
    let wire = tx.as_bytes().to_vec();
    assert_eq!(outgoing.phase(), Phase::Proposed);

    let mut incoming = Exchange::receive(&mut bob, Transaction::from_line(wire).unwrap()).unwrap();
    assert_eq!(incoming.phase(), Phase::Accepted);
    let d2 = incoming.local_digest();

    outgoing.record_acceptance("b@x", d2).unwrap();
    incoming.record_acceptance("a@x", d1).unwrap();

    outgoing.commit(&mut alice).unwrap();
    incoming.commit(&mut bob).unwrap();

    assert_eq!(outgoing.phase(), Phase::Committed);
    assert_eq!(incoming.phase(), Phase::Committed);
    assert!(alice.open_exchange().is_none());
    assert!(bob.open_exchange().is_none());

    let a_text = String::from_utf8(a_store.contents().unwrap()).unwrap();
    let b_text = String::from_utf8(b_store.contents().unwrap()).unwrap();
    assert!(a_text.ends_with(&format!("{}\n", Signature::new("b@x", d2))));
    assert!(b_text.ends_with(&format!("{}\n", Signature::new("a@x", d1))));
}

#[test]
fn test_one_exchange_in_flight_per_ledger() {
    let (mut alice, _, _, _) = parties();
    let t = Transfer::new("a@x", "b@x", 1, "US$");

    let mut first = Exchange::create(&mut alice, &t, vec!["b@x".into()]).unwrap();
    let second = Exchange::create(&mut alice, &t, vec!["b@x".into()]);
    assert!(matches!(second, Err(LedgerError::InvalidTransition(_))));

    // The refused exchange appended nothing.
    assert_eq!(alice.entries().len(), 2);

    first.abandon(&mut alice).unwrap();
    assert_eq!(first.phase(), Phase::Abandoned);
    assert!(Exchange::create(&mut alice, &t, vec!["b@x".into()]).is_ok());
}

#[test]
fn test_abandon_keeps_transaction_line() {
    let (mut alice, _, _, _) = parties();
    let mut exchange =
        Exchange::create(&mut alice, &Transfer::new("a@x", "b@x", 1, "US$"), vec![]).unwrap();
    let before = alice.content().to_vec();

    exchange.abandon(&mut alice).unwrap();
    assert_eq!(alice.content(), &before[..]);
    assert!(matches!(
        exchange.abandon(&mut alice),
        Err(LedgerError::InvalidTransition(_))
    ));
}

#[test]
fn test_out_of_order_transitions() {
    let (mut alice, _, _, _) = parties();
    let mut exchange =
        Exchange::create(&mut alice, &Transfer::new("a@x", "b@x", 1, "US$"), vec![]).unwrap();
    let digest = digest_of(DigestAlgorithm::Blake3, b"b");

    // Cannot record before proposing, nor commit before any acceptance.
    assert!(exchange.record_acceptance("b@x", digest).is_err());
    assert!(exchange.commit(&mut alice).is_err());

    exchange.propose().unwrap();
    assert!(exchange.commit(&mut alice).is_err());

    exchange.record_acceptance("b@x", digest).unwrap();
    exchange.commit(&mut alice).unwrap();
    assert!(exchange.propose().is_err());
    assert!(exchange.commit(&mut alice).is_err());
}

#[test]
fn test_counterparty_cannot_propose() {
    let (mut alice, _, mut bob, _) = parties();
    let (tx, _) = alice.make(&Transfer::new("a@x", "b@x", 1, "US$"), vec![]).unwrap();
    let mut incoming = Exchange::receive(&mut bob, tx).unwrap();
    assert!(incoming.propose().is_err());
}

#[test]
fn test_commit_on_foreign_ledger_rejected() {
    let (mut alice, _, mut bob, _) = parties();
    let mut exchange =
        Exchange::create(&mut alice, &Transfer::new("a@x", "b@x", 1, "US$"), vec![]).unwrap();
    exchange.propose().unwrap();
    exchange
        .record_acceptance("b@x", digest_of(DigestAlgorithm::Blake3, b"b"))
        .unwrap();

    assert!(matches!(
        exchange.commit(&mut bob),
        Err(LedgerError::InvalidTransition(_))
    ));
    assert_eq!(exchange.phase(), Phase::Accepted);
}

#[test]
fn test_commit_retry_after_storage_failure() {
    let (mut alice, a_store, _, _) = parties();
    let mut exchange =
        Exchange::create(&mut alice, &Transfer::new("a@x", "b@x", 1, "US$"), vec![]).unwrap();
    exchange.propose().unwrap();
    let d2 = digest_of(DigestAlgorithm::Blake3, b"b");
    exchange.record_acceptance("b@x", d2).unwrap();

    a_store.fail_io(true);
    assert!(matches!(
        exchange.commit(&mut alice),
        Err(LedgerError::Storage(_))
    ));
    assert_eq!(exchange.phase(), Phase::Accepted);

    a_store.fail_io(false);
    exchange.commit(&mut alice).unwrap();

    // The signature line was appended exactly once.
    let text = String::from_utf8(a_store.contents().unwrap()).unwrap();
    assert_eq!(text.matches(&Signature::new("b@x", d2).to_line()).count(), 1);
}

fn accepted_exchange(alice: &mut Ledger<MemoryStore>) -> Exchange {
    let mut exchange =
        Exchange::create(alice, &Transfer::new("a@x", "b@x", 1, "US$"), vec!["b@x".into()])
            .unwrap();
    exchange.propose().unwrap();
    exchange
        .record_acceptance("b@x", digest_of(DigestAlgorithm::Sha256, b"b"))
        .unwrap();
    exchange
}

#[test]
fn test_reload_releases_exchange() {
    let (mut alice, a_store, _, _) = parties();
    let mut exchange = accepted_exchange(&mut alice);

    alice.reload().unwrap();
    assert!(alice.open_exchange().is_none());

    // The transaction line is gone, so there is nothing left to attest.
    assert!(matches!(
        exchange.commit(&mut alice),
        Err(LedgerError::InvalidTransition(_))
    ));
    assert_eq!(exchange.phase(), Phase::Accepted);
    assert_eq!(alice.content(), b"seed a\n");
    assert_eq!(a_store.contents().unwrap(), b"seed a\n".to_vec());

    exchange.abandon(&mut alice).unwrap();
    assert!(Exchange::create(&mut alice, &Transfer::new("a@x", "b@x", 2, "US$"), vec![]).is_ok());
}

#[test]
fn test_reload_after_failed_commit_blocks_retry() {
    let (mut alice, a_store, _, _) = parties();
    let mut exchange = accepted_exchange(&mut alice);

    a_store.fail_io(true);
    assert!(matches!(
        exchange.commit(&mut alice),
        Err(LedgerError::Storage(_))
    ));
    a_store.fail_io(false);

    alice.reload().unwrap();
    assert!(matches!(
        exchange.commit(&mut alice),
        Err(LedgerError::InvalidTransition(_))
    ));
    assert_ne!(exchange.phase(), Phase::Committed);
    assert_eq!(a_store.contents().unwrap(), b"seed a\n".to_vec());
}

#[test]
fn test_reload_without_pending_bytes_keeps_exchange() {
    let (mut alice, _, _, _) = parties();
    let mut exchange = accepted_exchange(&mut alice);
    alice.save().unwrap();

    alice.reload().unwrap();
    assert!(alice.open_exchange().is_some());
    exchange.commit(&mut alice).unwrap();
    assert_eq!(exchange.phase(), Phase::Committed);
}

#[test]
fn test_acceptance_with_unrenderable_author_rejected() {
    let (mut alice, _, _, _) = parties();
    let mut exchange =
        Exchange::create(&mut alice, &Transfer::new("a@x", "b@x", 1, "US$"), vec![]).unwrap();
    exchange.propose().unwrap();
    let digest = digest_of(DigestAlgorithm::Sha256, b"b");

    assert!(matches!(
        exchange.record_acceptance("b@x\nc@x", digest),
        Err(LedgerError::InvalidSignature(_))
    ));
    assert!(exchange.attestations().is_empty());
    assert_eq!(exchange.phase(), Phase::Proposed);
}
