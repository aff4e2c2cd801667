// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reading a ledger back as entries.

use crate::instance::Transaction;
use crate::signature::Signature;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    Transaction(Transaction),
    Signature(Signature),
    /// A line that is neither; kept so line numbers stay meaningful.
    Unrecognized(String),
}

impl LedgerEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEntry::Transaction(_) => "transaction",
            LedgerEntry::Signature(_) => "signature",
            LedgerEntry::Unrecognized(_) => "unrecognized",
        }
    }

    /// Classify one line (without its terminator).
    pub fn parse(line: &[u8]) -> Self {
        if line.first() == Some(&b'{') {
            if let Ok(tx) = Transaction::from_line(line.to_vec()) {
                return LedgerEntry::Transaction(tx);
            }
        }
        let text = String::from_utf8_lossy(line);
        match Signature::parse(&text) {
            Ok(sig) => LedgerEntry::Signature(sig),
            Err(_) => LedgerEntry::Unrecognized(text.into_owned()),
        }
    }
}

/// Split `content` on newlines and classify every line.
///
/// Line numbers start at 1. A final unterminated fragment is still reported.
pub fn parse_entries(content: &[u8]) -> Vec<(usize, LedgerEntry)> {
    lines(content)
        .enumerate()
        .map(|(i, line)| {
            let entry = LedgerEntry::parse(line);
            if let LedgerEntry::Unrecognized(text) = &entry {
                tracing::warn!(line = i + 1, text = %text, "Unrecognized ledger line");
            }
            (i + 1, entry)
        })
        .collect()
}

/// Lines of `content` without terminators.
pub(crate) fn lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    let empty = content.is_empty();
    body.split(|b| *b == b'\n').filter(move |_| !empty)
}
