// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-only content buffer.
//!
//! In-memory mirror of a ledger blob. Lines are only ever added at the end;
//! the sole way to shrink the buffer is to replace it wholesale with what the
//! store holds (see `Ledger::reload`).

/// Line terminator appended after every push.
pub const LINE_TERMINATOR: u8 = b'\n';

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentBuffer {
    content: Vec<u8>,
}

impl ContentBuffer {
    pub fn new() -> Self {
        Self { content: Vec::new() }
    }

    /// Wrap bytes read from a store.
    pub fn from_bytes(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Append `line` followed by a single newline.
    pub fn push(&mut self, line: &[u8]) {
        self.content.reserve(line.len() + 1);
        self.content.extend_from_slice(line);
        self.content.push(LINE_TERMINATOR);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Swap in freshly loaded content, discarding everything in memory.
    pub(crate) fn replace(&mut self, content: Vec<u8>) {
        self.content = content;
    }
}

impl AsRef<[u8]> for ContentBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.content
    }
}
