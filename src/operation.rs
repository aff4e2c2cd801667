// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Operation payloads.
//!
//! The ledger is open over payload types: anything with a stable name and a
//! serde representation can be recorded. The set of operations an application
//! understands is closed by the application, not here.

use serde::Serialize;

/// A payload that can be wrapped in a transaction instance.
///
/// `name` tags the instance (`Op` field) and must not change between
/// releases, since counterparts dispatch on it when reading a ledger back.
pub trait Operation: Serialize {
    fn name(&self) -> &str;
}

impl<T: Operation + ?Sized> Operation for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}
