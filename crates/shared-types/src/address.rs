//! `Address`: an account's index into `State.accounts`, distinct from
//! `AccountKey` (the account's signing identity). A transaction's `origin`
//! is an `Address`; looking it up in `State.accounts` yields the
//! `AccountStatus` the transaction executes against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an account within `State.accounts`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(u64);

impl Address {
    /// Wrap a raw account index.
    pub const fn new(index: u64) -> Self {
        Address(index)
    }

    /// The raw account index.
    pub const fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Address {
    fn from(index: u64) -> Self {
        Address(index)
    }
}
