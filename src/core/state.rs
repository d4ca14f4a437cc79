//! State identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a state within one machine.
///
/// Ids are handed out by the machine builder in insertion order, starting
/// at zero, and double as indices into the machine's state arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Build an id from a raw arena index. Lookups with an id that was not
    /// issued by the machine simply find nothing.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
