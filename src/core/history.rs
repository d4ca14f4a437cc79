//! Bounded record of the transitions a machine has taken.
//!
//! The history is a ring: once full, recording a transition drops the
//! oldest one. A capacity of zero disables recording entirely, which keeps
//! long-running loops allocation-free after start-up.

use super::event::Event;
use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// The event captured by the transition that fired
    pub event: Event,
    /// Engine clock reading when the transition fired
    pub at_millis: u64,
    /// Wall-clock time of the transition
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of state transitions, oldest first.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{Event, StateHistory, StateId, StateTransition};
/// use chrono::Utc;
///
/// let (a, b) = (StateId::from_index(0), StateId::from_index(1));
/// let mut history = StateHistory::with_capacity(4);
/// history.record(StateTransition {
///     from: a,
///     to: b,
///     event: Event::none(),
///     at_millis: 10,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![a, b]);
/// ```
///
/// Deserializing keeps at most `capacity` records, the newest ones.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "StoredHistory")]
pub struct StateHistory {
    capacity: usize,
    transitions: VecDeque<StateTransition>,
}

#[derive(Deserialize)]
struct StoredHistory {
    capacity: usize,
    transitions: VecDeque<StateTransition>,
}

impl From<StoredHistory> for StateHistory {
    fn from(stored: StoredHistory) -> Self {
        let mut transitions = stored.transitions;
        let excess = transitions.len().saturating_sub(stored.capacity);
        transitions.drain(..excess);
        Self {
            capacity: stored.capacity,
            transitions,
        }
    }
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl StateHistory {
    /// Create an empty history keeping at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a transition, evicting the oldest record when full.
    pub fn record(&mut self, transition: StateTransition) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed: the first recorded source, then every target.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Engine-clock span between the oldest and newest record.
    ///
    /// Returns `None` if nothing is recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        Some(Duration::from_millis(
            last.at_millis.saturating_sub(first.at_millis),
        ))
    }

    /// Wall-clock span between the oldest and newest record.
    pub fn wall_duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Iterate over recorded transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
