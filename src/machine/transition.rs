//! Prioritized transitions between states.
//!
//! A transition is a predicate plus a target state. The predicate comes
//! from a small closed set of kinds, each with a fixed priority class. A
//! state evaluates its transitions class by class, lowest number first.

use super::condition::Condition;
use crate::core::{AlarmTimer, Event, EventKind, StateId};
use crate::sources::SharedSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority class of a transition. Lower values are evaluated first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransitionPriority {
    /// Combined event/timeout check sharing the highest slot
    Priority = 0,
    /// Boolean condition
    Condition = 1,
    /// Event matching
    Event = 2,
    /// Owning state's timer
    Timeout = 3,
    /// Unconditional
    Immediate = 4,
}

impl TransitionPriority {
    /// Every class, in evaluation order.
    pub const ALL: [TransitionPriority; 5] = [
        Self::Priority,
        Self::Condition,
        Self::Event,
        Self::Timeout,
        Self::Immediate,
    ];
}

/// Expected event kind paired with the source it is pulled from.
pub struct EventMatch {
    expected: EventKind,
    source: Option<SharedSource>,
}

impl EventMatch {
    pub fn new(expected: EventKind, source: SharedSource) -> Self {
        Self {
            expected,
            source: Some(source),
        }
    }

    /// Match without a source. It never fires.
    pub fn detached(expected: EventKind) -> Self {
        Self {
            expected,
            source: None,
        }
    }

    pub fn expected(&self) -> EventKind {
        self.expected
    }

    /// Pull one event from the source and keep it if the kind matches.
    ///
    /// A source that is already borrowed elsewhere counts as silent.
    fn poll(&mut self) -> Option<Event> {
        let source = self.source.as_ref()?;
        let event = source.try_borrow_mut().ok()?.poll_event();
        (event.kind() == self.expected).then_some(event)
    }
}

impl fmt::Debug for EventMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventMatch")
            .field("expected", &self.expected)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

/// The predicate of a transition.
#[derive(Debug)]
pub enum TransitionKind {
    /// Event check first, then (if enabled) the owning state's timer.
    Priority {
        event: Option<EventMatch>,
        check_timeout: bool,
    },
    Condition(Condition),
    Event(EventMatch),
    StateTimeout,
    Immediate,
}

impl TransitionKind {
    pub fn priority(&self) -> TransitionPriority {
        match self {
            Self::Priority { .. } => TransitionPriority::Priority,
            Self::Condition(_) => TransitionPriority::Condition,
            Self::Event(_) => TransitionPriority::Event,
            Self::StateTimeout => TransitionPriority::Timeout,
            Self::Immediate => TransitionPriority::Immediate,
        }
    }
}

/// A prioritized predicate leading to a target state.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::StateId;
/// use tickfsm::machine::{Transition, TransitionPriority};
///
/// let next = StateId::from_index(1);
/// let mut transition = Transition::immediate(next);
///
/// assert_eq!(transition.priority(), TransitionPriority::Immediate);
/// assert!(transition.is_triggered(None));
/// assert_eq!(transition.target(), next);
/// ```
#[derive(Debug)]
pub struct Transition {
    target: StateId,
    owner: Option<StateId>,
    kind: TransitionKind,
    last_event: Event,
}

impl Transition {
    pub fn new(target: StateId, kind: TransitionKind) -> Self {
        Self {
            target,
            owner: None,
            kind,
            last_event: Event::none(),
        }
    }

    /// Fires while `predicate` returns true.
    pub fn condition<F>(target: StateId, predicate: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        Self::new(target, TransitionKind::Condition(Condition::new(predicate)))
    }

    /// Fires when `source` yields an event of kind `expected`.
    pub fn event(target: StateId, expected: EventKind, source: SharedSource) -> Self {
        Self::new(
            target,
            TransitionKind::Event(EventMatch::new(expected, source)),
        )
    }

    /// Highest-priority transition on an event, optionally also on the
    /// owning state's timeout.
    pub fn priority_event(
        target: StateId,
        expected: EventKind,
        source: SharedSource,
        check_timeout: bool,
    ) -> Self {
        Self::new(
            target,
            TransitionKind::Priority {
                event: Some(EventMatch::new(expected, source)),
                check_timeout,
            },
        )
    }

    /// Highest-priority transition on the owning state's timeout alone.
    pub fn priority_timeout(target: StateId) -> Self {
        Self::new(
            target,
            TransitionKind::Priority {
                event: None,
                check_timeout: true,
            },
        )
    }

    /// Fires when the owning state's timer elapses.
    pub fn state_timeout(target: StateId) -> Self {
        Self::new(target, TransitionKind::StateTimeout)
    }

    /// Always fires.
    pub fn immediate(target: StateId) -> Self {
        Self::new(target, TransitionKind::Immediate)
    }

    /// Evaluate the predicate now. `timer` is the owning state's timer.
    ///
    /// Event kinds consume one event from their source per call. The
    /// captured event is kept for the exit and enter hooks.
    pub fn is_triggered(&mut self, timer: Option<&mut AlarmTimer>) -> bool {
        match &mut self.kind {
            TransitionKind::Condition(condition) => {
                let fired = condition.check();
                if fired {
                    self.last_event = Event::new(EventKind::Condition);
                }
                fired
            }
            TransitionKind::Event(matcher) => match matcher.poll() {
                Some(event) => {
                    self.last_event = event;
                    true
                }
                None => false,
            },
            TransitionKind::Priority {
                event,
                check_timeout,
            } => {
                if let Some(event) = event.as_mut().and_then(EventMatch::poll) {
                    self.last_event = event;
                    return true;
                }
                if *check_timeout && timer.is_some_and(AlarmTimer::elapsed) {
                    self.last_event = Event::local_timeout();
                    return true;
                }
                false
            }
            TransitionKind::StateTimeout => {
                let fired = timer.is_some_and(AlarmTimer::elapsed);
                if fired {
                    self.last_event = Event::local_timeout();
                }
                fired
            }
            TransitionKind::Immediate => true,
        }
    }

    pub fn priority(&self) -> TransitionPriority {
        self.kind.priority()
    }

    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn owner(&self) -> Option<StateId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: StateId) {
        self.owner = Some(owner);
    }

    /// The event captured the last time this transition fired.
    pub fn last_event(&self) -> Event {
        self.last_event
    }

    /// True for kinds that read the owning state's timer.
    pub fn uses_timer(&self) -> bool {
        matches!(
            self.kind,
            TransitionKind::StateTimeout
                | TransitionKind::Priority {
                    check_timeout: true,
                    ..
                }
        )
    }
}
