//! Ordered collection of actions executed from the main loop.

use super::Action;
use std::fmt;
use tracing::trace;

/// Runs every registered action once per [`run`](Self::run), in
/// registration order.
///
/// # Example
///
/// ```rust
/// use tickfsm::actions::{FnAction, PeriodicAction, Scheduler};
/// use tickfsm::core::ManualClock;
///
/// let clock = ManualClock::new();
/// let mut scheduler = Scheduler::new();
/// scheduler
///     .add_action(PeriodicAction::new(clock.shared(), 500, || {}).named("blink"))
///     .add_action(FnAction::new("poll", || {}));
///
/// scheduler.run();
/// assert_eq!(scheduler.len(), 2);
/// assert_eq!(scheduler.action(0).map(|a| a.name()), Some("blink"));
/// ```
#[derive(Default)]
pub struct Scheduler {
    actions: Vec<Box<dyn Action>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action; chainable.
    pub fn add_action<A: Action + 'static>(&mut self, action: A) -> &mut Self {
        self.add_boxed(Box::new(action))
    }

    pub fn add_boxed(&mut self, action: Box<dyn Action>) -> &mut Self {
        self.actions.push(action);
        self
    }

    /// Execute each action once.
    pub fn run(&mut self) {
        for action in &mut self.actions {
            trace!(action = action.name(), "executing action");
            action.execute();
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn action(&self, index: usize) -> Option<&dyn Action> {
        self.actions.get(index).map(|action| action.as_ref())
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut (dyn Action + 'static)> {
        self.actions.get_mut(index).map(|action| action.as_mut())
    }

    pub fn finished_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_finished()).count()
    }

    /// True when every registered action has finished.
    pub fn all_finished(&self) -> bool {
        self.actions.iter().all(|a| a.is_finished())
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.actions.iter().map(|a| a.name()))
            .finish()
    }
}
