//! Schedulable units of work.
//!
//! An [`Action`] is executed once per [`Scheduler::run`]. Timed variants
//! decide for themselves, from their own [`AlarmTimer`](crate::core::AlarmTimer),
//! whether a given call actually does any work.

mod periodic;
mod scheduler;
mod timed;

pub use periodic::PeriodicAction;
pub use scheduler::Scheduler;
pub use timed::TimedAction;

use std::fmt;

/// A unit of work driven from the main loop.
pub trait Action {
    /// Do the work, or decide that now is not the time.
    fn execute(&mut self);

    /// True once the action will never do anything again.
    fn is_finished(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "action"
    }
}

/// Closure run on every execution.
pub struct FnAction {
    name: String,
    task: Box<dyn FnMut()>,
}

impl FnAction {
    pub fn new<F>(name: impl Into<String>, task: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            name: name.into(),
            task: Box::new(task),
        }
    }
}

impl Action for FnAction {
    fn execute(&mut self) {
        (self.task)();
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn fn_action_runs_every_time() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let mut action = FnAction::new("count", move || counter.set(counter.get() + 1));

        action.execute();
        action.execute();

        assert_eq!(count.get(), 2);
        assert_eq!(action.name(), "count");
        assert!(!action.is_finished());
    }
}
