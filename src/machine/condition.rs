//! Boolean predicates for condition transitions.

use std::fmt;

/// Zero-argument predicate re-evaluated on every check.
///
/// Conditions usually read some piece of application state (a pin level,
/// a counter, a flag shared through `Rc<Cell<_>>`), so they are `FnMut`
/// and never memoized.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tickfsm::machine::Condition;
///
/// let door_open = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&door_open);
/// let mut condition = Condition::new(move || flag.get());
///
/// assert!(!condition.check());
/// door_open.set(true);
/// assert!(condition.check());
/// ```
pub struct Condition {
    predicate: Box<dyn FnMut() -> bool>,
}

impl Condition {
    pub fn new<F>(predicate: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        Condition {
            predicate: Box::new(predicate),
        }
    }

    /// Condition that always holds.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Condition that never holds.
    pub fn never() -> Self {
        Self::new(|| false)
    }

    pub fn check(&mut self) -> bool {
        (self.predicate)()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}
