//! Builder API for machine construction.
//!
//! States are registered first and identified by the [`StateId`] the
//! builder hands back; transitions are then wired between those ids.

pub mod error;
pub mod machine;

pub use error::{BuildError, ValidationIssue};
pub use machine::MachineBuilder;

use crate::core::StateId;
use crate::machine::Transition;

/// Wire state-timeout transitions around a ring of states.
///
/// Each state moves to the next one when its timer elapses, and the last
/// one moves back to the first. The states need a timeout for the ring to
/// turn.
///
/// # Example
///
/// ```
/// use tickfsm::builder::{timed_cycle, MachineBuilder};
/// use tickfsm::core::ManualClock;
/// use tickfsm::machine::State;
///
/// let clock = ManualClock::new();
/// let mut builder = MachineBuilder::new(clock.shared());
/// let red = builder.state(State::new("red").with_timeout(3_000));
/// let green = builder.state(State::new("green").with_timeout(2_500));
/// let yellow = builder.state(State::new("yellow").with_timeout(500));
/// timed_cycle(&mut builder, &[red, green, yellow]).unwrap();
///
/// let mut fsm = builder.initial(red).build().unwrap();
/// fsm.start();
/// clock.set(3_000);
/// fsm.run();
/// assert_eq!(fsm.current_state(), Some(green));
/// ```
pub fn timed_cycle(builder: &mut MachineBuilder, ring: &[StateId]) -> Result<(), BuildError> {
    for (index, &from) in ring.iter().enumerate() {
        let to = ring[(index + 1) % ring.len()];
        builder.transition(from, Transition::state_timeout(to))?;
    }
    Ok(())
}
