//! tickfsm: a cooperative, polling finite state machine engine
//!
//! tickfsm targets single-threaded main loops on small devices. Nothing
//! blocks and nothing is preempted: the application calls [`Fsm::run`] and
//! [`Scheduler::run`] over and over, and each call does at most a bounded
//! amount of work against a monotonic millisecond [`Clock`](core::Clock).
//!
//! # Core Concepts
//!
//! - **Events**: small tagged values with an optional typed payload
//! - **AlarmTimer**: a phase-stable periodic timer that never drifts
//! - **Transitions**: prioritized predicates (priority, condition, event,
//!   timeout, immediate) owned by a state
//! - **Fsm**: fires at most one transition per tick, running exit and
//!   enter hooks with the triggering event
//! - **Actions**: periodic, delayed and bounded work run by a [`Scheduler`]
//!
//! # Example
//!
//! ```rust
//! use tickfsm::builder::MachineBuilder;
//! use tickfsm::core::ManualClock;
//! use tickfsm::machine::{State, Tick, Transition};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let clock = ManualClock::new();
//! let door_open = Rc::new(Cell::new(false));
//! let sensor = Rc::clone(&door_open);
//!
//! let mut builder = MachineBuilder::new(clock.shared());
//! let closed = builder.state(State::new("closed"));
//! let open = builder.state(State::new("open").with_timeout(1_000));
//! builder
//!     .transition(closed, Transition::condition(open, move || sensor.get()))
//!     .unwrap();
//! builder.transition(open, Transition::state_timeout(closed)).unwrap();
//!
//! let mut fsm = builder.initial(closed).build().unwrap();
//! fsm.start();
//! assert_eq!(fsm.run(), Tick::Updated(closed));
//!
//! door_open.set(true);
//! fsm.run();
//! assert_eq!(fsm.current_state(), Some(open));
//!
//! door_open.set(false);
//! clock.set(1_000);
//! fsm.run();
//! assert_eq!(fsm.current_state(), Some(closed));
//! ```

pub mod actions;
pub mod builder;
pub mod config;
pub mod core;
pub mod machine;
pub mod sources;

// Re-export commonly used types
pub use actions::{Action, PeriodicAction, Scheduler, TimedAction};
pub use builder::{BuildError, MachineBuilder};
pub use crate::core::{AlarmTimer, Event, EventKind, StateId};
pub use machine::{Fsm, State, Tick, Transition};
