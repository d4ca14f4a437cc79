//! The state machine engine.
//!
//! This module contains:
//! - [`Transition`]s, a closed set of prioritized predicate kinds
//! - [`State`]s owning their transitions, timer and hooks
//! - The [`Fsm`] driver advancing at most one transition per tick

mod condition;
mod fsm;
mod state;
mod transition;

pub use condition::Condition;
pub use fsm::{Fsm, Tick};
pub use state::{State, StateContext, TransitionHook, UpdateHook};
pub use transition::{EventMatch, Transition, TransitionKind, TransitionPriority};
