//! Leaf building blocks shared by the machine and the scheduler:
//! - Millisecond clocks
//! - Tagged events with typed payloads
//! - The phase-stable alarm timer
//! - State identifiers and the bounded transition history

mod clock;
mod event;
mod history;
mod state;
mod timer;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use event::{Event, EventKind, Value, ValueType};
pub use history::{StateHistory, StateTransition};
pub use state::StateId;
pub use timer::AlarmTimer;
