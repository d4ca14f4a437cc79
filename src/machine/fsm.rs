//! The FSM driver: tracks the current state and performs at most one
//! transition per tick.

use super::state::State;
use crate::config::FsmConfig;
use crate::core::{Event, SharedClock, StateHistory, StateId, StateTransition};
use chrono::Utc;
use std::fmt;
use tracing::{debug, trace, warn};

/// Outcome of a single [`Fsm::run`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// The machine is not running; nothing was evaluated
    Idle,

    /// No transition fired; the current state's update hook ran
    Updated(StateId),

    /// A transition fired: `from` was exited and `to` entered
    Transitioned {
        from: StateId,
        to: StateId,
        event: Event,
    },
}

/// Cooperative finite state machine.
///
/// Three lifecycle phases: not started (no current state), running, and
/// stopped (paused in its current state). [`start`](Self::start) always
/// resets to the initial state, [`stop`](Self::stop) pauses without
/// running any exit hook, and [`restart`](Self::restart) resumes where it
/// was paused.
///
/// Build one with [`MachineBuilder`](crate::builder::MachineBuilder).
pub struct Fsm {
    clock: SharedClock,
    states: Vec<State>,
    initial: StateId,
    current: Option<StateId>,
    running: bool,
    history: StateHistory,
}

impl Fsm {
    pub(crate) fn from_parts(
        clock: SharedClock,
        states: Vec<State>,
        initial: StateId,
        config: &FsmConfig,
    ) -> Self {
        Self {
            clock,
            states,
            initial,
            current: None,
            running: false,
            history: StateHistory::with_capacity(config.history_capacity),
        }
    }

    /// Enter the initial state and start running.
    ///
    /// Calling this again at any point re-enters the initial state; it is
    /// the universal recovery path.
    pub fn start(&mut self) {
        let Some(initial) = self.states.get_mut(self.initial.0) else {
            warn!(initial = %self.initial, "initial state missing, machine not started");
            return;
        };
        self.current = Some(self.initial);
        initial.enter(&Event::none());
        self.running = true;
        debug!(state = %self.initial, name = initial.name(), "machine started");
    }

    /// Pause in the current state. No exit hook runs.
    pub fn stop(&mut self) {
        self.running = false;
        debug!(state = ?self.current, "machine stopped");
    }

    /// Resume in the state the machine was paused in.
    ///
    /// A machine that was never started stays inert until
    /// [`start`](Self::start).
    pub fn restart(&mut self) {
        self.running = true;
        debug!(state = ?self.current, "machine resumed");
    }

    /// Evaluate one tick.
    ///
    /// If a transition of the current state fires, the current state is
    /// exited and the target entered, both with the captured event.
    /// Otherwise the current state's update hook runs. Never both, and
    /// never more than one transition.
    pub fn run(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        let Some(from) = self.current else {
            return Tick::Idle;
        };
        let Some(state) = self.states.get_mut(from.0) else {
            return Tick::Idle;
        };

        let Some((to, event)) = state
            .check_transitions()
            .map(|transition| (transition.target(), transition.last_event()))
        else {
            state.update();
            trace!(state = %from, "no transition, updated");
            return Tick::Updated(from);
        };

        if to.0 >= self.states.len() {
            warn!(from = %from, to = %to, "transition target is not a state of this machine");
            return Tick::Idle;
        }

        self.states[from.0].exit(&event);
        debug!(
            from = %from,
            to = %to,
            from_name = self.states[from.0].name(),
            to_name = self.states[to.0].name(),
            event = %event,
            "state transition"
        );
        self.current = Some(to);
        self.states[to.0].enter(&event);

        if self.history.capacity() > 0 {
            self.history.record(StateTransition {
                from,
                to,
                event,
                at_millis: self.clock.now_millis(),
                timestamp: Utc::now(),
            });
        }

        Tick::Transitioned { from, to, event }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current state, `None` until the first [`start`](Self::start).
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn current(&self) -> Option<&State> {
        self.current.and_then(|id| self.state(id))
    }

    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    /// Mutable access, e.g. to add transitions after construction.
    ///
    /// Do not call from inside a hook of the same machine; there is only
    /// one execution context.
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.get_mut(id.0)
    }

    /// Look a state up by name.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|state| state.name() == name)
            .map(StateId)
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateId(index), state))
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}

impl fmt::Debug for Fsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("states", &self.states.len())
            .field("initial", &self.initial)
            .field("current", &self.current)
            .field("running", &self.running)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::{EventKind, ManualClock};
    use crate::machine::Transition;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn logged(name: &str, log: &Log) -> State {
        let (enter, exit, update) = (log.clone(), log.clone(), log.clone());
        let (n1, n2, n3) = (name.to_string(), name.to_string(), name.to_string());
        State::new(name)
            .on_enter(move |_, _| enter.borrow_mut().push(format!("enter {n1}")))
            .on_exit(move |_, _| exit.borrow_mut().push(format!("exit {n2}")))
            .on_update(move |_| update.borrow_mut().push(format!("update {n3}")))
    }

    #[test]
    fn run_before_start_is_idle() {
        let clock = ManualClock::new();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("a"));
        let mut fsm = builder.initial(a).build().unwrap();

        assert_eq!(fsm.run(), Tick::Idle);
        assert_eq!(fsm.current_state(), None);
        assert!(!fsm.is_running());
    }

    #[test]
    fn start_enters_initial_state_with_none_event() {
        let clock = ManualClock::new();
        let seen = Rc::new(Cell::new(EventKind::Custom(0)));
        let sink = Rc::clone(&seen);
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("a").on_enter(move |event, _| sink.set(event.kind())));
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();

        assert!(fsm.is_running());
        assert_eq!(fsm.current_state(), Some(a));
        assert_eq!(seen.get(), EventKind::None);
    }

    #[test]
    fn transition_runs_exit_then_enter_without_update() {
        let clock = ManualClock::new();
        let log: Log = Rc::default();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(logged("a", &log));
        let b = builder.state(logged("b", &log));
        builder.transition(a, Transition::immediate(b)).unwrap();
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();
        let tick = fsm.run();

        assert!(matches!(tick, Tick::Transitioned { from, to, .. } if from == a && to == b));
        assert_eq!(*log.borrow(), vec!["enter a", "exit a", "enter b"]);
    }

    #[test]
    fn at_most_one_transition_per_tick() {
        let clock = ManualClock::new();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("a"));
        let b = builder.state(State::new("b"));
        let c = builder.state(State::new("c"));
        builder.transition(a, Transition::immediate(b)).unwrap();
        builder.transition(b, Transition::immediate(c)).unwrap();
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();
        fsm.run();
        assert_eq!(fsm.current_state(), Some(b));
        fsm.run();
        assert_eq!(fsm.current_state(), Some(c));
    }

    #[test]
    fn update_runs_when_nothing_fires() {
        let clock = ManualClock::new();
        let log: Log = Rc::default();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(logged("a", &log));
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();
        assert_eq!(fsm.run(), Tick::Updated(a));
        assert_eq!(*log.borrow(), vec!["enter a", "update a"]);
    }

    #[test]
    fn stop_pauses_without_exit_and_restart_resumes() {
        let clock = ManualClock::new();
        let log: Log = Rc::default();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(logged("a", &log));
        let b = builder.state(logged("b", &log));
        builder.transition(a, Transition::immediate(b)).unwrap();
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();
        fsm.stop();
        assert_eq!(fsm.run(), Tick::Idle);
        assert_eq!(fsm.current_state(), Some(a));

        fsm.restart();
        fsm.run();
        assert_eq!(fsm.current_state(), Some(b));
        assert_eq!(*log.borrow(), vec!["enter a", "exit a", "enter b"]);
    }

    #[test]
    fn restart_without_start_stays_inert() {
        let clock = ManualClock::new();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("a"));
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.restart();

        assert_eq!(fsm.run(), Tick::Idle);
        assert_eq!(fsm.current_state(), None);
    }

    #[test]
    fn start_again_resets_to_initial_state() {
        let clock = ManualClock::new();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("a"));
        let b = builder.state(State::new("b"));
        builder.transition(a, Transition::immediate(b)).unwrap();
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();
        fsm.run();
        fsm.stop();
        fsm.start();

        assert_eq!(fsm.current_state(), Some(a));
        assert!(fsm.is_running());
    }

    #[test]
    fn self_transition_exits_and_reenters() {
        let clock = ManualClock::new();
        let log: Log = Rc::default();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(logged("a", &log).with_timeout(100));
        builder.transition(a, Transition::state_timeout(a)).unwrap();
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();
        clock.set(100);
        fsm.run();

        assert_eq!(*log.borrow(), vec!["enter a", "exit a", "enter a"]);
        assert_eq!(
            fsm.current().and_then(State::timer).map(|t| t.next_trigger()),
            Some(200)
        );
    }

    #[test]
    fn transitions_are_recorded_in_history() {
        let clock = ManualClock::new();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("a"));
        let b = builder.state(State::new("b"));
        builder.transition(a, Transition::immediate(b)).unwrap();
        builder.transition(b, Transition::immediate(a)).unwrap();
        let mut fsm = builder.initial(a).build().unwrap();

        fsm.start();
        clock.set(5);
        fsm.run();
        clock.set(15);
        fsm.run();

        assert_eq!(fsm.history().get_path(), vec![a, b, a]);
        assert_eq!(
            fsm.history().duration(),
            Some(std::time::Duration::from_millis(10))
        );
    }

    #[test]
    fn find_looks_up_states_by_name() {
        let clock = ManualClock::new();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("idle"));
        let b = builder.state(State::new("busy"));
        let fsm = builder.initial(a).build().unwrap();

        assert_eq!(fsm.find("busy"), Some(b));
        assert_eq!(fsm.find("missing"), None);
        assert_eq!(fsm.states().count(), 2);
    }

    #[test]
    fn dangling_target_added_after_build_is_ignored() {
        let clock = ManualClock::new();
        let mut builder = MachineBuilder::new(clock.shared());
        let a = builder.state(State::new("a"));
        let mut fsm = builder.initial(a).build().unwrap();
        fsm.state_mut(a)
            .unwrap()
            .add_transition(Transition::immediate(StateId(9)));

        fsm.start();

        assert_eq!(fsm.run(), Tick::Idle);
        assert_eq!(fsm.current_state(), Some(a));
    }
}
