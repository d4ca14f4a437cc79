//! Builder for constructing machines.

use crate::builder::error::{BuildError, ValidationIssue};
use crate::config::FsmConfig;
use crate::core::{SharedClock, StateId};
use crate::machine::{Fsm, State, Transition};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::warn;

/// Collects states and transitions, then validates them into an [`Fsm`].
///
/// States get their [`StateId`] when registered, in insertion order, and
/// their timers are created on the builder's clock.
///
/// # Example
///
/// ```rust
/// use tickfsm::builder::MachineBuilder;
/// use tickfsm::core::ManualClock;
/// use tickfsm::machine::{State, Transition};
///
/// let clock = ManualClock::new();
/// let mut builder = MachineBuilder::new(clock.shared());
/// let waiting = builder.state(State::new("waiting").with_timeout(1_000));
/// let done = builder.state(State::new("done"));
/// builder.transition(waiting, Transition::state_timeout(done)).unwrap();
///
/// let mut fsm = builder.initial(waiting).build().unwrap();
/// fsm.start();
///
/// clock.set(1_000);
/// fsm.run();
/// assert_eq!(fsm.current_state(), Some(done));
/// ```
pub struct MachineBuilder {
    clock: SharedClock,
    states: Vec<State>,
    initial: Option<StateId>,
    config: FsmConfig,
}

impl MachineBuilder {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            states: Vec::new(),
            initial: None,
            config: FsmConfig::default(),
        }
    }

    /// Register a state and get its id.
    pub fn state(&mut self, mut state: State) -> StateId {
        let id = StateId(self.states.len());
        state.attach(id, &self.clock);
        self.states.push(state);
        id
    }

    /// Add a transition to a registered state.
    pub fn transition(
        &mut self,
        from: StateId,
        transition: Transition,
    ) -> Result<&mut Self, BuildError> {
        let state = self
            .states
            .get_mut(from.0)
            .ok_or(BuildError::UnknownState(from))?;
        state.add_transition(transition);
        Ok(self)
    }

    /// Add several transitions to one state, in order.
    pub fn transitions(
        &mut self,
        from: StateId,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<&mut Self, BuildError> {
        for transition in transitions {
            self.transition(from, transition)?;
        }
        Ok(self)
    }

    /// Set the initial state (required).
    pub fn initial(&mut self, state: StateId) -> &mut Self {
        self.initial = Some(state);
        self
    }

    pub fn config(&mut self, config: FsmConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Check the definition, accumulating every structural issue.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ValidationIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ValidationIssue>>> = Vec::new();

        checks.push(match self.initial {
            None => Validation::fail(ValidationIssue::MissingInitialState),
            Some(id) if id.0 >= self.states.len() => {
                Validation::fail(ValidationIssue::UnknownInitialState(id))
            }
            Some(_) => Validation::success(()),
        });

        for (index, state) in self.states.iter().enumerate() {
            for transition in state.transitions() {
                if transition.target().0 >= self.states.len() {
                    checks.push(Validation::fail(ValidationIssue::UnknownTarget {
                        from: StateId(index),
                        to: transition.target(),
                    }));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate and produce the machine, leaving the builder empty.
    ///
    /// Only structural problems fail the build. Definitions that are merely
    /// useless, such as a timeout transition on a state without a timer,
    /// are logged and left to never trigger.
    pub fn build(&mut self) -> Result<Fsm, BuildError> {
        if let Validation::Failure(issues) = self.validate() {
            return Err(BuildError::Invalid(issues.iter().cloned().collect()));
        }
        let Some(initial) = self.initial.take() else {
            return Err(BuildError::Invalid(vec![ValidationIssue::MissingInitialState]));
        };

        self.warn_degraded();

        let states = std::mem::take(&mut self.states);
        let config = std::mem::take(&mut self.config);
        Ok(Fsm::from_parts(self.clock.clone(), states, initial, &config))
    }

    fn warn_degraded(&self) {
        for state in &self.states {
            if state.has_timer() {
                continue;
            }
            let timed = state
                .transitions()
                .iter()
                .filter(|t| t.uses_timer())
                .count();
            if timed > 0 {
                warn!(
                    state = state.name(),
                    transitions = timed,
                    "timeout transitions on a state without timer will never fire"
                );
            }
        }
    }
}
