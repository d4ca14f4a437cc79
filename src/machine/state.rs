//! States: an ordered set of outgoing transitions, an optional timer and
//! lifecycle hooks.

use super::transition::{Transition, TransitionPriority};
use crate::core::{AlarmTimer, Event, SharedClock, StateId};
use std::fmt;

/// Hook run on entry or exit, with the event that caused the move.
pub type TransitionHook = Box<dyn FnMut(&Event, &mut StateContext<'_>)>;

/// Hook run on ticks where the state stays put.
pub type UpdateHook = Box<dyn FnMut(&mut StateContext<'_>)>;

/// View of a state handed to its hooks.
pub struct StateContext<'a> {
    id: Option<StateId>,
    name: &'a str,
    timer: Option<&'a mut AlarmTimer>,
}

impl StateContext<'_> {
    pub fn id(&self) -> Option<StateId> {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// The state's timer, if it was configured with a timeout.
    pub fn timer(&mut self) -> Option<&mut AlarmTimer> {
        self.timer.as_deref_mut()
    }

    pub fn restart_timer(&mut self) {
        if let Some(timer) = self.timer() {
            timer.start();
        }
    }

    pub fn stop_timer(&mut self) {
        if let Some(timer) = self.timer() {
            timer.stop();
        }
    }
}

/// A state of the machine.
///
/// Transitions are evaluated every tick in ascending priority class and,
/// within a class, in the order they were added. The first one whose
/// predicate holds wins; the rest are not evaluated that tick.
///
/// Entering a state starts its timer before the enter hook runs, and
/// exiting stops it before the exit hook runs. Hooks that want different
/// timer behavior can restart, stop or retune it through the
/// [`StateContext`].
///
/// # Example
///
/// ```rust
/// use tickfsm::machine::State;
///
/// let blinking = State::new("blinking")
///     .with_timeout(500)
///     .on_enter(|event, _ctx| println!("entered on {event}"))
///     .on_update(|_ctx| { /* toggle a LED */ });
///
/// assert_eq!(blinking.name(), "blinking");
/// assert_eq!(blinking.timeout(), 500);
/// ```
pub struct State {
    name: String,
    id: Option<StateId>,
    timeout: u64,
    timer: Option<AlarmTimer>,
    transitions: Vec<Transition>,
    triggered: Option<usize>,
    enter_hook: Option<TransitionHook>,
    exit_hook: Option<TransitionHook>,
    update_hook: Option<UpdateHook>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            timeout: 0,
            timer: None,
            transitions: Vec::new(),
            triggered: None,
            enter_hook: None,
            exit_hook: None,
            update_hook: None,
        }
    }

    /// Give the state a timer of `millis` once it joins a machine.
    /// Zero means no timer.
    pub fn with_timeout(mut self, millis: u64) -> Self {
        self.timeout = millis;
        self
    }

    /// Give the state an explicit timer, bypassing the machine's clock.
    pub fn with_timer(mut self, timer: AlarmTimer) -> Self {
        self.timeout = timer.duration();
        self.timer = Some(timer);
        self
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Event, &mut StateContext<'_>) + 'static,
    {
        self.enter_hook = Some(Box::new(hook));
        self
    }

    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Event, &mut StateContext<'_>) + 'static,
    {
        self.exit_hook = Some(Box::new(hook));
        self
    }

    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.update_hook = Some(Box::new(hook));
        self
    }

    /// Bind the state to its slot in a machine. Creates the timer from
    /// the configured timeout if none was supplied.
    pub(crate) fn attach(&mut self, id: StateId, clock: &SharedClock) {
        self.id = Some(id);
        if self.timer.is_none() && self.timeout > 0 {
            self.timer = Some(AlarmTimer::new(clock.clone(), self.timeout));
        }
        for transition in &mut self.transitions {
            transition.set_owner(id);
        }
    }

    /// Append a transition; it becomes owned by this state.
    pub fn add_transition(&mut self, mut transition: Transition) -> &mut Self {
        if let Some(id) = self.id {
            transition.set_owner(id);
        }
        self.transitions.push(transition);
        self
    }

    /// Builder-style [`add_transition`](Self::add_transition).
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.add_transition(transition);
        self
    }

    /// Find the transition that fires this tick, if any.
    ///
    /// The result is cached and available through
    /// [`triggered_transition`](Self::triggered_transition) until the
    /// next check.
    pub fn check_transitions(&mut self) -> Option<&Transition> {
        self.triggered = None;
        'classes: for priority in TransitionPriority::ALL {
            for (index, transition) in self.transitions.iter_mut().enumerate() {
                if transition.priority() == priority
                    && transition.is_triggered(self.timer.as_mut())
                {
                    self.triggered = Some(index);
                    break 'classes;
                }
            }
        }
        self.triggered_transition()
    }

    pub fn triggered_transition(&self) -> Option<&Transition> {
        self.triggered.and_then(|index| self.transitions.get(index))
    }

    /// Start the timer, then run the enter hook.
    pub fn enter(&mut self, event: &Event) {
        self.start_timer();
        if let Some(hook) = self.enter_hook.as_mut() {
            let mut ctx = StateContext {
                id: self.id,
                name: &self.name,
                timer: self.timer.as_mut(),
            };
            hook(event, &mut ctx);
        }
    }

    /// Stop the timer, then run the exit hook.
    pub fn exit(&mut self, event: &Event) {
        self.stop_timer();
        if let Some(hook) = self.exit_hook.as_mut() {
            let mut ctx = StateContext {
                id: self.id,
                name: &self.name,
                timer: self.timer.as_mut(),
            };
            hook(event, &mut ctx);
        }
    }

    /// Run the update hook.
    pub fn update(&mut self) {
        if let Some(hook) = self.update_hook.as_mut() {
            let mut ctx = StateContext {
                id: self.id,
                name: &self.name,
                timer: self.timer.as_mut(),
            };
            hook(&mut ctx);
        }
    }

    pub fn is_timer_elapsed(&mut self) -> bool {
        self.timer.as_mut().is_some_and(AlarmTimer::elapsed)
    }

    pub fn start_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.start();
        }
    }

    pub fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
    }

    pub fn timer(&self) -> Option<&AlarmTimer> {
        self.timer.as_ref()
    }

    pub fn timer_mut(&mut self) -> Option<&mut AlarmTimer> {
        self.timer.as_mut()
    }

    pub fn has_timer(&self) -> bool {
        self.timer.is_some() || self.timeout > 0
    }

    /// Configured timeout in milliseconds, zero when the state has none.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Id in the owning machine, `None` until the state joins one.
    pub fn id(&self) -> Option<StateId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn total_transitions(&self) -> usize {
        self.transitions.len()
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("timer", &self.timer)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventKind, ManualClock};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn attached(state: State, clock: &ManualClock) -> State {
        let mut state = state;
        state.attach(StateId(0), &clock.shared());
        state
    }

    #[test]
    fn lowest_priority_class_wins() {
        let clock = ManualClock::new();
        let mut state = attached(
            State::new("s")
                .with_transition(Transition::immediate(StateId(4)))
                .with_transition(Transition::condition(StateId(1), || true)),
            &clock,
        );

        let fired = state.check_transitions().map(Transition::target);

        assert_eq!(fired, Some(StateId(1)));
    }

    struct Pressed;

    impl crate::sources::EventSource for Pressed {
        fn poll_event(&mut self) -> Event {
            Event::button_pressed()
        }
    }

    #[test]
    fn every_class_outranks_the_next() {
        let clock = ManualClock::new();
        let source = crate::sources::shared(Pressed);
        let mut state = attached(
            State::new("s")
                .with_timeout(10)
                .with_transition(Transition::immediate(StateId(4)))
                .with_transition(Transition::state_timeout(StateId(3)))
                .with_transition(Transition::event(
                    StateId(2),
                    EventKind::ButtonPressed,
                    Rc::clone(&source),
                ))
                .with_transition(Transition::condition(StateId(1), || true))
                .with_transition(Transition::priority_timeout(StateId(0))),
            &clock,
        );
        state.enter(&Event::none());
        clock.set(10);

        assert_eq!(
            state.check_transitions().map(Transition::target),
            Some(StateId(0))
        );
        // The timer was consumed; the condition is next in line
        assert_eq!(
            state.check_transitions().map(Transition::target),
            Some(StateId(1))
        );
    }

    #[test]
    fn event_outranks_elapsed_timeout() {
        let clock = ManualClock::new();
        let mut state = attached(
            State::new("s")
                .with_timeout(10)
                .with_transition(Transition::state_timeout(StateId(3)))
                .with_transition(Transition::event(
                    StateId(2),
                    EventKind::ButtonPressed,
                    crate::sources::shared(Pressed),
                )),
            &clock,
        );
        state.enter(&Event::none());
        clock.set(10);

        assert_eq!(
            state.check_transitions().map(Transition::target),
            Some(StateId(2))
        );
        assert_eq!(
            state.check_transitions().map(Transition::target),
            Some(StateId(2))
        );
    }

    #[test]
    fn ties_resolve_in_insertion_order() {
        let clock = ManualClock::new();
        let mut state = attached(
            State::new("s")
                .with_transition(Transition::condition(StateId(1), || true))
                .with_transition(Transition::condition(StateId(2), || true)),
            &clock,
        );

        assert_eq!(
            state.check_transitions().map(Transition::target),
            Some(StateId(1))
        );
    }

    #[test]
    fn later_predicates_are_skipped_after_a_hit() {
        let clock = ManualClock::new();
        let evaluated = Rc::new(Cell::new(false));
        let flag = Rc::clone(&evaluated);
        let mut state = attached(
            State::new("s")
                .with_transition(Transition::condition(StateId(1), || true))
                .with_transition(Transition::condition(StateId(2), move || {
                    flag.set(true);
                    true
                })),
            &clock,
        );

        state.check_transitions();

        assert!(!evaluated.get());
    }

    #[test]
    fn miss_clears_cached_transition() {
        let clock = ManualClock::new();
        let open = Rc::new(Cell::new(true));
        let reader = Rc::clone(&open);
        let mut state = attached(
            State::new("s").with_transition(Transition::condition(StateId(1), move || reader.get())),
            &clock,
        );

        assert!(state.check_transitions().is_some());
        assert!(state.triggered_transition().is_some());

        open.set(false);
        assert!(state.check_transitions().is_none());
        assert!(state.triggered_transition().is_none());
    }

    #[test]
    fn no_transitions_never_trigger() {
        let clock = ManualClock::new();
        let mut state = attached(State::new("empty"), &clock);

        assert!(state.check_transitions().is_none());
        assert_eq!(state.total_transitions(), 0);
    }

    #[test]
    fn attach_creates_timer_and_sets_owners() {
        let clock = ManualClock::new();
        let state = attached(
            State::new("timed")
                .with_timeout(250)
                .with_transition(Transition::state_timeout(StateId(1))),
            &clock,
        );

        assert_eq!(state.timer().map(AlarmTimer::duration), Some(250));
        assert_eq!(state.transitions()[0].owner(), Some(StateId(0)));
        assert_eq!(state.id(), Some(StateId(0)));
    }

    #[test]
    fn enter_starts_timer_and_exit_stops_it() {
        let clock = ManualClock::new();
        let mut state = attached(State::new("timed").with_timeout(100), &clock);

        state.enter(&Event::none());
        assert!(state.timer().is_some_and(AlarmTimer::is_running));

        clock.set(100);
        assert!(state.is_timer_elapsed());

        state.exit(&Event::none());
        assert!(!state.timer().is_some_and(AlarmTimer::is_running));
    }

    #[test]
    fn hooks_receive_event_and_context() {
        let clock = ManualClock::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (entered, exited, updated) = (seen.clone(), seen.clone(), seen.clone());
        let mut state = attached(
            State::new("door")
                .on_enter(move |event, ctx| {
                    assert_eq!(ctx.id(), Some(StateId(0)));
                    entered
                        .borrow_mut()
                        .push(format!("enter {} {}", ctx.name(), event));
                })
                .on_exit(move |event, _| exited.borrow_mut().push(format!("exit {event}")))
                .on_update(move |_| updated.borrow_mut().push("update".to_string())),
            &clock,
        );

        state.enter(&Event::button_pressed());
        state.update();
        state.exit(&Event::new(EventKind::LocalTimeout));

        assert_eq!(
            *seen.borrow(),
            vec!["enter door ButtonPressed", "update", "exit LocalTimeout"]
        );
    }

    #[test]
    fn enter_hook_can_take_over_timer() {
        let clock = ManualClock::new();
        let mut state = attached(
            State::new("manual").with_timeout(100).on_enter(|_, ctx| {
                if let Some(timer) = ctx.timer() {
                    timer.set_duration(1_000);
                }
            }),
            &clock,
        );

        state.enter(&Event::none());

        assert_eq!(state.timer().map(AlarmTimer::next_trigger), Some(1_000));
    }

    #[test]
    fn state_without_timer_never_times_out() {
        let clock = ManualClock::new();
        let mut state = attached(State::new("plain"), &clock);
        state.enter(&Event::none());
        clock.set(10_000);

        assert!(!state.is_timer_elapsed());
        assert!(!state.has_timer());
    }
}
