//! Push-button sources, raw and debounced.

use super::{DigitalInput, EventSource, SharedSource};
use crate::config::FsmConfig;
use crate::core::{Event, EventKind, SharedClock, StateId};
use crate::machine::{Fsm, State, Transition};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Debounce time used by [`DebouncedButtonSource::new`], in milliseconds.
pub const DEFAULT_DEBOUNCE_MILLIS: u64 = 60;

/// Edge detector on a pull-up button pin.
///
/// The line idles high. A falling edge produces `ButtonPressed`, a rising
/// edge `ButtonReleased`, both carrying the pin number as a byte. No
/// debouncing: every bounce is an edge.
pub struct RawButtonSource<P> {
    pin: u8,
    input: P,
    last_high: bool,
}

impl<P: DigitalInput> RawButtonSource<P> {
    pub fn new(pin: u8, input: P) -> Self {
        Self {
            pin,
            input,
            last_high: true,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl<P: DigitalInput> EventSource for RawButtonSource<P> {
    fn poll_event(&mut self) -> Event {
        let high = self.input.is_high();
        if high == self.last_high {
            return Event::none();
        }
        self.last_high = high;
        if high {
            Event::button_released().with_byte(self.pin)
        } else {
            Event::button_pressed().with_byte(self.pin)
        }
    }
}

impl<P> fmt::Debug for RawButtonSource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawButtonSource")
            .field("pin", &self.pin)
            .field("last_high", &self.last_high)
            .finish()
    }
}

const WAIT_PRESS: StateId = StateId(0);
const DEBOUNCING: StateId = StateId(1);
const PRESSED: StateId = StateId(2);

/// Button source that only reports presses held for the debounce time.
///
/// Internally a three-state machine (waiting, debouncing, pressed) runs
/// one tick per poll over a [`RawButtonSource`]. A release seen while
/// debouncing drops back to waiting, so a bouncing contact restarts the
/// debounce window instead of being reported.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{EventKind, ManualClock};
/// use tickfsm::sources::{DebouncedButtonSource, EventSource};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let clock = ManualClock::new();
/// let level = Rc::new(Cell::new(true));
/// let line = Rc::clone(&level);
/// let mut button = DebouncedButtonSource::new(clock.shared(), 4, move || line.get());
///
/// level.set(false);
/// assert!(button.poll_event().is_none()); // debouncing
///
/// clock.set(60);
/// let event = button.poll_event();
/// assert_eq!(event.kind(), EventKind::ButtonPressed);
/// assert_eq!(event.byte_value(), 4);
/// ```
pub struct DebouncedButtonSource {
    pin: u8,
    debounce: u64,
    fsm: Fsm,
    pressed: bool,
}

impl DebouncedButtonSource {
    pub fn new<P>(clock: SharedClock, pin: u8, input: P) -> Self
    where
        P: DigitalInput + 'static,
    {
        Self::with_debounce(clock, pin, input, DEFAULT_DEBOUNCE_MILLIS)
    }

    pub fn with_debounce<P>(clock: SharedClock, pin: u8, input: P, debounce: u64) -> Self
    where
        P: DigitalInput + 'static,
    {
        let raw: SharedSource = Rc::new(RefCell::new(RawButtonSource::new(pin, input)));

        let mut states = vec![
            State::new("wait_press").with_transition(Transition::event(
                DEBOUNCING,
                EventKind::ButtonPressed,
                Rc::clone(&raw),
            )),
            State::new("debouncing")
                .with_timeout(debounce)
                .with_transition(Transition::event(
                    WAIT_PRESS,
                    EventKind::ButtonReleased,
                    Rc::clone(&raw),
                ))
                .with_transition(Transition::state_timeout(PRESSED)),
            State::new("pressed").with_transition(Transition::event(
                WAIT_PRESS,
                EventKind::ButtonReleased,
                raw,
            )),
        ];
        for (index, state) in states.iter_mut().enumerate() {
            state.attach(StateId(index), &clock);
        }

        let config = FsmConfig {
            history_capacity: 0,
        };
        let mut fsm = Fsm::from_parts(clock, states, WAIT_PRESS, &config);
        fsm.start();

        Self {
            pin,
            debounce,
            fsm,
            pressed: false,
        }
    }

    /// Debounced level as of the last poll.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn debounce(&self) -> u64 {
        self.debounce
    }
}

impl EventSource for DebouncedButtonSource {
    fn poll_event(&mut self) -> Event {
        self.fsm.run();

        let pressed = self.fsm.current_state() == Some(PRESSED);
        if pressed == self.pressed {
            return Event::none();
        }
        self.pressed = pressed;
        if pressed {
            Event::button_pressed().with_byte(self.pin)
        } else {
            Event::button_released().with_byte(self.pin)
        }
    }
}

impl fmt::Debug for DebouncedButtonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedButtonSource")
            .field("pin", &self.pin)
            .field("debounce", &self.debounce)
            .field("pressed", &self.pressed)
            .field("state", &self.fsm.current_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use std::cell::Cell;

    fn line() -> (Rc<Cell<bool>>, impl FnMut() -> bool + 'static) {
        let level = Rc::new(Cell::new(true));
        let reader = Rc::clone(&level);
        (level, move || reader.get())
    }

    #[test]
    fn raw_source_reports_edges_only() {
        let (level, input) = line();
        let mut button = RawButtonSource::new(7, input);

        assert!(button.poll_event().is_none());

        level.set(false);
        let pressed = button.poll_event();
        assert_eq!(pressed.kind(), EventKind::ButtonPressed);
        assert_eq!(pressed.byte_value(), 7);
        assert!(button.poll_event().is_none());

        level.set(true);
        assert_eq!(button.poll_event().kind(), EventKind::ButtonReleased);
    }

    #[test]
    fn press_is_reported_after_debounce_time() {
        let clock = ManualClock::new();
        let (level, input) = line();
        let mut button = DebouncedButtonSource::new(clock.shared(), 2, input);

        clock.set(10);
        level.set(false);
        assert!(button.poll_event().is_none());

        clock.set(69);
        assert!(button.poll_event().is_none());
        assert!(!button.is_pressed());

        clock.set(70);
        assert_eq!(button.poll_event().kind(), EventKind::ButtonPressed);
        assert!(button.is_pressed());
        assert!(button.poll_event().is_none());
    }

    #[test]
    fn release_is_reported_once() {
        let clock = ManualClock::new();
        let (level, input) = line();
        let mut button = DebouncedButtonSource::with_debounce(clock.shared(), 2, input, 20);

        level.set(false);
        button.poll_event();
        clock.set(20);
        assert_eq!(button.poll_event().kind(), EventKind::ButtonPressed);

        level.set(true);
        let released = button.poll_event();
        assert_eq!(released.kind(), EventKind::ButtonReleased);
        assert_eq!(released.byte_value(), 2);
        assert!(button.poll_event().is_none());
    }

    #[test]
    fn bounce_restarts_debounce_window() {
        let clock = ManualClock::new();
        let (level, input) = line();
        let mut button = DebouncedButtonSource::new(clock.shared(), 1, input);

        clock.set(10);
        level.set(false);
        button.poll_event();

        clock.set(30);
        level.set(true);
        assert!(button.poll_event().is_none());

        clock.set(40);
        level.set(false);
        button.poll_event();

        clock.set(99);
        assert!(button.poll_event().is_none());

        clock.set(100);
        assert_eq!(button.poll_event().kind(), EventKind::ButtonPressed);
    }

    #[test]
    fn default_debounce_is_sixty_millis() {
        let clock = ManualClock::new();
        let (_, input) = line();
        let button = DebouncedButtonSource::new(clock.shared(), 0, input);

        assert_eq!(button.debounce(), DEFAULT_DEBOUNCE_MILLIS);
        assert_eq!(button.pin(), 0);
    }
}
