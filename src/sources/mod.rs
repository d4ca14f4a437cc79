//! Event sources and the platform traits they read from.
//!
//! An [`EventSource`] is polled once per check by every event transition
//! bound to it and answers with at most one event, or [`Event::none`].
//! Sources are shared through [`SharedSource`] so one debounced button can
//! feed transitions in several states.

mod button;
mod serial;

pub use button::{DebouncedButtonSource, RawButtonSource, DEFAULT_DEBOUNCE_MILLIS};
pub use serial::{SerialButtonSource, SerialLockoutSource, SerialSource};

use crate::core::{AlarmTimer, Event};
use std::cell::RefCell;
use std::rc::Rc;

/// Producer of events, polled from the main loop.
pub trait EventSource {
    /// Pull the next event. The default source never produces anything.
    fn poll_event(&mut self) -> Event {
        Event::none()
    }

    /// `local_timeout` if `timer` has elapsed, `none` otherwise.
    fn timeout_event(&mut self, timer: Option<&mut AlarmTimer>) -> Event {
        if timer.is_some_and(AlarmTimer::elapsed) {
            Event::local_timeout()
        } else {
            Event::none()
        }
    }
}

/// Handle to a source referenced by several transitions.
pub type SharedSource = Rc<RefCell<dyn EventSource>>;

/// Wrap a source so it can be handed to multiple transitions.
pub fn shared<S: EventSource + 'static>(source: S) -> SharedSource {
    Rc::new(RefCell::new(source))
}

/// Source that never produces an event.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSource;

impl EventSource for SilentSource {}

/// Digital input pin. `true` means the line reads high.
pub trait DigitalInput {
    fn is_high(&mut self) -> bool;
}

impl<F: FnMut() -> bool> DigitalInput for F {
    fn is_high(&mut self) -> bool {
        self()
    }
}

/// Byte-oriented serial channel.
pub trait SerialPort {
    /// Number of bytes ready to be read.
    fn available(&self) -> usize;

    /// Read one byte, `None` when nothing is buffered.
    fn read(&mut self) -> Option<u8>;

    fn write(&mut self, byte: u8);
}

impl<P: SerialPort + ?Sized> SerialPort for Rc<RefCell<P>> {
    fn available(&self) -> usize {
        self.borrow().available()
    }

    fn read(&mut self) -> Option<u8> {
        self.borrow_mut().read()
    }

    fn write(&mut self, byte: u8) {
        self.borrow_mut().write(byte)
    }
}

/// In-memory serial port: bytes pushed to `rx` are read back, written
/// bytes accumulate in `tx`.
#[derive(Clone, Debug, Default)]
pub struct LoopbackSerial {
    pub rx: std::collections::VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl LoopbackSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if they had arrived on the wire.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }
}

impl SerialPort for LoopbackSerial {
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, byte: u8) {
        self.tx.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventKind, ManualClock};

    #[test]
    fn default_source_is_silent() {
        let mut source = SilentSource;
        assert!(source.poll_event().is_none());
    }

    #[test]
    fn timeout_event_reports_elapsed_timer() {
        let clock = ManualClock::new();
        let mut timer = AlarmTimer::new(clock.shared(), 20);
        timer.start();
        let mut source = SilentSource;

        assert!(source.timeout_event(Some(&mut timer)).is_none());

        clock.set(20);
        assert_eq!(
            source.timeout_event(Some(&mut timer)).kind(),
            EventKind::LocalTimeout
        );
        assert!(source.timeout_event(None).is_none());
    }

    #[test]
    fn closures_act_as_digital_inputs() {
        let mut level = || false;
        assert!(!level.is_high());
    }

    #[test]
    fn loopback_serial_reads_fed_bytes_in_order() {
        let mut port = LoopbackSerial::new();
        port.feed(b"ab");

        assert_eq!(port.available(), 2);
        assert_eq!(port.read(), Some(b'a'));
        assert_eq!(port.read(), Some(b'b'));
        assert_eq!(port.read(), None);

        port.write(b'z');
        assert_eq!(port.tx, vec![b'z']);
    }
}
