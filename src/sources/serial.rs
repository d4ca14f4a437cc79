//! Sources reading single bytes from a serial port.

use super::{EventSource, SerialPort};
use crate::core::{AlarmTimer, Event, SharedClock};
use std::fmt;

/// Emits `SerialReceived` carrying the byte as an int.
///
/// Reads at most one byte per poll. With an expected byte set, every other
/// byte is consumed and dropped.
pub struct SerialSource<P> {
    port: P,
    expected: Option<u8>,
}

impl<P: SerialPort> SerialSource<P> {
    /// Accept any byte.
    pub fn new(port: P) -> Self {
        Self {
            port,
            expected: None,
        }
    }

    /// Accept only `byte`.
    pub fn expecting(port: P, byte: u8) -> Self {
        Self {
            port,
            expected: Some(byte),
        }
    }

    pub fn expected(&self) -> Option<u8> {
        self.expected
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    fn next_byte(&mut self) -> Option<u8> {
        if self.port.available() == 0 {
            return None;
        }
        let byte = self.port.read()?;
        match self.expected {
            Some(expected) if expected != byte => None,
            _ => Some(byte),
        }
    }
}

impl<P: SerialPort> EventSource for SerialSource<P> {
    fn poll_event(&mut self) -> Event {
        match self.next_byte() {
            Some(byte) => Event::serial_received().with_int(i32::from(byte)),
            None => Event::none(),
        }
    }
}

impl<P> fmt::Debug for SerialSource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialSource")
            .field("expected", &self.expected)
            .finish()
    }
}

/// Simulated button driven over serial: one byte means pressed, another
/// released. Events carry the received byte.
pub struct SerialButtonSource<P> {
    serial: SerialSource<P>,
    pressed: u8,
    released: u8,
}

impl<P: SerialPort> SerialButtonSource<P> {
    pub fn new(port: P, pressed: u8, released: u8) -> Self {
        Self {
            serial: SerialSource::new(port),
            pressed,
            released,
        }
    }
}

impl<P: SerialPort> EventSource for SerialButtonSource<P> {
    fn poll_event(&mut self) -> Event {
        match self.serial.next_byte() {
            Some(byte) if byte == self.pressed => Event::button_pressed().with_byte(byte),
            Some(byte) if byte == self.released => Event::button_released().with_byte(byte),
            _ => Event::none(),
        }
    }
}

impl<P> fmt::Debug for SerialButtonSource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialButtonSource")
            .field("pressed", &self.pressed)
            .field("released", &self.released)
            .finish()
    }
}

/// Emits `SerialReceived` for the expected byte, then stays deaf for a
/// lockout period.
///
/// Bytes arriving during the lockout are left in the port and read once
/// it ends. The poll on which the lockout ends reads nothing.
pub struct SerialLockoutSource<P> {
    serial: SerialSource<P>,
    timer: AlarmTimer,
    locked: bool,
}

impl<P: SerialPort> SerialLockoutSource<P> {
    pub fn new(port: P, expected: u8, clock: SharedClock, lockout: u64) -> Self {
        Self {
            serial: SerialSource::expecting(port, expected),
            timer: AlarmTimer::new(clock, lockout),
            locked: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl<P: SerialPort> EventSource for SerialLockoutSource<P> {
    fn poll_event(&mut self) -> Event {
        if self.locked {
            if self.timer.elapsed() {
                self.locked = false;
                self.timer.stop();
            }
            return Event::none();
        }

        match self.serial.next_byte() {
            Some(byte) => {
                self.timer.start();
                self.locked = self.timer.is_running();
                Event::serial_received().with_int(i32::from(byte))
            }
            None => Event::none(),
        }
    }
}

impl<P> fmt::Debug for SerialLockoutSource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialLockoutSource")
            .field("serial", &self.serial)
            .field("timer", &self.timer)
            .field("locked", &self.locked)
            .finish()
    }
}
