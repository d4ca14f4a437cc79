//! Tagged events and their optional typed payloads.
//!
//! An [`Event`] is an occurrence of some [`EventKind`], optionally carrying
//! a single integer, byte or float. Events are plain owned values: each
//! occurrence is constructed fresh, so a payload can never be overwritten
//! behind the back of a hook that is still reading it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Nothing happened.
    None,
    GlobalTimeout,
    LocalTimeout,
    Condition,
    ButtonPressed,
    ButtonReleased,
    SerialReceived,
    SerialSent,
    /// Application-defined kind, distinguished by its code.
    Custom(u8),
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::GlobalTimeout => "GlobalTimeout",
            Self::LocalTimeout => "LocalTimeout",
            Self::Condition => "Condition",
            Self::ButtonPressed => "ButtonPressed",
            Self::ButtonReleased => "ButtonReleased",
            Self::SerialReceived => "SerialReceived",
            Self::SerialSent => "SerialSent",
            Self::Custom(_) => "Custom",
        }
    }
}

/// Discriminator of the payload carried by an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    None,
    Int,
    Byte,
    Float,
}

/// Typed payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    None,
    Int(i32),
    Byte(u8),
    Float(f32),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::None => ValueType::None,
            Self::Int(_) => ValueType::Int,
            Self::Byte(_) => ValueType::Byte,
            Self::Float(_) => ValueType::Float,
        }
    }
}

/// An event occurrence: a kind plus an optional payload.
///
/// Equality compares the kind only. Two button presses on different pins
/// are the same event as far as transition matching is concerned.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{Event, EventKind, ValueType};
///
/// let pressed = Event::button_pressed().with_byte(7);
///
/// assert_eq!(pressed.kind(), EventKind::ButtonPressed);
/// assert_eq!(pressed.value_type(), ValueType::Byte);
/// assert_eq!(pressed.byte_value(), 7);
/// assert_eq!(pressed.int_value(), 0);
///
/// // Payload is ignored by equality
/// assert_eq!(pressed, Event::button_pressed());
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Event {
    kind: EventKind,
    #[serde(default)]
    value: Value,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            value: Value::None,
        }
    }

    pub fn with_value(kind: EventKind, value: Value) -> Self {
        Self { kind, value }
    }

    pub fn none() -> Self {
        Self::new(EventKind::None)
    }

    pub fn global_timeout() -> Self {
        Self::new(EventKind::GlobalTimeout)
    }

    pub fn local_timeout() -> Self {
        Self::new(EventKind::LocalTimeout)
    }

    pub fn button_pressed() -> Self {
        Self::new(EventKind::ButtonPressed)
    }

    pub fn button_released() -> Self {
        Self::new(EventKind::ButtonReleased)
    }

    pub fn serial_received() -> Self {
        Self::new(EventKind::SerialReceived)
    }

    pub fn serial_sent() -> Self {
        Self::new(EventKind::SerialSent)
    }

    pub fn custom(code: u8) -> Self {
        Self::new(EventKind::Custom(code))
    }

    /// Replace the payload with an integer.
    pub fn with_int(mut self, value: i32) -> Self {
        self.value = Value::Int(value);
        self
    }

    /// Replace the payload with a byte.
    pub fn with_byte(mut self, value: u8) -> Self {
        self.value = Value::Byte(value);
        self
    }

    /// Replace the payload with a float.
    pub fn with_float(mut self, value: f32) -> Self {
        self.value = Value::Float(value);
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    pub fn is_none(&self) -> bool {
        self.kind == EventKind::None
    }

    /// Integer payload, or 0 when the payload is not an integer.
    pub fn int_value(&self) -> i32 {
        match self.value {
            Value::Int(v) => v,
            _ => 0,
        }
    }

    /// Byte payload, or 0 when the payload is not a byte.
    pub fn byte_value(&self) -> u8 {
        match self.value {
            Value::Byte(v) => v,
            _ => 0,
        }
    }

    /// Float payload, or 0.0 when the payload is not a float.
    pub fn float_value(&self) -> f32 {
        match self.value {
            Value::Float(v) => v,
            _ => 0.0,
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::none()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Event {}

impl PartialEq<EventKind> for Event {
    fn eq(&self, other: &EventKind) -> bool {
        self.kind == *other
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Custom(code) => write!(f, "Custom({code})")?,
            kind => f.write_str(kind.name())?,
        }
        match self.value {
            Value::None => Ok(()),
            Value::Int(v) => write!(f, "[{v}]"),
            Value::Byte(v) => write!(f, "[0x{v:02x}]"),
            Value::Float(v) => write!(f, "[{v}]"),
        }
    }
}
