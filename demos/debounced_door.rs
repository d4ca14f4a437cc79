//! Debounced Door
//!
//! This example drives a door controller from a bouncing push button and
//! a serial console.
//!
//! Key concepts:
//! - `DebouncedButtonSource` shared by transitions of two states
//! - Priority transitions combining an event with a timeout
//! - A serial lockout source acting as a remote open command
//! - Transition history
//!
//! Run with: cargo run --example debounced_door

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tickfsm::builder::MachineBuilder;
use tickfsm::core::{EventKind, ManualClock};
use tickfsm::machine::{State, Tick, Transition};
use tickfsm::sources::{self, DebouncedButtonSource, LoopbackSerial, SerialLockoutSource};

const BUTTON_PIN: u8 = 2;

fn main() {
    println!("=== Debounced Door ===\n");

    let clock = ManualClock::new();
    let level = Rc::new(Cell::new(true));
    let line = Rc::clone(&level);
    let button = sources::shared(DebouncedButtonSource::new(
        clock.shared(),
        BUTTON_PIN,
        move || line.get(),
    ));

    let console = Rc::new(RefCell::new(LoopbackSerial::new()));
    let remote = sources::shared(SerialLockoutSource::new(
        Rc::clone(&console),
        b'o',
        clock.shared(),
        2_000,
    ));

    let mut builder = MachineBuilder::new(clock.shared());
    let closed = builder.state(
        State::new("closed").on_enter(|event, _| println!("  door closed ({event})")),
    );
    let open = builder.state(
        State::new("open")
            .with_timeout(4_000)
            .on_enter(|event, _| println!("  door open ({event})")),
    );

    builder
        .transitions(
            closed,
            [
                Transition::event(open, EventKind::ButtonPressed, Rc::clone(&button)),
                Transition::event(open, EventKind::SerialReceived, remote),
            ],
        )
        .expect("closed is registered");
    builder
        .transition(
            open,
            Transition::priority_event(closed, EventKind::ButtonPressed, button, true),
        )
        .expect("open is registered");

    let mut fsm = builder.initial(closed).build().expect("valid door");
    fsm.start();

    // Button contact bounces on press, then stays down for a while
    let script: &[(u64, bool)] = &[
        (1_000, false),
        (1_010, true),
        (1_020, false),
        (1_300, true),
        (2_000, false),
        (2_200, true),
    ];

    for now in (0..=12_000).step_by(10) {
        clock.set(now);
        if let Some(&(_, high)) = script.iter().find(|(at, _)| *at == now) {
            level.set(high);
        }
        if now == 7_000 {
            console.borrow_mut().feed(b"o");
        }
        if let Tick::Transitioned { from, to, event } = fsm.run() {
            println!("t={now:>5}  {from} -> {to} on {event}");
        }
    }

    println!("\nHistory:");
    for record in fsm.history().transitions() {
        println!(
            "  {:>5} ms  {} -> {}  {}",
            record.at_millis, record.from, record.to, record.event
        );
    }
}
