//! Traffic Light
//!
//! This example cycles a traffic light through timed phases and lets a
//! pedestrian request cut the green phase short.
//!
//! Key concepts:
//! - State timeouts wired with `timed_cycle`
//! - A condition transition outranking the green timeout
//! - Enter hooks switching the lamps
//! - Simulated time through `ManualClock`
//!
//! Run with: cargo run --example traffic_light

use std::cell::Cell;
use std::rc::Rc;
use tickfsm::builder::{timed_cycle, MachineBuilder};
use tickfsm::core::ManualClock;
use tickfsm::machine::{State, Tick, Transition};

fn lamp(name: &'static str, millis: u64) -> State {
    State::new(name)
        .with_timeout(millis)
        .on_enter(move |event, _| println!("  lamp: {name:<6} (on {event})"))
}

fn main() {
    println!("=== Traffic Light ===\n");

    let clock = ManualClock::new();
    let button = Rc::new(Cell::new(false));

    let mut builder = MachineBuilder::new(clock.shared());
    let red = builder.state(lamp("red", 3_000));
    let green = builder.state(lamp("green", 5_000));
    let yellow = builder.state(lamp("yellow", 800));
    timed_cycle(&mut builder, &[red, green, yellow]).expect("lamps are registered");

    let request = Rc::clone(&button);
    builder
        .transition(
            green,
            Transition::condition(yellow, move || request.replace(false)),
        )
        .expect("green is registered");

    let mut fsm = builder.initial(red).build().expect("valid traffic light");
    fsm.start();

    for now in (0..=12_000).step_by(100) {
        clock.set(now);
        if now == 4_000 {
            println!("t={now:>5}  pedestrian presses the button");
            button.set(true);
        }
        if let Tick::Transitioned { from, to, .. } = fsm.run() {
            println!("t={now:>5}  {from} -> {to}");
        }
    }

    println!("\nPath: {:?}", fsm.history().get_path());
}
