//! Blink Scheduler
//!
//! This example runs several actions side by side from one main loop,
//! with their timings loaded from JSON.
//!
//! Key concepts:
//! - Periodic actions, immediate and delayed
//! - A bounded action that finishes after N runs
//! - A one-shot timed action
//! - `EngineConfig` validation
//!
//! Run with: cargo run --example blink_scheduler

use std::cell::Cell;
use std::rc::Rc;
use tickfsm::actions::{FnAction, PeriodicAction, Scheduler, TimedAction};
use tickfsm::config::EngineConfig;
use tickfsm::core::{Clock, ManualClock};

const CONFIG: &str = r#"{
    "periodic": {
        "led": { "period_ms": 500 },
        "heartbeat": { "period_ms": 1000, "delay_ms": 250 },
        "burst": { "period_ms": 100, "executions": 5 }
    },
    "timed": {
        "report": { "interval_ms": 3000 }
    }
}"#;

fn main() {
    println!("=== Blink Scheduler ===\n");

    let config = match EngineConfig::from_json(CONFIG) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid config: {e}");
            return;
        }
    };

    let clock = ManualClock::new();
    let led_on = Rc::new(Cell::new(false));
    let ticks = Rc::new(Cell::new(0u32));

    let mut scheduler = Scheduler::new();

    let (led, at) = (Rc::clone(&led_on), clock.clone());
    scheduler.add_action(PeriodicAction::from_config(
        clock.shared(),
        "led",
        &config.periodic["led"],
        move || {
            led.set(!led.get());
            println!("t={:>5}  led {}", at.now_millis(), if led.get() { "on" } else { "off" });
        },
    ));

    let at = clock.clone();
    scheduler.add_action(PeriodicAction::from_config(
        clock.shared(),
        "heartbeat",
        &config.periodic["heartbeat"],
        move || println!("t={:>5}  heartbeat", at.now_millis()),
    ));

    let at = clock.clone();
    scheduler.add_action(PeriodicAction::from_config(
        clock.shared(),
        "burst",
        &config.periodic["burst"],
        move || println!("t={:>5}  burst", at.now_millis()),
    ));

    let (at, seen) = (clock.clone(), Rc::clone(&ticks));
    scheduler.add_action(TimedAction::from_config(
        clock.shared(),
        "report",
        &config.timed["report"],
        move || println!("t={:>5}  report after {} loop passes", at.now_millis(), seen.get()),
    ));

    let counter = Rc::clone(&ticks);
    scheduler.add_action(FnAction::new("count", move || counter.set(counter.get() + 1)));

    for now in (0..=4_000).step_by(50) {
        clock.set(now);
        scheduler.run();
    }

    println!("\nActions:");
    for index in 0..scheduler.len() {
        if let Some(action) = scheduler.action(index) {
            println!("  {:<10} finished: {}", action.name(), action.is_finished());
        }
    }
}
