//! Engine configuration.
//!
//! Timings and history settings can be kept out of code and loaded from
//! JSON. Every config validates with all of its problems reported at once.
//!
//! ```rust
//! use tickfsm::config::EngineConfig;
//!
//! let config = EngineConfig::from_json(
//!     r#"{
//!         "fsm": { "history_capacity": 8 },
//!         "periodic": { "blink": { "period_ms": 500, "executions": 10 } },
//!         "timed": { "beep": { "interval_ms": 2000 } }
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.fsm.history_capacity, 8);
//! assert_eq!(config.periodic["blink"].delay_ms, 0);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub mod error;

pub use error::{ConfigError, ConfigIssue};

/// Default number of transitions a machine remembers.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Settings of a single machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FsmConfig {
    /// Transitions kept in the history ring; zero disables recording
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Timing of a [`PeriodicAction`](crate::actions::PeriodicAction).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodicActionConfig {
    pub period_ms: u64,

    /// Wait before the first execution; zero runs on the first call
    #[serde(default)]
    pub delay_ms: u64,

    /// Bounded execution count; absent means run forever
    #[serde(default)]
    pub executions: Option<u32>,
}

impl PeriodicActionConfig {
    pub fn validate(&self, name: &str) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        let period = if self.period_ms == 0 {
            Validation::fail(ConfigIssue::ZeroPeriod(name.to_string()))
        } else {
            Validation::success(())
        };
        let executions = if self.executions == Some(0) {
            Validation::fail(ConfigIssue::ZeroExecutions(name.to_string()))
        } else {
            Validation::success(())
        };
        Validation::all_vec(vec![period, executions]).map(|_| ())
    }
}

/// Timing of a [`TimedAction`](crate::actions::TimedAction).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedActionConfig {
    pub interval_ms: u64,
}

impl TimedActionConfig {
    pub fn validate(&self, name: &str) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        if self.interval_ms == 0 {
            Validation::fail(ConfigIssue::ZeroInterval(name.to_string()))
        } else {
            Validation::success(())
        }
    }
}

/// Top-level configuration: machine settings plus named action timings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fsm: FsmConfig,

    #[serde(default)]
    pub periodic: BTreeMap<String, PeriodicActionConfig>,

    #[serde(default)]
    pub timed: BTreeMap<String, TimedActionConfig>,
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        match config.validate() {
            Validation::Success(_) => Ok(config),
            Validation::Failure(issues) => {
                Err(ConfigError::Invalid(issues.iter().cloned().collect()))
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Check every action timing, accumulating all issues.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigIssue>> {
        let checks: Vec<_> = self
            .periodic
            .iter()
            .map(|(name, config)| config.validate(name))
            .chain(
                self.timed
                    .iter()
                    .map(|(name, config)| config.validate(name)),
            )
            .collect();

        if checks.is_empty() {
            return Validation::success(());
        }
        Validation::all_vec(checks).map(|_| ())
    }
}
