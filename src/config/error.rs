//! Configuration error types.

use thiserror::Error;

/// A single problem found in an otherwise parseable configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigIssue {
    #[error("periodic action '{0}' has a zero period")]
    ZeroPeriod(String),

    #[error("periodic action '{0}' is bounded to zero executions and would never run")]
    ZeroExecutions(String),

    #[error("timed action '{0}' has a zero interval")]
    ZeroInterval(String),
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the schema
    #[error("Config parsing failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Serialization to JSON failed
    #[error("Config serialization failed: {0}")]
    Serialize(String),

    /// The config parsed but failed validation
    #[error("Config validation failed with {} issue(s): {}", .0.len(), list(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn list(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
