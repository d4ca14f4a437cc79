//! Build errors for machine construction.

use crate::core::StateId;
use thiserror::Error;

/// A structural problem found while validating a machine definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationIssue {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state {0} was not registered with this builder")]
    UnknownInitialState(StateId),

    #[error("Transition from {from} targets {to}, which was not registered with this builder")]
    UnknownTarget { from: StateId, to: StateId },
}

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("State {0} was not registered with this builder")]
    UnknownState(StateId),

    #[error("Invalid machine definition: {}", summarize(.0))]
    Invalid(Vec<ValidationIssue>),
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
