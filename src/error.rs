//! Error types surfaced by the dispatcher.
//!
//! Handler failures and I/O problems travel as [`anyhow::Error`]; the types here
//! cover the contract violations callers are expected to match on.

use crate::dispatcher::Phase;

/// Errors returned when registering a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Command names are single tokens and must not contain a space.
    #[error("command name '{0}' must not contain a space")]
    InvalidName(String),
}

/// Errors returned when starting the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// The loop runs once per dispatcher and never resumes.
    #[error("dispatch loop cannot start from the {0} phase")]
    AlreadyStarted(Phase),
}
