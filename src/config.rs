//! Dispatcher settings.

/// Prompt written before each line of input.
pub const DEFAULT_PROMPT: &str = "> ";

/// What the dispatch loop does when a handler returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the loop and return the error from [`Dispatcher::run`](crate::Dispatcher::run).
    #[default]
    Propagate,
    /// Log the error, tell the user, and keep reading input.
    /// `PostCommandExecute` is not fired for the failed command.
    Report,
}

/// Settings for a [`Dispatcher`](crate::Dispatcher).
///
/// Fields are public; start from [`Default`] and override what you need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Text shown before each read.
    pub prompt: String,
    /// Handling of handler errors.
    pub failure_policy: FailurePolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}
