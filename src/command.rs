use crate::error::RegistrationError;
use crate::registry::Registry;
use anyhow::Result;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// A single line of user input split into a command name and its arguments.
///
/// A fresh value is built for every line the dispatcher reads. The name is the
/// first whitespace-delimited token, or the empty string for a blank line. An
/// empty argument list is always stored as `None`, never as a zero-length vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    name: String,
    args: Option<Vec<String>>,
}

impl ParsedCommand {
    /// Build a command from parts. `Some(vec![])` is normalised to `None`.
    pub fn new(name: impl Into<String>, args: Option<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            args: args.filter(|args| !args.is_empty()),
        }
    }

    /// Split a line on whitespace into a command name and its arguments.
    ///
    /// ```
    /// use shell_dispatch::ParsedCommand;
    ///
    /// let cmd = ParsedCommand::parse("debug a b");
    /// assert_eq!(cmd.name(), "debug");
    /// assert_eq!(cmd.args(), Some(&["a".to_string(), "b".to_string()][..]));
    ///
    /// assert_eq!(ParsedCommand::parse("   ").name(), "");
    /// assert_eq!(ParsedCommand::parse("quit").args(), None);
    /// ```
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let args: Vec<String> = tokens.map(str::to_string).collect();
        Self::new(name, Some(args))
    }

    /// The command name used as the registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arguments following the command name, or `None` when there are none.
    pub fn args(&self) -> Option<&[String]> {
        self.args.as_deref()
    }

    /// Whether at least one argument was supplied.
    pub fn has_args(&self) -> bool {
        self.args.as_ref().is_some_and(|args| !args.is_empty())
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in self.args.iter().flatten() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A registered command implementation.
///
/// Handlers receive the arguments of the current line (`None` when there are
/// none) and a [`Session`] giving access to the dispatcher's state. An error
/// returned from a handler is not swallowed: by default it ends the dispatch
/// loop and surfaces from [`Dispatcher::run`](crate::Dispatcher::run).
pub type Handler = Rc<dyn Fn(Option<&[String]>, &mut Session<'_>) -> Result<()>>;

/// What a handler or event listener may touch while it runs.
///
/// A session borrows the dispatcher's registry, termination flag and output for
/// the duration of a single call.
pub struct Session<'a> {
    registry: &'a mut Registry,
    stop_requested: &'a mut bool,
    output: &'a mut dyn Write,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        registry: &'a mut Registry,
        stop_requested: &'a mut bool,
        output: &'a mut dyn Write,
    ) -> Self {
        Self {
            registry,
            stop_requested,
            output,
        }
    }

    /// Register a command. See [`Registry::register`].
    pub fn register<F>(&mut self, name: &str, handler: F) -> Result<bool, RegistrationError>
    where
        F: Fn(Option<&[String]>, &mut Session<'_>) -> Result<()> + 'static,
    {
        self.registry.register(name, handler)
    }

    /// Register a command with a label for diagnostics. See [`Registry::register_labeled`].
    pub fn register_labeled<F>(
        &mut self,
        name: &str,
        label: &str,
        handler: F,
    ) -> Result<bool, RegistrationError>
    where
        F: Fn(Option<&[String]>, &mut Session<'_>) -> Result<()> + 'static,
    {
        self.registry.register_labeled(name, label, handler)
    }

    /// Names of every registered command.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    /// Ask the dispatch loop to stop once the current line has been handled.
    pub fn stop(&mut self) {
        *self.stop_requested = true;
    }

    /// Whether the loop has been asked to stop.
    pub fn is_stopping(&self) -> bool {
        *self.stop_requested
    }

    /// The stream text for the user is written to.
    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }
}
