use crate::command::{ParsedCommand, Session};
use crate::config::{DispatcherConfig, FailurePolicy};
use crate::error::{RegistrationError, RunError};
use crate::events::{Event, Lifecycle, Listeners};
use crate::io_adapters::{Editor, LineReader, LineSource};
use crate::registry::Registry;
use anyhow::{Context, Result};
use std::fmt;
use std::io::{IsTerminal, Write};
use tracing::{debug, error, info};

/// Where a [`Dispatcher`] is in its lifecycle.
///
/// A dispatcher only moves forward through these phases and runs once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Running,
    Exiting,
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Initializing => "initializing",
            Phase::Running => "running",
            Phase::Exiting => "exiting",
            Phase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Result of dispatching a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran and returned successfully.
    Executed,
    /// No command is registered under the line's name.
    NotFound,
    /// The handler failed and the error was reported under [`FailurePolicy::Report`].
    Failed,
}

/// Reads lines, parses them and runs the matching command handlers.
///
/// The dispatcher owns the command [`Registry`], the event listeners, the
/// termination flag and its input and output. Commands are usually registered
/// from an [`Lifecycle::Initialize`] listener, but can be added directly before
/// [`Dispatcher::run`] or from inside a running handler.
pub struct Dispatcher {
    registry: Registry,
    listeners: Listeners,
    config: DispatcherConfig,
    phase: Phase,
    stop_requested: bool,
    input: Box<dyn LineSource>,
    output: Box<dyn Write>,
}

impl Dispatcher {
    /// Create a dispatcher with default settings.
    pub fn new(input: impl LineSource + 'static, output: impl Write + 'static) -> Self {
        Self {
            registry: Registry::new(),
            listeners: Listeners::new(),
            config: DispatcherConfig::default(),
            phase: Phase::Uninitialized,
            stop_requested: false,
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Create a dispatcher reading the process's standard input.
    ///
    /// A terminal gets the interactive line editor; anything else (a pipe, a
    /// file) is read line by line.
    pub fn stdio(config: DispatcherConfig) -> Result<Self> {
        let stdin = std::io::stdin();
        let dispatcher = if stdin.is_terminal() {
            Self::new(Editor::new()?, std::io::stdout())
        } else {
            Self::new(LineReader::new(stdin.lock()), std::io::stdout())
        };
        Ok(dispatcher.with_config(config))
    }

    /// Replace the settings.
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a command. See [`Registry::register`].
    pub fn register<F>(&mut self, name: &str, handler: F) -> Result<bool, RegistrationError>
    where
        F: Fn(Option<&[String]>, &mut Session<'_>) -> Result<()> + 'static,
    {
        self.registry.register(name, handler)
    }

    /// Register a command with a label for diagnostics.
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

    /// Add a listener for `kind`. Listeners of one kind run in subscription order.
    pub fn subscribe<F>(&mut self, kind: Lifecycle, listener: F)
    where
        F: Fn(&Event<'_>, &mut Session<'_>) -> Result<()> + 'static,
    {
        self.listeners.subscribe(kind, listener);
    }

    /// Commands registered so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a handler (or the end of input) has asked the loop to stop.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Run the dispatch loop until a handler stops it or input runs out.
    ///
    /// Fires `Initialize` and `InitializeFinished` once, then dispatches one
    /// line at a time, and finally fires `Exit` with the last command
    /// processed. That command is also returned; it is `None` only when the
    /// input was empty.
    ///
    /// Handler and listener errors end the loop and are returned. Either way the
    /// dispatcher is left [`Phase::Terminated`] and cannot be run again.
    pub fn run(&mut self) -> Result<Option<ParsedCommand>> {
        if self.phase != Phase::Uninitialized {
            return Err(RunError::AlreadyStarted(self.phase).into());
        }
        let result = self.run_phases();
        self.phase = Phase::Terminated;
        result
    }

    fn run_phases(&mut self) -> Result<Option<ParsedCommand>> {
        self.phase = Phase::Initializing;
        debug!("Dispatcher is initializing");
        self.fire(&Event::Initialize)?;

        self.phase = Phase::Running;
        self.fire(&Event::InitializeFinished)?;
        debug!("Dispatch loop is running with {} commands", self.registry.len());

        let mut last = None;
        while !self.stop_requested {
            let Some(line) = self.next_line()? else {
                info!("Input exhausted, stopping the dispatch loop");
                self.stop_requested = true;
                break;
            };
            let command = ParsedCommand::parse(&line);
            self.dispatch(&command)?;
            last = Some(command);
        }

        self.phase = Phase::Exiting;
        match &last {
            Some(command) => info!("Exiting due to command '{}'", command.name()),
            None => info!("Exiting before any command was read"),
        }
        self.fire(&Event::Exit(last.as_ref()))?;
        Ok(last)
    }

    /// Parse and dispatch a single line outside of [`Dispatcher::run`].
    ///
    /// Fires `PreCommandExecute` and then `PostCommandExecute` or
    /// `CommandNotFound`, exactly as the loop does for each line it reads.
    pub fn execute_line(&mut self, line: &str) -> Result<Dispatch> {
        self.dispatch(&ParsedCommand::parse(line))
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if !self.input.renders_prompt() {
            write!(self.output, "{}", self.config.prompt).context("failed to write prompt")?;
            self.output.flush().context("failed to flush output")?;
        }
        self.input.read_line(&self.config.prompt)
    }

    fn dispatch(&mut self, command: &ParsedCommand) -> Result<Dispatch> {
        debug!("Command '{}' is about to be executed", command.name());
        self.fire(&Event::PreCommandExecute(command))?;

        let Some(handler) = self.registry.lookup(command.name()).cloned() else {
            debug!("The command '{}' was not found", command.name());
            writeln!(
                self.output,
                "The command '{}' was not found. Are you missing a registration?",
                command.name()
            )
            .context("failed to write to output")?;
            self.fire(&Event::CommandNotFound(command))?;
            return Ok(Dispatch::NotFound);
        };

        let outcome = {
            let mut session = Session::new(
                &mut self.registry,
                &mut self.stop_requested,
                &mut *self.output,
            );
            handler(command.args(), &mut session)
        };

        match outcome {
            Ok(()) => {
                self.fire(&Event::PostCommandExecute(command))?;
                debug!("Command '{}' was executed", command.name());
                Ok(Dispatch::Executed)
            }
            Err(err) => {
                error!("Command '{}' failed: {err:#}", command.name());
                match self.config.failure_policy {
                    FailurePolicy::Propagate => {
                        Err(err.context(format!("command '{}' failed", command.name())))
                    }
                    FailurePolicy::Report => {
                        writeln!(self.output, "command '{}' failed: {err:#}", command.name())
                            .context("failed to write to output")?;
                        Ok(Dispatch::Failed)
                    }
                }
            }
        }
    }

    fn fire(&mut self, event: &Event<'_>) -> Result<()> {
        let Self {
            registry,
            listeners,
            stop_requested,
            output,
            ..
        } = self;
        let mut session = Session::new(registry, stop_requested, &mut **output);
        listeners.fire(event, &mut session)
    }
}
