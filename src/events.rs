//! Lifecycle events fired by the dispatch loop.
//!
//! Every event kind has its own list of listeners. Firing an event calls each
//! listener of that kind synchronously, in the order they subscribed. Listeners
//! get the same [`Session`] handlers do, so an `Initialize` listener is where
//! commands are normally registered.
//!
//! ```text
//! run()
//!   → Initialize
//!   → InitializeFinished
//!   → for each line:
//!       PreCommandExecute
//!       → handler → PostCommandExecute
//!       | CommandNotFound
//!   → Exit
//! ```

use crate::command::{ParsedCommand, Session};
use anyhow::{Context, Result};
use std::fmt;
use std::rc::Rc;

/// Names the hook points a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Initialize,
    InitializeFinished,
    PreCommandExecute,
    PostCommandExecute,
    CommandNotFound,
    Exit,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 6] = [
        Lifecycle::Initialize,
        Lifecycle::InitializeFinished,
        Lifecycle::PreCommandExecute,
        Lifecycle::PostCommandExecute,
        Lifecycle::CommandNotFound,
        Lifecycle::Exit,
    ];

    fn slot(self) -> usize {
        match self {
            Lifecycle::Initialize => 0,
            Lifecycle::InitializeFinished => 1,
            Lifecycle::PreCommandExecute => 2,
            Lifecycle::PostCommandExecute => 3,
            Lifecycle::CommandNotFound => 4,
            Lifecycle::Exit => 5,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Initialize => "Initialize",
            Lifecycle::InitializeFinished => "InitializeFinished",
            Lifecycle::PreCommandExecute => "PreCommandExecute",
            Lifecycle::PostCommandExecute => "PostCommandExecute",
            Lifecycle::CommandNotFound => "CommandNotFound",
            Lifecycle::Exit => "Exit",
        };
        f.write_str(name)
    }
}

/// An event together with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Initialize,
    InitializeFinished,
    /// A line was parsed and is about to be looked up.
    PreCommandExecute(&'a ParsedCommand),
    /// The handler for the command returned successfully.
    PostCommandExecute(&'a ParsedCommand),
    /// No handler is registered under the command's name.
    CommandNotFound(&'a ParsedCommand),
    /// The loop finished. Carries the last command processed, which is `None`
    /// only when input ended before any line was read.
    Exit(Option<&'a ParsedCommand>),
}

impl<'a> Event<'a> {
    pub fn kind(&self) -> Lifecycle {
        match self {
            Event::Initialize => Lifecycle::Initialize,
            Event::InitializeFinished => Lifecycle::InitializeFinished,
            Event::PreCommandExecute(_) => Lifecycle::PreCommandExecute,
            Event::PostCommandExecute(_) => Lifecycle::PostCommandExecute,
            Event::CommandNotFound(_) => Lifecycle::CommandNotFound,
            Event::Exit(_) => Lifecycle::Exit,
        }
    }

    /// The command carried by the event, if it has one.
    pub fn command(&self) -> Option<&'a ParsedCommand> {
        match *self {
            Event::Initialize | Event::InitializeFinished => None,
            Event::PreCommandExecute(cmd)
            | Event::PostCommandExecute(cmd)
            | Event::CommandNotFound(cmd) => Some(cmd),
            Event::Exit(cmd) => cmd,
        }
    }
}

/// A subscribed event callback.
pub type Listener = Rc<dyn Fn(&Event<'_>, &mut Session<'_>) -> Result<()>>;

/// Listener lists, one per [`Lifecycle`] kind.
#[derive(Default)]
pub struct Listeners {
    slots: [Vec<Listener>; 6],
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the list for `kind`.
    pub fn subscribe<F>(&mut self, kind: Lifecycle, listener: F)
    where
        F: Fn(&Event<'_>, &mut Session<'_>) -> Result<()> + 'static,
    {
        self.slots[kind.slot()].push(Rc::new(listener));
    }

    /// Number of listeners subscribed to `kind`.
    pub fn count(&self, kind: Lifecycle) -> usize {
        self.slots[kind.slot()].len()
    }

    /// Call every listener of the event's kind in subscription order.
    ///
    /// The first listener error stops the remaining ones and is returned.
    pub fn fire(&self, event: &Event<'_>, session: &mut Session<'_>) -> Result<()> {
        for listener in &self.slots[event.kind().slot()] {
            listener(event, session).with_context(|| format!("{} listener failed", event.kind()))?;
        }
        Ok(())
    }
}
