//! A tiny, embeddable command dispatcher for line-oriented interactive programs.
//!
//! The crate reads lines of text, splits each one into a command name and its
//! arguments, and invokes the handler registered under that name. Lifecycle
//! events (initialize, pre/post execute, not found, exit) let outside code
//! observe or extend dispatch without touching the loop itself.
//!
//! The main entry point is [`Dispatcher`]. Handlers and listeners receive a
//! [`Session`], through which they can register further commands, write to the
//! user or ask the loop to stop. The [`builtin`] module installs the stock
//! commands (`""`, `quit`, `exit`, `debug`) and the stock logging listeners.
//!
//! ```
//! use shell_dispatch::{Dispatcher, LineReader, MemWriter};
//! use std::io::Write;
//!
//! let (output, captured) = MemWriter::with_handle();
//! let mut dispatcher = Dispatcher::new(LineReader::from_lines(["hello", "bye"]), output);
//! dispatcher
//!     .register("hello", |_args, session| {
//!         writeln!(session.output(), "hi!")?;
//!         Ok(())
//!     })
//!     .unwrap();
//! dispatcher
//!     .register("bye", |_args, session| {
//!         session.stop();
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let last = dispatcher.run().unwrap();
//! assert_eq!(last.unwrap().name(), "bye");
//! assert_eq!(captured.text(), "> hi!\n> ");
//! ```

pub mod builtin;
pub mod command;
pub mod config;
mod dispatcher;
pub mod error;
pub mod events;
mod io_adapters;
pub mod logging;
mod registry;

pub use command::{Handler, ParsedCommand, Session};
pub use config::{DispatcherConfig, FailurePolicy};
pub use dispatcher::{Dispatch, Dispatcher, Phase};
pub use error::{RegistrationError, RunError};
pub use events::{Event, Lifecycle, Listener};
pub use io_adapters::{CapturedOutput, Editor, LineReader, LineSource, MemWriter};
pub use registry::Registry;
