//! Stock commands and listeners.
//!
//! [`install`] wires them into a [`Dispatcher`]: an `Initialize` listener
//! registers the commands below, and the remaining listeners log each step of
//! the loop.
//!
//! | name    | behaviour                              |
//! |---------|----------------------------------------|
//! | `""`    | does nothing (what a blank line runs)  |
//! | `quit`  | stops the dispatch loop                |
//! | `exit`  | same as `quit`                         |
//! | `debug` | prints the arguments it was given      |

use crate::command::Session;
use crate::dispatcher::Dispatcher;
use crate::events::{Event, Lifecycle};
use anyhow::Result;
use tracing::{debug, info};

/// Subscribe the stock listeners to `dispatcher`.
pub fn install(dispatcher: &mut Dispatcher) {
    dispatcher.subscribe(Lifecycle::Initialize, register_commands);
    dispatcher.subscribe(Lifecycle::InitializeFinished, list_commands);
    dispatcher.subscribe(Lifecycle::PreCommandExecute, log_command);
    dispatcher.subscribe(Lifecycle::PostCommandExecute, log_command);
}

fn register_commands(_event: &Event<'_>, session: &mut Session<'_>) -> Result<()> {
    info!("Dispatcher is initializing. Commands are being added now.");
    session.register_labeled("", "builtin::nothing", nothing)?;
    session.register_labeled("quit", "builtin::quit", quit)?;
    session.register_labeled("exit", "builtin::quit", quit)?;
    session.register_labeled("debug", "builtin::show_args", show_args)?;
    Ok(())
}

fn list_commands(_event: &Event<'_>, session: &mut Session<'_>) -> Result<()> {
    info!("Dispatch loop is about to run. Known commands:");
    for name in session.commands() {
        info!("'{name}'");
    }
    info!("If any commands are missing, they are likely being added later.");
    Ok(())
}

fn log_command(event: &Event<'_>, _session: &mut Session<'_>) -> Result<()> {
    let Some(command) = event.command() else {
        return Ok(());
    };
    let stage = match event.kind() {
        Lifecycle::PreCommandExecute => "is about to be executed",
        _ => "was executed",
    };
    match command.args() {
        Some(args) => {
            debug!("Command '{}' {stage} with the following arguments:", command.name());
            for arg in args {
                debug!("{arg}");
            }
        }
        None => debug!("Command '{}' {stage} without arguments.", command.name()),
    }
    Ok(())
}

/// Blank input.
pub fn nothing(_args: Option<&[String]>, _session: &mut Session<'_>) -> Result<()> {
    Ok(())
}

/// Ends the dispatch loop after the current line.
pub fn quit(_args: Option<&[String]>, session: &mut Session<'_>) -> Result<()> {
    session.stop();
    Ok(())
}

/// Writes each argument back to the user, quoted.
pub fn show_args(args: Option<&[String]>, session: &mut Session<'_>) -> Result<()> {
    let out = session.output();
    writeln!(out, "Hello! I am a command, and I can show you some arguments!")?;
    match args {
        Some(args) if !args.is_empty() => {
            write!(out, "My arguments are as follows:")?;
            for arg in args {
                write!(out, " '{arg}'")?;
            }
            writeln!(out)?;
            writeln!(out, "Aren't they beautiful?")?;
        }
        _ => writeln!(out, "Oh, it looks like I don't have arguments. Bummer!")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::{LineReader, MemWriter};
    use crate::registry::Registry;

    fn call(
        handler: fn(Option<&[String]>, &mut Session<'_>) -> Result<()>,
        args: Option<&[String]>,
    ) -> (String, bool) {
        let mut registry = Registry::default();
        let mut stop = false;
        let mut out = Vec::new();
        let mut session = Session::new(&mut registry, &mut stop, &mut out);
        handler(args, &mut session).unwrap();
        (String::from_utf8(out).unwrap(), stop)
    }

    #[test]
    fn test_show_args_lists_each_argument() {
        let args = vec!["a".to_string(), "b c".to_string()];
        let (out, stop) = call(show_args, Some(args.as_slice()));
        assert_eq!(
            out,
            "Hello! I am a command, and I can show you some arguments!\n\
             My arguments are as follows: 'a' 'b c'\n\
             Aren't they beautiful?\n"
        );
        assert!(!stop);
    }

    #[test]
    fn test_show_args_without_arguments() {
        let expected = "Hello! I am a command, and I can show you some arguments!\n\
                        Oh, it looks like I don't have arguments. Bummer!\n";
        assert_eq!(call(show_args, None).0, expected);
        assert_eq!(call(show_args, Some(&[][..])).0, expected);
    }

    #[test]
    fn test_quit_sets_stop_and_nothing_does_not() {
        assert_eq!(call(quit, None), (String::new(), true));
        assert_eq!(call(nothing, None), (String::new(), false));
    }

    #[test]
    fn test_install_registers_stock_commands() {
        let (output, captured) = MemWriter::with_handle();
        let input = LineReader::from_lines(["", "debug x", "exit"]);
        let mut dispatcher = Dispatcher::new(input, output);
        install(&mut dispatcher);

        let last = dispatcher.run().unwrap();

        assert_eq!(
            dispatcher.registry().names().collect::<Vec<_>>(),
            vec!["", "quit", "exit", "debug"]
        );
        assert_eq!(dispatcher.registry().label("exit"), Some("builtin::quit"));
        assert_eq!(last.unwrap().name(), "exit");
        assert_eq!(
            captured.text(),
            "> > Hello! I am a command, and I can show you some arguments!\n\
             My arguments are as follows: 'x'\n\
             Aren't they beautiful?\n\
             > "
        );
    }

    #[test]
    fn test_install_twice_keeps_first_registration() {
        let mut dispatcher = Dispatcher::new(LineReader::from_lines(["quit"]), MemWriter::new());
        install(&mut dispatcher);
        install(&mut dispatcher);

        dispatcher.run().unwrap();
        assert_eq!(dispatcher.registry().len(), 4);
    }
}
