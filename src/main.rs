use argh::FromArgs;
use shell_dispatch::logging::{self, LogDestination, LogOptions};
use shell_dispatch::{Dispatcher, DispatcherConfig, FailurePolicy, builtin};
use std::path::PathBuf;

#[derive(FromArgs)]
/// Read commands line by line and dispatch them to registered handlers.
struct Args {
    #[argh(option, default = "shell_dispatch::config::DEFAULT_PROMPT.to_string()")]
    /// text shown before each line of input
    prompt: String,

    #[argh(option, default = "PathBuf::from(logging::DEFAULT_LOG_FILE)")]
    /// file the log is appended to
    log_file: PathBuf,

    #[argh(option)]
    /// log filter used when RUST_LOG is unset (debug in debug builds, info otherwise)
    log_level: Option<String>,

    #[argh(switch)]
    /// log to stderr instead of a file
    log_stderr: bool,

    #[argh(switch)]
    /// report failing commands and keep reading instead of stopping
    keep_going: bool,
}

fn main() {
    let args: Args = argh::from_env();
    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let log_options = LogOptions {
        level: args
            .log_level
            .unwrap_or_else(|| logging::default_level().to_string()),
        destination: if args.log_stderr {
            LogDestination::Stderr
        } else {
            LogDestination::File(args.log_file)
        },
    };
    let _guard = logging::init(&log_options)?;

    let config = DispatcherConfig {
        prompt: args.prompt,
        failure_policy: if args.keep_going {
            FailurePolicy::Report
        } else {
            FailurePolicy::Propagate
        },
    };
    let mut dispatcher = Dispatcher::stdio(config)?;
    builtin::install(&mut dispatcher);
    dispatcher.run()?;
    Ok(())
}
