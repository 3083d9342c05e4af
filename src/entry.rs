use clap::{CommandFactory, FromArgMatches};

use crate::app::{RunSettings, execute};
use crate::args::{Command, RoundtripArgs};
use crate::error::AppResult;

/// Parses the command line, merges the config file, and runs the selected
/// pipeline step on a single-threaded runtime.
///
/// # Errors
///
/// Returns the first fatal error of the run, or a mismatch error when the
/// compared files differ.
pub fn run() -> AppResult<()> {
    let matches = RoundtripArgs::command().get_matches();
    let mut args = RoundtripArgs::from_arg_matches(&matches)?;
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, &matches, &config)?;
    }

    crate::logger::init_logging(args.verbose, args.no_color);

    let command = args.command.unwrap_or(Command::Run);
    let settings = RunSettings::from_args(&args).inspect_err(|err| {
        tracing::error!("Invalid settings: {}", err);
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime
        .block_on(execute(command, &settings))
        .inspect_err(|err| tracing::error!("{} failed: {}", command, err))
}
