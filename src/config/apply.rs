use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, RoundtripArgs, parse_label};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Flags given explicitly on
/// the command line win over the file.
///
/// # Errors
///
/// Returns an error when a config value is out of range or malformed.
pub fn apply_config(
    args: &mut RoundtripArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "metric_name")
        && let Some(name) = config.metric_name.clone()
    {
        args.metric_name = name;
    }

    if !is_cli(matches, "items")
        && let Some(items) = config.items
    {
        args.items = PositiveUsize::try_from(items).map_err(|err| positive_error("items", err))?;
    }

    if !is_cli(matches, "value_bound")
        && let Some(bound) = config.value_bound
    {
        args.value_bound =
            PositiveU64::try_from(bound).map_err(|err| positive_error("value_bound", err))?;
    }

    if !is_cli(matches, "labels")
        && let Some(labels) = config.labels.as_ref()
    {
        let mut parsed = Vec::with_capacity(labels.len());
        for label in labels {
            parsed.push(
                parse_label(label)
                    .map_err(|source| AppError::config(ConfigError::InvalidLabel { source }))?,
            );
        }
        args.labels = parsed;
    }

    if !is_cli(matches, "bounds")
        && let Some(bounds) = config.bounds.clone()
    {
        args.bounds = Some(bounds);
    }

    if !is_cli(matches, "endpoint")
        && let Some(endpoint) = config.endpoint.clone()
    {
        args.endpoint = endpoint;
    }

    if !is_cli(matches, "query_url")
        && let Some(url) = config.query_url.clone()
    {
        args.query_url = url;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration("timeout", false)?;
    }

    if !is_cli(matches, "send_delay")
        && let Some(delay) = config.send_delay.as_ref()
    {
        args.send_delay = delay.to_duration("send_delay", true)?;
    }

    if !is_cli(matches, "startup_wait")
        && let Some(wait) = config.startup_wait.as_ref()
    {
        args.startup_wait = wait.to_duration("startup_wait", true)?;
    }

    apply_paths(args, matches, config);
    apply_auth(args, matches, config);

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn apply_paths(args: &mut RoundtripArgs, matches: &ArgMatches, config: &ConfigFile) {
    if !is_cli(matches, "input")
        && let Some(path) = config.input.clone()
    {
        args.input = path;
    }
    if !is_cli(matches, "output")
        && let Some(path) = config.output.clone()
    {
        args.output = path;
    }
    if !is_cli(matches, "diff")
        && let Some(path) = config.diff.clone()
    {
        args.diff = path;
    }
}

fn apply_auth(args: &mut RoundtripArgs, matches: &ArgMatches, config: &ConfigFile) {
    if !is_cli(matches, "basic_auth")
        && let Some(basic) = config.basic_auth.clone()
    {
        args.basic_auth = Some(basic);
    }
    if !is_cli(matches, "aws_sigv4")
        && let Some(sigv4) = config.aws_sigv4.clone()
    {
        args.aws_sigv4 = Some(sigv4);
    }
    if !is_cli(matches, "aws_session")
        && let Some(session) = config.aws_session.clone()
    {
        args.aws_session = Some(session);
    }
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn positive_error(field: &str, source: crate::error::ValidationError) -> AppError {
    AppError::config(ConfigError::FieldMustBePositive {
        field: field.to_owned(),
        source,
    })
}
