use std::time::Duration;

use super::parsers::{parse_delay_arg, parse_duration_arg};
use super::test_support::parse_test_args;
use super::*;
use crate::error::{AppError, AppResult, ValidationError};
use crate::metrics::Label;

#[test]
fn defaults_match_fixture_constants() -> AppResult<()> {
    let args = parse_test_args(["metrics-roundtrip"])?;
    if args.command.is_some() {
        return Err(AppError::validation("Expected no subcommand"));
    }
    if args.items.get() != 50 || args.value_bound.get() != 5000 {
        return Err(AppError::validation("Unexpected item count or value bound"));
    }
    if args.metric_name != "metricName" || args.endpoint != DEFAULT_ENDPOINT {
        return Err(AppError::validation("Unexpected metric name or endpoint"));
    }
    if args.request_timeout != Duration::from_secs(30)
        || args.send_delay != Duration::from_secs(1)
        || args.startup_wait != Duration::from_secs(10)
    {
        return Err(AppError::validation("Unexpected default durations"));
    }
    if args.input != DEFAULT_INPUT_PATH
        || args.output != DEFAULT_OUTPUT_PATH
        || args.diff != DEFAULT_DIFF_PATH
    {
        return Err(AppError::validation("Unexpected default paths"));
    }
    if !args.labels.is_empty() || args.bounds.is_some() {
        return Err(AppError::validation("Catalog overrides should be unset"));
    }
    Ok(())
}

#[test]
fn parse_subcommands() -> AppResult<()> {
    let cases = [
        ("generate", Command::Generate),
        ("send", Command::Send),
        ("query", Command::Query),
        ("compare", Command::Compare),
        ("run", Command::Run),
    ];
    for (name, expected) in cases {
        let args = parse_test_args(["metrics-roundtrip", name])?;
        if args.command != Some(expected) {
            return Err(AppError::validation(format!(
                "Unexpected command for {}: {:?}",
                name, args.command
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_catalog_overrides() -> AppResult<()> {
    let args = parse_test_args([
        "metrics-roundtrip",
        "--label",
        "env prod",
        "-l",
        "region eu",
        "--bounds",
        "0.1, 0.9",
        "--metric-name",
        "probe",
        "-n",
        "7",
    ])?;
    if args.labels != [Label::new("env", "prod"), Label::new("region", "eu")] {
        return Err(AppError::validation(format!(
            "Unexpected labels: {:?}",
            args.labels
        )));
    }
    let bounds = args
        .bounds
        .ok_or_else(|| AppError::validation("Expected bounds"))?;
    if bounds.as_slice() != [0.1, 0.9] {
        return Err(AppError::validation(format!(
            "Unexpected bounds: {:?}",
            bounds
        )));
    }
    if args.metric_name != "probe" || args.items.get() != 7 {
        return Err(AppError::validation("Unexpected name or item count"));
    }
    Ok(())
}

#[test]
fn parse_rejects_invalid_values() -> AppResult<()> {
    let cases: [&[&str]; 5] = [
        &["metrics-roundtrip", "--items", "0"],
        &["metrics-roundtrip", "--label", "only-key"],
        &["metrics-roundtrip", "--label", "a b c"],
        &["metrics-roundtrip", "--bounds", "0.5,inf"],
        &["metrics-roundtrip", "--timeout", "0"],
    ];
    for case in cases {
        if parse_test_args(case.iter().copied()).is_ok() {
            return Err(AppError::validation(format!(
                "Expected parse failure for {:?}",
                case
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_durations_with_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("5", Duration::from_secs(5)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (raw, expected) in cases {
        let parsed = parse_duration_arg(raw)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Unexpected duration for {}: {:?}",
                raw, parsed
            )));
        }
    }
    match parse_duration_arg("10d") {
        Err(AppError::Validation(ValidationError::InvalidDurationUnit { unit })) if unit == "d" => {}
        other => {
            return Err(AppError::validation(format!(
                "Expected unit error, got {:?}",
                other
            )));
        }
    }
    if parse_delay_arg("0")? != Duration::ZERO {
        return Err(AppError::validation("Zero delay should be accepted"));
    }
    Ok(())
}

#[test]
fn parse_auth_flags() -> AppResult<()> {
    let args = parse_test_args([
        "metrics-roundtrip",
        "--aws-sigv4",
        "aws:amz:us-west-2:aps",
        "--basic-auth",
        "AKID:SECRET",
        "query",
    ])?;
    if args.aws_sigv4.as_deref() != Some("aws:amz:us-west-2:aps")
        || args.basic_auth.as_deref() != Some("AKID:SECRET")
    {
        return Err(AppError::validation("Unexpected auth flags"));
    }
    Ok(())
}
