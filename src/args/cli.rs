use clap::{Parser, Subcommand};
use std::fmt;
use std::time::Duration;

use crate::metrics::{DEFAULT_BASE_NAME, Label};

use super::defaults::{
    DEFAULT_DIFF_PATH, DEFAULT_ENDPOINT, DEFAULT_INPUT_PATH, DEFAULT_ITEMS, DEFAULT_OUTPUT_PATH,
    DEFAULT_QUERY_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SEND_DELAY, DEFAULT_STARTUP_WAIT,
    DEFAULT_VALUE_BOUND,
};
use super::parsers::{
    parse_bounds, parse_delay_arg, parse_duration_arg, parse_label, parse_positive_u64,
    parse_positive_usize,
};
use super::types::{BoundList, PositiveU64, PositiveUsize};

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Write randomized metric lines to the input file
    Generate,
    /// Export every line of the input file to the collector over OTLP/gRPC
    Send,
    /// Rebuild every line of the input file from the query backend into the output file
    Query,
    /// Compare the input and output files and write a diff report
    Compare,
    /// Wait for the collector, then generate, send, query and compare
    Run,
}

impl Command {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Send => "send",
            Self::Query => "query",
            Self::Compare => "compare",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Round-trip synthetic OTLP metrics through a collector and a Prometheus-compatible backend, then diff what comes back.",
    next_help_heading = "Advanced Options"
)]
pub struct RoundtripArgs {
    /// Pipeline step to run (defaults to the full run)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (TOML or JSON). Defaults to ./roundtrip.toml or ./roundtrip.json
    #[arg(long = "config", help_heading = "Common Options")]
    pub config: Option<String>,

    /// Base metric name; the record index and a per-run suffix are appended
    #[arg(long = "metric-name", default_value = DEFAULT_BASE_NAME, help_heading = "Common Options")]
    pub metric_name: String,

    /// Number of records to generate
    #[arg(
        long = "items",
        short = 'n',
        default_value = DEFAULT_ITEMS,
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub items: PositiveUsize,

    /// Exclusive upper bound for generated integer values
    #[arg(long = "value-bound", default_value = DEFAULT_VALUE_BOUND, value_parser = parse_positive_u64)]
    pub value_bound: PositiveU64,

    /// Label catalog entry in 'key value' format (repeatable, up to 4; defaults to label1..label4)
    #[arg(long = "label", short = 'l', value_parser = parse_label)]
    pub labels: Vec<Label>,

    /// Histogram bounds and summary quantile levels, comma separated
    #[arg(long = "bounds", value_parser = parse_bounds)]
    pub bounds: Option<BoundList>,

    /// Collector OTLP gRPC endpoint (host:port or URL)
    #[arg(long = "endpoint", short = 'e', default_value = DEFAULT_ENDPOINT, help_heading = "Common Options")]
    pub endpoint: String,

    /// Instant-query URL ending in 'query='; series names are appended
    #[arg(long = "query-url", short = 'q', default_value = DEFAULT_QUERY_URL, help_heading = "Common Options")]
    pub query_url: String,

    /// Timeout for each export and query request (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Pause after every export (supports ms/s/m/h, 0 disables)
    #[arg(long = "send-delay", default_value = DEFAULT_SEND_DELAY, value_parser = parse_delay_arg)]
    pub send_delay: Duration,

    /// Time to wait for the collector before a full run (supports ms/s/m/h, 0 disables)
    #[arg(long = "startup-wait", default_value = DEFAULT_STARTUP_WAIT, value_parser = parse_delay_arg)]
    pub startup_wait: Duration,

    /// File the generated lines are written to and read from
    #[arg(long = "input", short = 'i', default_value = DEFAULT_INPUT_PATH, help_heading = "Common Options")]
    pub input: String,

    /// File the rebuilt lines are written to
    #[arg(long = "output", short = 'o', default_value = DEFAULT_OUTPUT_PATH, help_heading = "Common Options")]
    pub output: String,

    /// File the compare report is written to
    #[arg(long = "diff", default_value = DEFAULT_DIFF_PATH)]
    pub diff: String,

    /// Basic authentication for the query backend (username:password), or AWS credentials (access_key:secret_key)
    #[arg(long = "basic-auth", short = 'a')]
    pub basic_auth: Option<String>,

    /// AWS SigV4 signing params for the query backend (format: aws:amz:region:service)
    #[arg(long = "aws-sigv4")]
    pub aws_sigv4: Option<String>,

    /// AWS session token
    #[arg(long = "aws-session", env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub aws_session: Option<String>,

    /// AWS access key used for SigV4 when --basic-auth is not given
    #[arg(long = "aws-access-key", env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key: Option<String>,

    /// AWS secret key used for SigV4 when --basic-auth is not given
    #[arg(long = "aws-secret-key", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_key: Option<String>,

    /// Seed for the random generator (random when omitted)
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Enable debug logging (overridden by ROUNDTRIP_LOG or RUST_LOG)
    #[arg(long = "verbose", short = 'v', help_heading = "Common Options")]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
