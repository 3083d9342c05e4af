use std::time::Duration;

use serde::Deserialize;

use crate::args::{BoundList, parse_duration_value};
use crate::error::{AppError, AppResult, ConfigError};

/// On-disk settings; every field mirrors a CLI flag of the same name.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub metric_name: Option<String>,
    pub items: Option<usize>,
    pub value_bound: Option<u64>,
    /// Catalog entries in `key value` form.
    pub labels: Option<Vec<String>>,
    pub bounds: Option<BoundList>,
    pub endpoint: Option<String>,
    pub query_url: Option<String>,
    pub timeout: Option<DurationValue>,
    pub send_delay: Option<DurationValue>,
    pub startup_wait: Option<DurationValue>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub diff: Option<String>,
    pub basic_auth: Option<String>,
    pub aws_sigv4: Option<String>,
    pub aws_session: Option<String>,
    pub seed: Option<u64>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Either a bare number of seconds or a string with a unit (`250ms`, `2m`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str, allow_zero: bool) -> AppResult<Duration> {
        let parsed = match self {
            DurationValue::Seconds(secs) => parse_duration_value(&secs.to_string(), allow_zero),
            DurationValue::Text(text) => parse_duration_value(text, allow_zero),
        };
        parsed.map_err(|source| AppError::config(ConfigError::InvalidDuration { field, source }))
    }
}
