//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use cli::{Command, RoundtripArgs};
pub use defaults::{
    DEFAULT_DIFF_PATH, DEFAULT_ENDPOINT, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH,
    DEFAULT_QUERY_URL,
};
pub use types::{BoundList, PositiveU64, PositiveUsize};

pub(crate) use parsers::{parse_duration_value, parse_label};
