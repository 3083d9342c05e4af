use clap::Parser;

use crate::error::{AppError, AppResult};

use super::RoundtripArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<RoundtripArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    RoundtripArgs::try_parse_from(args).map_err(AppError::from)
}
