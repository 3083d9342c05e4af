use std::time::Duration;

use super::types::{BoundList, PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};
use crate::metrics::Label;

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

/// Parses one catalog entry written as `key value`.
pub(crate) fn parse_label(s: &str) -> Result<Label, ValidationError> {
    let mut parts = s.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => {
            if key.contains(',') || value.contains(',') {
                return Err(ValidationError::LabelReservedCharacter {
                    value: s.trim().to_owned(),
                });
            }
            Ok(Label::new(key, value))
        }
        _ => Err(ValidationError::InvalidLabelFormat {
            value: s.to_owned(),
        }),
    }
}

/// Parses a comma separated bound list such as `0.01,0.5,0.99`.
pub(crate) fn parse_bounds(s: &str) -> Result<BoundList, ValidationError> {
    let mut bounds = Vec::new();
    for raw in s.split(',').map(str::trim).filter(|raw| !raw.is_empty()) {
        let value: f64 = raw.parse().map_err(|err| ValidationError::InvalidBound {
            value: raw.to_owned(),
            source: err,
        })?;
        if !value.is_finite() {
            return Err(ValidationError::BoundNotFinite { value });
        }
        bounds.push(value);
    }
    if bounds.is_empty() {
        return Err(ValidationError::BoundsEmpty);
    }
    Ok(BoundList::new(bounds))
}

/// Parses a positive duration with an optional `ms`/`s`/`m`/`h` unit
/// (seconds when omitted).
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s, false).map_err(AppError::from)
}

/// Like [`parse_duration_arg`] but accepts `0`, which disables the wait.
pub(crate) fn parse_delay_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s, true).map_err(AppError::from)
}

pub(crate) fn parse_duration_value(s: &str, allow_zero: bool) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => number
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow)?,
        "h" => number
            .checked_mul(3600)
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow)?,
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    if duration.is_zero() && !allow_zero {
        return Err(ValidationError::DurationZero);
    }
    Ok(duration)
}
