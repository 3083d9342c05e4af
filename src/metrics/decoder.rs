use crate::error::CodecError;

use super::catalog::{FIELD_DELIMITER, FixtureCatalog, MAX_LABELS};
use super::types::{Label, MetricKind, MetricRecord, MetricValues};

/// Result of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Record(MetricRecord),
    /// The line names a metric type this build does not know; callers log
    /// and move on.
    Skipped { name: String, kind: String },
}

/// Parses one line of the flat format.
///
/// # Errors
///
/// Returns [`CodecError::MalformedLine`] when the line does not hold exactly
/// four fields, [`CodecError::MalformedLabels`] for an odd number of label
/// tokens, [`CodecError::LabelCount`] for no labels or more than
/// [`MAX_LABELS`] pairs, [`CodecError::NumericParse`] for any non-numeric
/// value token and [`CodecError::ValueArity`] when a histogram or summary
/// block does not hold `2 + bounds` values.
pub fn decode_line(line: &str, catalog: &FixtureCatalog) -> Result<Decoded, CodecError> {
    let trimmed = line.trim();
    let fields: Vec<&str> = trimmed.split(FIELD_DELIMITER).collect();
    let [name, kind, labels, values] = fields.as_slice() else {
        return Err(CodecError::MalformedLine {
            line: trimmed.to_owned(),
            found: fields.len(),
        });
    };

    let name = name.trim();
    let kind_name = kind.trim();
    let Some(kind) = MetricKind::parse(kind_name) else {
        tracing::warn!("Skipping '{}': unknown metric type '{}'.", name, kind_name);
        return Ok(Decoded::Skipped {
            name: name.to_owned(),
            kind: kind_name.to_owned(),
        });
    };

    let labels = decode_labels(labels)?;
    let values = decode_values(kind, values, catalog)?;
    Ok(Decoded::Record(MetricRecord {
        name: name.to_owned(),
        kind,
        labels,
        values,
    }))
}

fn decode_labels(block: &str) -> Result<Vec<Label>, CodecError> {
    let mut tokens = block.split_whitespace();
    let mut labels = Vec::new();
    while let Some(key) = tokens.next() {
        let value = tokens.next().ok_or_else(|| CodecError::MalformedLabels {
            labels: block.trim().to_owned(),
        })?;
        labels.push(Label::new(key, value));
    }
    if labels.is_empty() || labels.len() > MAX_LABELS {
        return Err(CodecError::LabelCount {
            labels: block.trim().to_owned(),
            found: labels.len(),
            max: MAX_LABELS,
        });
    }
    Ok(labels)
}

fn decode_values(
    kind: MetricKind,
    block: &str,
    catalog: &FixtureCatalog,
) -> Result<MetricValues, CodecError> {
    match kind {
        MetricKind::Counter | MetricKind::Gauge => Ok(MetricValues::Scalar(parse_number(block)?)),
        MetricKind::Histogram => {
            let numbers = block
                .split_whitespace()
                .map(parse_unsigned)
                .collect::<Result<Vec<u64>, CodecError>>()?;
            let (sum, count, buckets) = split_distribution(kind, &numbers, catalog)?;
            Ok(MetricValues::Histogram {
                sum,
                count,
                buckets,
            })
        }
        MetricKind::Summary => {
            let numbers = block
                .split_whitespace()
                .map(parse_number)
                .collect::<Result<Vec<f64>, CodecError>>()?;
            let (sum, count, quantiles) = split_distribution(kind, &numbers, catalog)?;
            Ok(MetricValues::Summary {
                sum,
                count,
                quantiles,
            })
        }
    }
}

/// Splits `[sum, count, v0, v1, ...]` after checking its length.
fn split_distribution<T: Copy>(
    kind: MetricKind,
    numbers: &[T],
    catalog: &FixtureCatalog,
) -> Result<(T, T, Vec<T>), CodecError> {
    let expected = catalog.distribution_arity();
    let arity_error = |found: usize| CodecError::ValueArity {
        kind,
        expected,
        found,
    };
    if numbers.len() != expected {
        return Err(arity_error(numbers.len()));
    }
    match numbers.split_first() {
        Some((sum, rest)) => match rest.split_first() {
            Some((count, tail)) => Ok((*sum, *count, tail.to_vec())),
            None => Err(arity_error(numbers.len())),
        },
        None => Err(arity_error(numbers.len())),
    }
}

/// Parses a float, tolerating surrounding `[` / `]`.
pub(crate) fn parse_number(token: &str) -> Result<f64, CodecError> {
    let cleaned = token.replace(['[', ']'], " ");
    let cleaned = cleaned.trim();
    cleaned
        .parse::<f64>()
        .map_err(|err| CodecError::NumericParse {
            token: token.trim().to_owned(),
            source: Box::new(err),
        })
}

fn parse_unsigned(token: &str) -> Result<u64, CodecError> {
    token.parse::<u64>().map_err(|err| CodecError::NumericParse {
        token: token.to_owned(),
        source: Box::new(err),
    })
}
