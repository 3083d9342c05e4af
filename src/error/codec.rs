use thiserror::Error;

use crate::metrics::MetricKind;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed line '{line}': expected 4 fields, found {found}.")]
    MalformedLine { line: String, found: usize },
    #[error("Malformed labels '{labels}': keys and values must come in pairs.")]
    MalformedLabels { labels: String },
    #[error("Invalid numeric value '{token}': {source}")]
    NumericParse {
        token: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Label block '{labels}' holds {found} pairs; expected 1 to {max}.")]
    LabelCount {
        labels: String,
        found: usize,
        max: usize,
    },
    #[error("{kind} value block must hold {expected} numbers, found {found}.")]
    ValueArity {
        kind: MetricKind,
        expected: usize,
        found: usize,
    },
    #[error("Record '{name}' of kind {kind} carries an inconsistent value shape: {detail}")]
    InvalidRecordShape {
        name: String,
        kind: MetricKind,
        detail: &'static str,
    },
}
