use std::path::PathBuf;

use thiserror::Error;

use super::{CodecError, ExportError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to create '{path}': {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line_number} of '{path}' could not be decoded: {source}")]
    Decode {
        path: PathBuf,
        line_number: usize,
        #[source]
        source: CodecError,
    },
    #[error("Failed to build payload for '{name}': {source}")]
    Build {
        name: String,
        #[source]
        source: CodecError,
    },
    #[error("Failed to send '{name}': {source}")]
    Send {
        name: String,
        #[source]
        source: ExportError,
    },
    #[error("{mismatched} of {total} lines differ between expected and actual output.")]
    Mismatch { mismatched: usize, total: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
