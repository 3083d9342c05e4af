use thiserror::Error;

use super::{
    CodecError, ConfigError, ExportError, HttpError, PipelineError, QueryError, ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }

    pub fn pipeline<E>(error: E) -> Self
    where
        E: Into<PipelineError>,
    {
        error.into().into()
    }
}
