mod app;
mod codec;
mod config;
mod export;
mod http;
mod pipeline;
mod query;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use codec::CodecError;
pub use config::ConfigError;
pub use export::ExportError;
pub use http::HttpError;
pub use pipeline::PipelineError;
pub use query::QueryError;
pub use validation::ValidationError;
