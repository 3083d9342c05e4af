use thiserror::Error;

use super::HttpError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query for '{series}' failed: {source}")]
    Request {
        series: String,
        #[source]
        source: HttpError,
    },
    #[error("Query for '{series}' returned malformed JSON: {source}")]
    Json {
        series: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Query for '{series}' returned status '{status}' ({detail}).")]
    Status {
        series: String,
        status: String,
        detail: String,
    },
    #[error("Query for '{series}' returned no results.")]
    EmptyResult { series: String },
}
