use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to reach collector at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Collector rejected export with HTTP status {status}.")]
    HttpStatus { status: u16 },
    #[error("Collector rejected export with grpc-status {code}: {message}")]
    GrpcStatus { code: String, message: String },
    #[error("Export to {url} timed out after {timeout_ms} ms.")]
    Timeout { url: String, timeout_ms: u128 },
}
