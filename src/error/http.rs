use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} timed out after {timeout_ms} ms.")]
    RequestTimeout { url: String, timeout_ms: u128 },
    #[error("Request to {url} returned non-200 status {status}.")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("Failed to read response body from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build sigv4 params: {source}")]
    SigV4Params {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to build sigv4 request: {source}")]
    SigV4Request {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to sign request: {source}")]
    SigV4Sign {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to build sign request: {source}")]
    SigV4BuildSign {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
