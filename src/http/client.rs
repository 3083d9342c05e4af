use std::time::Duration;

use crate::error::HttpError;

/// Plain HTTP/1.1 client for the query backend.
pub(super) fn build_query_client(connect_timeout: Duration) -> Result<reqwest::Client, HttpError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .tcp_nodelay(true)
        .build()
        .map_err(|source| HttpError::BuildClientFailed { source })
}

/// HTTP/2 prior-knowledge client for OTLP gRPC; one connection carries every
/// export of a run.
pub(super) fn build_grpc_client(connect_timeout: Duration) -> Result<reqwest::Client, HttpError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .http2_prior_knowledge()
        .http2_adaptive_window(true)
        .tcp_nodelay(true)
        .build()
        .map_err(|source| HttpError::BuildClientFailed { source })
}
