use std::time::Duration;

use async_trait::async_trait;
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use prost::Message;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tokio::time::timeout;
use url::Url;

use crate::error::{AppError, AppResult, ExportError, ValidationError};
use crate::metrics::MetricSender;

use super::client::build_grpc_client;

/// gRPC method path of the OTLP metrics service.
pub const EXPORT_PATH: &str = "/opentelemetry.proto.collector.metrics.v1.MetricsService/Export";
const GRPC_STATUS: &str = "grpc-status";
const GRPC_MESSAGE: &str = "grpc-message";
const GRPC_OK: &str = "0";

/// Sends OTLP export requests to a collector over gRPC.
#[derive(Debug, Clone)]
pub struct GrpcMetricSender {
    client: reqwest::Client,
    url: Url,
}

impl GrpcMetricSender {
    /// `endpoint` is `host:port` or a full `http://host:port` URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is not a valid URL or the HTTP/2
    /// client cannot be built.
    pub fn new(endpoint: &str, connect_timeout: Duration) -> AppResult<Self> {
        let url = export_url(endpoint).map_err(AppError::validation)?;
        let client = build_grpc_client(connect_timeout).map_err(AppError::http)?;
        Ok(Self { client, url })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl MetricSender for GrpcMetricSender {
    async fn send(
        &self,
        request: ExportMetricsServiceRequest,
        deadline: Duration,
    ) -> Result<(), ExportError> {
        let body = grpc_frame(&request.encode_to_vec());
        let exchange = async {
            let response = self
                .client
                .post(self.url.clone())
                .header(CONTENT_TYPE, "application/grpc")
                .header("te", "trailers")
                .body(body)
                .send()
                .await
                .map_err(|source| ExportError::Transport {
                    url: self.url.to_string(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ExportError::HttpStatus {
                    status: status.as_u16(),
                });
            }
            grpc_status(response.headers())?;
            // Drain the reply so the stream completes on the shared connection.
            response
                .bytes()
                .await
                .map_err(|source| ExportError::Transport {
                    url: self.url.to_string(),
                    source,
                })?;
            Ok(())
        };

        timeout(deadline, exchange)
            .await
            .map_err(|_elapsed| ExportError::Timeout {
                url: self.url.to_string(),
                timeout_ms: deadline.as_millis(),
            })?
    }
}

pub(crate) fn export_url(endpoint: &str) -> Result<Url, ValidationError> {
    let endpoint = endpoint.trim();
    let base = if endpoint.contains("://") {
        endpoint.to_owned()
    } else {
        format!("http://{}", endpoint)
    };
    let mut url = Url::parse(&base).map_err(|source| ValidationError::InvalidUrl {
        url: endpoint.to_owned(),
        source,
    })?;
    if url.host_str().is_none() {
        return Err(ValidationError::UrlMissingHost);
    }
    url.set_path(EXPORT_PATH);
    Ok(url)
}

/// Length-prefixed gRPC message: compression flag, big-endian length, payload.
pub(crate) fn grpc_frame(payload: &[u8]) -> Vec<u8> {
    let payload_len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    let mut framed = Vec::with_capacity(payload.len().saturating_add(5));
    framed.push(0);
    framed.extend_from_slice(&payload_len.to_be_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Trailers-only error replies carry `grpc-status` in the headers.
fn grpc_status(headers: &HeaderMap) -> Result<(), ExportError> {
    let Some(raw) = headers.get(GRPC_STATUS) else {
        return Ok(());
    };
    let code = raw.to_str().unwrap_or("unreadable").trim();
    if code == GRPC_OK {
        return Ok(());
    }
    let message = headers
        .get(GRPC_MESSAGE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    Err(ExportError::GrpcStatus {
        code: code.to_owned(),
        message: message.to_owned(),
    })
}
