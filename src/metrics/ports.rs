//! Seams between the fixture core and the network adapters.
use std::time::Duration;

use async_trait::async_trait;
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;

use crate::error::{ExportError, HttpError};

/// Delivers one export request to the collector.
#[async_trait]
pub trait MetricSender: Send + Sync {
    /// Sends `request`, giving up after `deadline`.
    ///
    /// # Errors
    ///
    /// Returns an error when the collector cannot be reached, rejects the
    /// request, or does not answer within `deadline`.
    async fn send(
        &self,
        request: ExportMetricsServiceRequest,
        deadline: Duration,
    ) -> Result<(), ExportError>;
}

/// Fetches a query-backend document for a fully formed URL.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Returns the response body of a successful GET on `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, or a non-200 status.
    async fn fetch_json(&self, url: &str) -> Result<String, HttpError>;
}
