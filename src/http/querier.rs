use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::timeout;
use url::Url;

use crate::error::{AppError, AppResult, HttpError, ValidationError};
use crate::metrics::QueryClient;

use super::auth::{AuthConfig, apply_auth_headers};
use super::client::build_query_client;

const QUERY_PARAMETER: &str = "query=";

/// Query-backend client that signs every GET with the configured auth.
#[derive(Debug, Clone)]
pub struct SignedQueryClient {
    client: reqwest::Client,
    auth: Option<AuthConfig>,
    request_timeout: Duration,
}

impl SignedQueryClient {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(request_timeout: Duration, auth: Option<AuthConfig>) -> AppResult<Self> {
        let client = build_query_client(request_timeout).map_err(AppError::http)?;
        Ok(Self {
            client,
            auth,
            request_timeout,
        })
    }
}

#[async_trait]
impl QueryClient for SignedQueryClient {
    async fn fetch_json(&self, url: &str) -> Result<String, HttpError> {
        let parsed = Url::parse(url).map_err(|source| HttpError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;
        let mut builder = self.client.get(parsed.clone());
        if let Some(auth) = self.auth.as_ref() {
            builder = apply_auth_headers(builder, &parsed, auth)?;
        }

        let exchange = async {
            let response = builder
                .send()
                .await
                .map_err(|source| HttpError::RequestFailed {
                    url: url.to_owned(),
                    source,
                })?;
            if response.status() != StatusCode::OK {
                return Err(HttpError::UnexpectedStatus {
                    url: url.to_owned(),
                    status: response.status().as_u16(),
                });
            }
            response.text().await.map_err(|source| HttpError::ReadBody {
                url: url.to_owned(),
                source,
            })
        };

        timeout(self.request_timeout, exchange)
            .await
            .map_err(|_elapsed| HttpError::RequestTimeout {
                url: url.to_owned(),
                timeout_ms: self.request_timeout.as_millis(),
            })?
    }
}

/// Checks that `url` is an absolute URL ending in `query=`, so series names
/// can be appended verbatim.
///
/// # Errors
///
/// Returns an error when the URL does not parse, has no host, or does not end
/// in a `query=` parameter.
pub fn validate_query_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url).map_err(|source| ValidationError::InvalidUrl {
        url: url.to_owned(),
        source,
    })?;
    if parsed.host_str().is_none() {
        return Err(ValidationError::UrlMissingHost);
    }
    if !url.ends_with(QUERY_PARAMETER) {
        return Err(ValidationError::QueryUrlMissingParameter {
            url: url.to_owned(),
        });
    }
    Ok(())
}
