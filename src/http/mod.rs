//! Network adapters: OTLP/gRPC export to the collector and authenticated
//! instant queries against the backend.
mod auth;
mod client;
mod exporter;
mod querier;


pub use auth::{AuthConfig, resolve_auth};
pub use exporter::{EXPORT_PATH, GrpcMetricSender};
pub use querier::{SignedQueryClient, validate_query_url};
