/// Host and port of the collector's OTLP gRPC receiver.
pub const DEFAULT_ENDPOINT: &str = "localhost:55680";
/// Instant-query endpoint of the Prometheus-compatible backend, up to `query=`.
pub const DEFAULT_QUERY_URL: &str = "http://localhost:9009/prometheus/api/v1/query?query=";

pub const DEFAULT_INPUT_PATH: &str = "test/data.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "test/ans.txt";
pub const DEFAULT_DIFF_PATH: &str = "test/diff.txt";

pub(crate) const DEFAULT_ITEMS: &str = "50";
pub(crate) const DEFAULT_VALUE_BOUND: &str = "5000";
pub(crate) const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub(crate) const DEFAULT_SEND_DELAY: &str = "1s";
pub(crate) const DEFAULT_STARTUP_WAIT: &str = "10s";
