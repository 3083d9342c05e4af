//! Synthetic metric records: line encoding, decoding, OTLP payload building
//! and reconstruction from query-backend responses.
mod catalog;
mod decoder;
mod encoder;
mod normalize;
mod payload;
mod ports;
mod random;
mod types;


pub use catalog::{
    DEFAULT_BASE_NAME, DEFAULT_BOUNDS, DEFAULT_LABELS, DEFAULT_VALUE_BOUND, FIELD_DELIMITER,
    FixtureCatalog, MAX_LABELS, SUBFIELD_DELIMITER, default_labels,
};
pub use decoder::{Decoded, decode_line};
pub use encoder::{Encoder, encode_line, format_quantile};
pub use normalize::{
    NormalizedLine, QueryGap, QuerySample, ResponseNormalizer, parse_query_response,
};
pub use payload::{ExportType, PayloadBuilder, export_descriptor, export_request};
pub use ports::{MetricSender, QueryClient};
pub use random::{RandomSource, SeededRandom};
pub use types::{Label, MetricKind, MetricRecord, MetricValues, RecordKey};
