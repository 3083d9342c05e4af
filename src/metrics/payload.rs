//! Conversion of decoded records into OTLP export messages.
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::common::v1::{AnyValue, InstrumentationScope, KeyValue, any_value};
use opentelemetry_proto::tonic::metrics::v1::{
    AggregationTemporality, Histogram, HistogramDataPoint, Metric, NumberDataPoint,
    ResourceMetrics, ScopeMetrics, Sum, Summary, SummaryDataPoint, metric::Data,
    number_data_point, summary_data_point::ValueAtQuantile,
};

use crate::error::CodecError;

use super::catalog::FixtureCatalog;
use super::types::{Label, MetricKind, MetricRecord, MetricValues};

const SCOPE_NAME: &str = env!("CARGO_PKG_NAME");
const SCOPE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data point family a kind is exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportType {
    /// Non-monotonic integer sum; the remote-write exporter turns it into a
    /// plain gauge series under the metric's own name.
    Int64,
    Histogram,
    Summary,
}

/// Export type and temporality for every kind.
#[must_use]
pub const fn export_descriptor(kind: MetricKind) -> (ExportType, AggregationTemporality) {
    match kind {
        MetricKind::Counter | MetricKind::Gauge => {
            (ExportType::Int64, AggregationTemporality::Cumulative)
        }
        MetricKind::Histogram => (ExportType::Histogram, AggregationTemporality::Cumulative),
        MetricKind::Summary => (ExportType::Summary, AggregationTemporality::Cumulative),
    }
}

/// Builds OTLP metrics against the catalog's bound list.
#[derive(Debug, Clone, Copy)]
pub struct PayloadBuilder<'catalog> {
    catalog: &'catalog FixtureCatalog,
}

impl<'catalog> PayloadBuilder<'catalog> {
    #[must_use]
    pub const fn new(catalog: &'catalog FixtureCatalog) -> Self {
        Self { catalog }
    }

    /// Builds the metric stamped with the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidRecordShape`] when the values do not fit
    /// the record's kind or the catalog's bound list.
    pub fn build(&self, record: &MetricRecord) -> Result<Metric, CodecError> {
        self.build_at(record, now_unix_nanos())
    }

    /// Builds the metric stamped with `time_unix_nano`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidRecordShape`] when the values do not fit
    /// the record's kind or the catalog's bound list.
    pub fn build_at(&self, record: &MetricRecord, time_unix_nano: u64) -> Result<Metric, CodecError> {
        if !record.values.fits(record.kind) {
            return Err(shape_error(record, "values do not match the metric kind"));
        }
        let attributes = attributes(&record.labels);
        let (export_type, temporality) = export_descriptor(record.kind);

        let data = match (export_type, &record.values) {
            (ExportType::Int64, MetricValues::Scalar(value)) => Data::Sum(Sum {
                data_points: vec![NumberDataPoint {
                    attributes,
                    time_unix_nano,
                    value: Some(number_data_point::Value::AsInt(scalar_to_int(*value))),
                    ..Default::default()
                }],
                aggregation_temporality: temporality as i32,
                is_monotonic: false,
            }),
            (
                ExportType::Histogram,
                MetricValues::Histogram {
                    sum,
                    count,
                    buckets,
                },
            ) => {
                if buckets.len() != self.catalog.bounds().len() {
                    return Err(shape_error(record, "bucket count differs from bound list"));
                }
                // Simplification: per-bucket counts, one per bound with no overflow bucket,
                // where OTLP expects bounds + 1 and backends report cumulative `le` series.
                Data::Histogram(Histogram {
                    data_points: vec![HistogramDataPoint {
                        attributes,
                        time_unix_nano,
                        count: *count,
                        sum: Some(unsigned_to_float(*sum)),
                        bucket_counts: buckets.clone(),
                        explicit_bounds: self.catalog.bounds().to_vec(),
                        ..Default::default()
                    }],
                    aggregation_temporality: temporality as i32,
                })
            }
            (
                ExportType::Summary,
                MetricValues::Summary {
                    sum,
                    count,
                    quantiles,
                },
            ) => {
                if quantiles.len() != self.catalog.bounds().len() {
                    return Err(shape_error(record, "quantile count differs from bound list"));
                }
                let quantile_values = self
                    .catalog
                    .bounds()
                    .iter()
                    .zip(quantiles)
                    .map(|(quantile, value)| ValueAtQuantile {
                        quantile: *quantile,
                        value: *value,
                    })
                    .collect();
                Data::Summary(Summary {
                    data_points: vec![SummaryDataPoint {
                        attributes,
                        time_unix_nano,
                        count: float_to_count(*count),
                        sum: *sum,
                        quantile_values,
                        ..Default::default()
                    }],
                })
            }
            (
                ExportType::Int64,
                MetricValues::Histogram { .. } | MetricValues::Summary { .. },
            )
            | (ExportType::Histogram, MetricValues::Scalar(_) | MetricValues::Summary { .. })
            | (ExportType::Summary, MetricValues::Scalar(_) | MetricValues::Histogram { .. }) => {
                return Err(shape_error(record, "values do not match the export type"));
            }
        };

        Ok(Metric {
            name: record.name.clone(),
            data: Some(data),
            ..Default::default()
        })
    }
}

/// Wraps one metric in the resource/scope envelope the collector expects.
#[must_use]
pub fn export_request(metric: Metric) -> ExportMetricsServiceRequest {
    ExportMetricsServiceRequest {
        resource_metrics: vec![ResourceMetrics {
            scope_metrics: vec![ScopeMetrics {
                scope: Some(InstrumentationScope {
                    name: SCOPE_NAME.to_owned(),
                    version: SCOPE_VERSION.to_owned(),
                    ..Default::default()
                }),
                metrics: vec![metric],
                ..Default::default()
            }],
            ..Default::default()
        }],
    }
}

fn attributes(labels: &[Label]) -> Vec<KeyValue> {
    labels
        .iter()
        .map(|label| KeyValue {
            key: label.key.clone(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(label.value.clone())),
            }),
        })
        .collect()
}

fn shape_error(record: &MetricRecord, detail: &'static str) -> CodecError {
    CodecError::InvalidRecordShape {
        name: record.name.clone(),
        kind: record.kind,
        detail,
    }
}

fn now_unix_nanos() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .unwrap_or(0)
}

// Float to int `as` casts saturate, which is the truncation the line format
// already implies for scalar values.
const fn scalar_to_int(value: f64) -> i64 {
    value as i64
}

const fn float_to_count(value: f64) -> u64 {
    value as u64
}

const fn unsigned_to_float(value: u64) -> f64 {
    value as f64
}
