//! Rebuilds flat-format lines from Prometheus instant-query responses.
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::QueryError;

use super::catalog::FIELD_DELIMITER;
use super::decoder::parse_number;
use super::encoder::{format_quantile, push_joined, push_labels};
use super::ports::QueryClient;
use super::types::{MetricKind, RecordKey};

const NAME_LABEL: &str = "__name__";
const BUCKET_LABEL: &str = "le";
const QUANTILE_LABEL: &str = "quantile";
const INFINITE_BOUND: &str = "+Inf";
const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<QuerySample>,
}

/// One series of an instant-query vector result.
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySample {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    value: (serde_json::Value, String),
}

impl QuerySample {
    /// Series labels without the metric name, ordered by key.
    fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metric
            .iter()
            .filter(|(key, _)| key.as_str() != NAME_LABEL)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn series_name(&self) -> Option<&str> {
        self.metric.get(NAME_LABEL).map(String::as_str)
    }

    fn value_text(&self) -> &str {
        &self.value.1
    }

    fn is_infinite_bucket(&self) -> bool {
        self.metric.get(BUCKET_LABEL).map(String::as_str) == Some(INFINITE_BOUND)
    }

    /// Numeric value of the `le` / `quantile` label; unlabeled series sort last.
    fn bound(&self, label: &str) -> f64 {
        self.metric
            .get(label)
            .and_then(|raw| parse_number(raw).ok())
            .unwrap_or(f64::INFINITY)
    }
}

/// Parses a query response and requires a successful, non-empty result.
///
/// # Errors
///
/// Returns an error for malformed JSON, a non-success status, or an empty
/// result vector.
pub fn parse_query_response(series: &str, body: &str) -> Result<Vec<QuerySample>, QueryError> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|err| QueryError::Json {
            series: series.to_owned(),
            source: err,
        })?;
    if response.status != SUCCESS_STATUS {
        return Err(QueryError::Status {
            series: series.to_owned(),
            status: response.status,
            detail: response.error.unwrap_or_else(|| "no error detail".to_owned()),
        });
    }
    let samples = response.data.map(|data| data.result).unwrap_or_default();
    if samples.is_empty() {
        return Err(QueryError::EmptyResult {
            series: series.to_owned(),
        });
    }
    Ok(samples)
}

/// A sub-query that failed while a line was being rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryGap {
    pub series: String,
    pub reason: String,
}

/// A rebuilt line plus the sub-queries that could not be answered.
///
/// A line with gaps is truncated at the first failed sub-query; when the
/// first sub-query fails the line is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    pub line: String,
    pub gaps: Vec<QueryGap>,
}

impl NormalizedLine {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

#[derive(Debug, Default)]
struct LineParts {
    head: Option<String>,
    values: Vec<String>,
}

impl LineParts {
    fn set_head<'label>(
        &mut self,
        name: &str,
        kind: MetricKind,
        labels: impl Iterator<Item = (&'label str, &'label str)>,
    ) {
        let mut head = String::with_capacity(64);
        head.push_str(name);
        head.push(FIELD_DELIMITER);
        head.push_str(kind.as_str());
        head.push(FIELD_DELIMITER);
        push_labels(&mut head, labels);
        head.push(FIELD_DELIMITER);
        self.head = Some(head);
    }

    fn render(self) -> String {
        let Some(mut line) = self.head else {
            return String::new();
        };
        push_joined(&mut line, self.values.into_iter());
        line
    }
}

/// Queries the backend for one record and rebuilds its line.
pub struct ResponseNormalizer<'client, Q: QueryClient + ?Sized> {
    client: &'client Q,
    query_url: String,
}

impl<'client, Q: QueryClient + ?Sized> ResponseNormalizer<'client, Q> {
    /// `query_url` is the instant-query endpoint up to and including
    /// `query=`; series names are appended verbatim.
    #[must_use]
    pub fn new(client: &'client Q, query_url: impl Into<String>) -> Self {
        Self {
            client,
            query_url: query_url.into(),
        }
    }

    /// Rebuilds the line for `key`. Query failures never abort; they are
    /// logged and reported as gaps on the returned line.
    pub async fn normalize(&self, key: RecordKey<'_>) -> NormalizedLine {
        let mut gaps = Vec::new();
        let parts = match key.kind {
            MetricKind::Counter | MetricKind::Gauge => self.scalar(key, &mut gaps).await,
            MetricKind::Histogram | MetricKind::Summary => {
                self.distribution(key, &mut gaps).await
            }
        };
        NormalizedLine {
            line: parts.render(),
            gaps,
        }
    }

    async fn scalar(&self, key: RecordKey<'_>, gaps: &mut Vec<QueryGap>) -> LineParts {
        let mut parts = LineParts::default();
        let Some(samples) = self.fetch(key.name, gaps).await else {
            return parts;
        };
        if let Some(sample) = samples.first() {
            check_labels(key, sample);
            parts.set_head(
                sample.series_name().unwrap_or(key.name),
                key.kind,
                sample.labels(),
            );
            parts.values.push(sample.value_text().to_owned());
        }
        parts
    }

    /// Histograms and summaries both need `_sum`, `_count` and a third
    /// query for the per-bound series.
    async fn distribution(&self, key: RecordKey<'_>, gaps: &mut Vec<QueryGap>) -> LineParts {
        let mut parts = LineParts::default();

        let Some(sums) = self.fetch(&format!("{}_sum", key.name), gaps).await else {
            return parts;
        };
        if let Some(sample) = sums.first() {
            check_labels(key, sample);
            parts.set_head(key.name, key.kind, sample.labels());
            parts.values.push(sample.value_text().to_owned());
        }

        let Some(counts) = self.fetch(&format!("{}_count", key.name), gaps).await else {
            return parts;
        };
        if let Some(sample) = counts.first() {
            parts.values.push(sample.value_text().to_owned());
        }

        let per_bound = if key.kind == MetricKind::Histogram {
            format!("{}_bucket", key.name)
        } else {
            key.name.to_owned()
        };
        let Some(mut series) = self.fetch(&per_bound, gaps).await else {
            return parts;
        };
        // Result order is not guaranteed by the backend.
        let bound_label = if key.kind == MetricKind::Histogram {
            BUCKET_LABEL
        } else {
            QUANTILE_LABEL
        };
        series.sort_by(|left, right| left.bound(bound_label).total_cmp(&right.bound(bound_label)));
        if key.kind == MetricKind::Histogram {
            parts.values.extend(
                series
                    .iter()
                    .filter(|sample| !sample.is_infinite_bucket())
                    .map(|sample| sample.value_text().to_owned()),
            );
        } else {
            parts
                .values
                .extend(series.iter().map(|sample| normalize_quantile(sample.value_text())));
        }
        parts
    }

    async fn fetch(&self, series: &str, gaps: &mut Vec<QueryGap>) -> Option<Vec<QuerySample>> {
        let url = format!("{}{}", self.query_url, series);
        let result = match self.client.fetch_json(&url).await {
            Ok(body) => parse_query_response(series, &body),
            Err(err) => Err(QueryError::Request {
                series: series.to_owned(),
                source: err,
            }),
        };
        match result {
            Ok(samples) => Some(samples),
            Err(err) => {
                tracing::warn!("{}", err);
                gaps.push(QueryGap {
                    series: series.to_owned(),
                    reason: err.to_string(),
                });
                None
            }
        }
    }
}

/// Quantile values are compared in the encoder's fixed-point notation.
fn normalize_quantile(raw: &str) -> String {
    parse_number(raw).map_or_else(|_| raw.to_owned(), format_quantile)
}

fn check_labels(key: RecordKey<'_>, sample: &QuerySample) {
    let mut expected: Vec<(&str, &str)> = key
        .labels
        .iter()
        .map(|label| (label.key.as_str(), label.value.as_str()))
        .collect();
    expected.sort_unstable();
    let returned: Vec<(&str, &str)> = sample.labels().collect();
    if expected != returned {
        tracing::debug!(
            "Series '{}' returned labels {:?}, generated {:?}.",
            key.name,
            returned,
            expected
        );
    }
}
