use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::common::v1::{KeyValue, any_value};
use opentelemetry_proto::tonic::metrics::v1::{Metric, metric::Data, number_data_point};
use serde_json::json;
use tempfile::TempDir;

use super::compare::{compare, diff_lines};
use super::generate::generate;
use super::query::query;
use super::send::send;
use super::*;
use crate::error::{AppError, AppResult, ExportError, HttpError, PipelineError};
use crate::metrics::{
    Decoded, FixtureCatalog, MetricSender, QueryClient, SeededRandom, decode_line,
};

const QUERY_URL: &str = "http://backend/api/v1/query?query=";

type Series = Vec<(BTreeMap<String, String>, String)>;

/// Stores exported metrics as Prometheus-style series and answers instant
/// queries for them.
#[derive(Default)]
struct InMemoryBackend {
    series: Mutex<HashMap<String, Series>>,
    exports: Mutex<usize>,
    drop_first_export: bool,
}

impl InMemoryBackend {
    fn dropping_first_export() -> Self {
        Self {
            drop_first_export: true,
            ..Self::default()
        }
    }

    fn export_count(&self) -> usize {
        self.exports.lock().map(|count| *count).unwrap_or(0)
    }

    fn push(&self, name: String, labels: BTreeMap<String, String>, value: String) {
        if let Ok(mut series) = self.series.lock() {
            series.entry(name).or_default().push((labels, value));
        }
    }

    fn ingest(&self, metric: &Metric) {
        match &metric.data {
            Some(Data::Sum(sum)) => {
                for point in &sum.data_points {
                    let value = match point.value {
                        Some(number_data_point::Value::AsInt(value)) => value.to_string(),
                        Some(number_data_point::Value::AsDouble(value)) => value.to_string(),
                        None => continue,
                    };
                    self.push(metric.name.clone(), attributes(&point.attributes), value);
                }
            }
            Some(Data::Histogram(histogram)) => {
                for point in &histogram.data_points {
                    let labels = attributes(&point.attributes);
                    self.push(
                        format!("{}_sum", metric.name),
                        labels.clone(),
                        point.sum.unwrap_or_default().to_string(),
                    );
                    self.push(
                        format!("{}_count", metric.name),
                        labels.clone(),
                        point.count.to_string(),
                    );
                    let bounds = point
                        .explicit_bounds
                        .iter()
                        .map(ToString::to_string)
                        .chain(std::iter::once("+Inf".to_owned()));
                    let buckets = point
                        .bucket_counts
                        .iter()
                        .copied()
                        .chain(std::iter::once(point.count));
                    for (bound, bucket) in bounds.zip(buckets) {
                        let mut bucket_labels = labels.clone();
                        bucket_labels.insert("le".to_owned(), bound);
                        self.push(
                            format!("{}_bucket", metric.name),
                            bucket_labels,
                            bucket.to_string(),
                        );
                    }
                }
            }
            Some(Data::Summary(summary)) => {
                for point in &summary.data_points {
                    let labels = attributes(&point.attributes);
                    self.push(
                        format!("{}_sum", metric.name),
                        labels.clone(),
                        point.sum.to_string(),
                    );
                    self.push(
                        format!("{}_count", metric.name),
                        labels.clone(),
                        point.count.to_string(),
                    );
                    for quantile in &point.quantile_values {
                        let mut quantile_labels = labels.clone();
                        quantile_labels.insert("quantile".to_owned(), quantile.quantile.to_string());
                        self.push(
                            metric.name.clone(),
                            quantile_labels,
                            quantile.value.to_string(),
                        );
                    }
                }
            }
            Some(Data::Gauge(_) | Data::ExponentialHistogram(_)) | None => {}
        }
    }
}

fn attributes(attributes: &[KeyValue]) -> BTreeMap<String, String> {
    attributes
        .iter()
        .filter_map(|attribute| match attribute.value.as_ref()?.value.as_ref()? {
            any_value::Value::StringValue(value) => Some((attribute.key.clone(), value.clone())),
            any_value::Value::BoolValue(_)
            | any_value::Value::IntValue(_)
            | any_value::Value::DoubleValue(_)
            | any_value::Value::ArrayValue(_)
            | any_value::Value::KvlistValue(_)
            | any_value::Value::BytesValue(_) => None,
        })
        .collect()
}

#[async_trait]
impl MetricSender for InMemoryBackend {
    async fn send(
        &self,
        request: ExportMetricsServiceRequest,
        _deadline: Duration,
    ) -> Result<(), ExportError> {
        let previous = match self.exports.lock() {
            Ok(mut count) => {
                let previous = *count;
                *count = previous.saturating_add(1);
                previous
            }
            Err(_poisoned) => 0,
        };
        if self.drop_first_export && previous == 0 {
            return Ok(());
        }
        request
            .resource_metrics
            .iter()
            .flat_map(|resource| &resource.scope_metrics)
            .flat_map(|scope| &scope.metrics)
            .for_each(|metric| self.ingest(metric));
        Ok(())
    }
}

#[async_trait]
impl QueryClient for InMemoryBackend {
    async fn fetch_json(&self, url: &str) -> Result<String, HttpError> {
        let Some(name) = url.strip_prefix(QUERY_URL) else {
            return Err(HttpError::UnexpectedStatus {
                url: url.to_owned(),
                status: 404,
            });
        };
        let samples = self
            .series
            .lock()
            .ok()
            .and_then(|series| series.get(name).cloned())
            .unwrap_or_default();
        let result: Vec<serde_json::Value> = samples
            .into_iter()
            .map(|(mut labels, value)| {
                labels.insert("__name__".to_owned(), name.to_owned());
                json!({ "metric": labels, "value": [1_700_000_000, value] })
            })
            .collect();
        Ok(json!({ "status": "success", "data": { "resultType": "vector", "result": result } })
            .to_string())
    }
}

/// Collector that rejects every export.
struct RejectingSender;

#[async_trait]
impl MetricSender for RejectingSender {
    async fn send(
        &self,
        _request: ExportMetricsServiceRequest,
        _deadline: Duration,
    ) -> Result<(), ExportError> {
        Err(ExportError::HttpStatus { status: 503 })
    }
}

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::pipeline(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn temp_dir() -> AppResult<TempDir> {
    tempfile::tempdir().map_err(|err| AppError::pipeline(format!("tempdir failed: {}", err)))
}

fn settings(dir: &Path, items: usize) -> RunSettings {
    RunSettings {
        catalog: FixtureCatalog::default(),
        items,
        endpoint: "localhost:55680".to_owned(),
        query_url: QUERY_URL.to_owned(),
        request_timeout: Duration::from_secs(1),
        send_delay: Duration::ZERO,
        startup_wait: Duration::ZERO,
        input: dir.join("data.txt"),
        output: dir.join("ans.txt"),
        diff: dir.join("diff.txt"),
        auth: None,
        seed: Some(7),
    }
}

fn write(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content)
        .map_err(|err| AppError::pipeline(format!("write {} failed: {}", path.display(), err)))
}

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path)
        .map_err(|err| AppError::pipeline(format!("read {} failed: {}", path.display(), err)))
}

#[test]
fn generate_writes_requested_lines() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(&dir.path().join("nested"), 25);
        let mut rng = SeededRandom::new(settings.seed);

        let written = generate(&settings, &mut rng).await?;
        let content = read(&settings.input)?;
        let lines: Vec<&str> = content.lines().collect();
        if written != 25 || lines.len() != 25 {
            return Err(AppError::pipeline(format!(
                "Expected 25 lines, wrote {} and found {}",
                written,
                lines.len()
            )));
        }
        for line in lines {
            match decode_line(line, &settings.catalog) {
                Ok(Decoded::Record(_)) => {}
                other => {
                    return Err(AppError::pipeline(format!(
                        "Generated line '{}' decoded as {:?}",
                        line, other
                    )));
                }
            }
        }
        Ok(())
    })
}

#[test]
fn send_skips_unknown_kinds() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 3);
        write(
            &settings.input,
            "metricName0a,gauge,label1 value1,42\n\
             metricName1a,exponential_histogram,label1 value1,1\n\
             metricName2a,histogram,label1 value1,10 6 1 2 3\n",
        )?;
        let backend = InMemoryBackend::default();

        let summary = send(&settings, &backend).await?;
        if summary != (SendSummary { sent: 2, skipped: 1 }) || backend.export_count() != 2 {
            return Err(AppError::pipeline(format!(
                "Unexpected summary {:?} with {} exports",
                summary,
                backend.export_count()
            )));
        }
        Ok(())
    })
}

#[test]
fn send_fails_on_malformed_line() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 2);
        write(
            &settings.input,
            "metricName0a,gauge,label1 value1,42\nmetricName1a,gauge,label1 value1,abc\n",
        )?;
        let backend = InMemoryBackend::default();

        match send(&settings, &backend).await {
            Err(AppError::Pipeline(PipelineError::Decode { line_number: 2, .. })) => {}
            other => {
                return Err(AppError::pipeline(format!(
                    "Expected decode error on line 2, got {:?}",
                    other
                )));
            }
        }
        if backend.export_count() != 0 {
            return Err(AppError::pipeline("Nothing may be sent before decoding succeeds"));
        }
        Ok(())
    })
}

#[test]
fn send_stops_at_first_rejected_export() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 2);
        write(
            &settings.input,
            "metricName0a,gauge,label1 value1,42\nmetricName1a,counter,label1 value1,7\n",
        )?;

        match send(&settings, &RejectingSender).await {
            Err(AppError::Pipeline(PipelineError::Send { name, .. })) if name == "metricName0a" => {
                Ok(())
            }
            other => Err(AppError::pipeline(format!(
                "Expected send error for the first record, got {:?}",
                other
            ))),
        }
    })
}

#[test]
fn query_reports_missing_series_as_partial() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 2);
        write(
            &settings.input,
            "metricName0a,gauge,label2 value2 label1 value1,42\n\
             metricName1a,counter,label1 value1,7\n",
        )?;
        let backend = InMemoryBackend::default();
        backend.push(
            "metricName0a".to_owned(),
            BTreeMap::from([
                ("label1".to_owned(), "value1".to_owned()),
                ("label2".to_owned(), "value2".to_owned()),
            ]),
            "42".to_owned(),
        );

        let outcome = query(&settings, &backend).await?;
        let StepOutcome::Partial { gaps } = outcome else {
            return Err(AppError::pipeline("Expected a partial outcome"));
        };
        if gaps.len() != 1 || gaps.first().map(|gap| gap.series.as_str()) != Some("metricName1a") {
            return Err(AppError::pipeline(format!("Unexpected gaps: {:?}", gaps)));
        }
        let output = read(&settings.output)?;
        if output != "metricName0a,gauge,label1 value1 label2 value2,42\n\n" {
            return Err(AppError::pipeline(format!("Unexpected output: {:?}", output)));
        }
        Ok(())
    })
}

#[test]
fn compare_ignores_label_order() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 1);
        write(&settings.input, "metricName0a,gauge,label2 value2 label1 value1,42\n")?;
        write(&settings.output, "metricName0a,gauge,label1 value1 label2 value2,42\n")?;

        let report = compare(&settings).await?;
        if !report.is_match() || report.total != 1 {
            return Err(AppError::pipeline(format!("Unexpected report: {:?}", report)));
        }
        Ok(())
    })
}

#[test]
fn compare_writes_diff_and_counts_mismatches() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 3);
        write(
            &settings.input,
            "metricName0a,gauge,label1 value1,42\n\
             metricName1a,counter,label1 value1,7\n\
             metricName2a,summary,label1 value1,1.5 2 0.100000 0.200000 0.300000\n",
        )?;
        write(
            &settings.output,
            "metricName0a,gauge,label1 value1,42\n\
             metricName1a,counter,label1 value1,8\n\
             metricName2a,summary,label1 value1,1.5 2 0.1 0.2 0.3\n",
        )?;

        let report = compare(&settings).await?;
        if report != (CompareReport { total: 3, mismatched: 1 }) {
            return Err(AppError::pipeline(format!("Unexpected report: {:?}", report)));
        }
        let diff = read(&settings.diff)?;
        if !diff.contains("line 2:") || !diff.contains("+ metricName1a,counter,label1 value1,8") {
            return Err(AppError::pipeline(format!("Unexpected diff: {}", diff)));
        }
        Ok(())
    })
}

#[test]
fn diff_lines_marks_missing_lines() -> Result<(), String> {
    let expected = vec!["a".to_owned(), "b".to_owned()];
    let actual = vec!["a".to_owned()];
    let (report, diff) = diff_lines(&expected, &actual);
    if report != (CompareReport { total: 2, mismatched: 1 }) {
        return Err(format!("Unexpected report: {:?}", report));
    }
    if !diff.contains("+ <missing>") {
        return Err(format!("Unexpected diff: {}", diff));
    }
    Ok(())
}

#[test]
fn pipeline_round_trips_through_backend() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 40);
        let mut rng = SeededRandom::new(settings.seed);
        let backend = InMemoryBackend::default();

        let report = run_pipeline(&settings, &mut rng, &backend, &backend).await?;
        if report.generated != 40
            || report.sent != 40
            || !report.query.is_complete()
            || report.compare != (CompareReport { total: 40, mismatched: 0 })
        {
            return Err(AppError::pipeline(format!("Unexpected report: {:?}", report)));
        }
        Ok(())
    })
}

#[test]
fn pipeline_fails_when_a_series_is_lost() -> AppResult<()> {
    run_async_test(async {
        let dir = temp_dir()?;
        let settings = settings(dir.path(), 5);
        let mut rng = SeededRandom::new(settings.seed);
        let backend = InMemoryBackend::dropping_first_export();

        match run_pipeline(&settings, &mut rng, &backend, &backend).await {
            Err(AppError::Pipeline(PipelineError::Mismatch {
                mismatched: 1,
                total: 5,
            })) => {}
            other => {
                return Err(AppError::pipeline(format!(
                    "Expected one mismatching line, got {:?}",
                    other
                )));
            }
        }
        let diff = read(&settings.diff)?;
        if !diff.contains("line 1:") {
            return Err(AppError::pipeline(format!("Unexpected diff: {}", diff)));
        }
        Ok(())
    })
}
