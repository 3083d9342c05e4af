use super::catalog::{FIELD_DELIMITER, FixtureCatalog, SUBFIELD_DELIMITER};
use super::random::RandomSource;
use super::types::{MetricKind, MetricRecord, MetricValues};

/// Upper bound of the per-run suffix appended to every metric name so two
/// runs against the same backend do not collide.
const SUFFIX_BOUND: u64 = 5000;
const QUANTILE_PRECISION: usize = 6;

/// Produces randomized records for one run.
#[derive(Debug)]
pub struct Encoder<'catalog> {
    catalog: &'catalog FixtureCatalog,
    suffix: String,
}

impl<'catalog> Encoder<'catalog> {
    /// Draws the run suffix from `rng`.
    pub fn new(catalog: &'catalog FixtureCatalog, rng: &mut dyn RandomSource) -> Self {
        let suffix = rng.next_below(SUFFIX_BOUND).to_string();
        Self { catalog, suffix }
    }

    #[must_use]
    pub fn with_suffix(catalog: &'catalog FixtureCatalog, suffix: impl Into<String>) -> Self {
        Self {
            catalog,
            suffix: suffix.into(),
        }
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Generates the record for position `index`.
    pub fn generate(&self, index: usize, rng: &mut dyn RandomSource) -> MetricRecord {
        let kind_count = u64::try_from(MetricKind::ALL.len()).unwrap_or(u64::MAX);
        let kind = MetricKind::from_draw(rng.next_below(kind_count));

        let catalog_len = u64::try_from(self.catalog.labels().len()).unwrap_or(u64::MAX);
        let label_count = usize::try_from(rng.next_below(catalog_len))
            .unwrap_or(0)
            .saturating_add(1);
        let labels = self
            .catalog
            .labels()
            .iter()
            .take(label_count)
            .cloned()
            .collect();

        let bound = self.catalog.value_bound();
        let values = match kind {
            MetricKind::Counter | MetricKind::Gauge => {
                MetricValues::Scalar(draw_integer(rng, bound))
            }
            MetricKind::Histogram => {
                let buckets: Vec<u64> = self
                    .catalog
                    .bounds()
                    .iter()
                    .map(|_| rng.next_below(bound))
                    .collect();
                let count = buckets
                    .iter()
                    .fold(0_u64, |total, bucket| total.saturating_add(*bucket));
                let sum = rng.next_below(bound);
                MetricValues::Histogram {
                    sum,
                    count,
                    buckets,
                }
            }
            MetricKind::Summary => {
                let sum = draw_integer(rng, bound);
                let count = draw_integer(rng, bound);
                let quantiles = self
                    .catalog
                    .bounds()
                    .iter()
                    .map(|_| quantize(rng.next_unit()))
                    .collect();
                MetricValues::Summary {
                    sum,
                    count,
                    quantiles,
                }
            }
        };

        MetricRecord {
            name: format!("{}{}{}", self.catalog.base_name(), index, self.suffix),
            kind,
            labels,
            values,
        }
    }
}

/// Serializes a record as one line of the flat format, without the newline.
#[must_use]
pub fn encode_line(record: &MetricRecord) -> String {
    let mut line = String::with_capacity(64);
    line.push_str(&record.name);
    line.push(FIELD_DELIMITER);
    line.push_str(record.kind.as_str());
    line.push(FIELD_DELIMITER);
    push_labels(
        &mut line,
        record
            .labels
            .iter()
            .map(|label| (label.key.as_str(), label.value.as_str())),
    );
    line.push(FIELD_DELIMITER);
    push_values(&mut line, &record.values);
    line
}

/// Writes `k1 v1 k2 v2` into `line`.
pub(crate) fn push_labels<'label>(
    line: &mut String,
    labels: impl Iterator<Item = (&'label str, &'label str)>,
) {
    for (position, (key, value)) in labels.enumerate() {
        if position > 0 {
            line.push(SUBFIELD_DELIMITER);
        }
        line.push_str(key);
        line.push(SUBFIELD_DELIMITER);
        line.push_str(value);
    }
}

fn push_values(line: &mut String, values: &MetricValues) {
    match values {
        MetricValues::Scalar(value) => line.push_str(&value.to_string()),
        MetricValues::Histogram {
            sum,
            count,
            buckets,
        } => {
            let rendered = [*sum, *count]
                .into_iter()
                .chain(buckets.iter().copied())
                .map(|value| value.to_string());
            push_joined(line, rendered);
        }
        MetricValues::Summary {
            sum,
            count,
            quantiles,
        } => {
            let rendered = [sum.to_string(), count.to_string()]
                .into_iter()
                .chain(quantiles.iter().map(|quantile| format_quantile(*quantile)));
            push_joined(line, rendered);
        }
    }
}

/// Writes `parts` separated by the sub-field delimiter.
pub(crate) fn push_joined(line: &mut String, parts: impl Iterator<Item = String>) {
    for (position, part) in parts.enumerate() {
        if position > 0 {
            line.push(SUBFIELD_DELIMITER);
        }
        line.push_str(&part);
    }
}

/// Fixed-point rendering shared by the encoder and the normalizer.
#[must_use]
pub fn format_quantile(value: f64) -> String {
    format!("{:.prec$}", value, prec = QUANTILE_PRECISION)
}

fn draw_integer(rng: &mut dyn RandomSource, bound: u64) -> f64 {
    rng.next_below(bound) as f64
}

/// Rounds a draw to the precision the line format keeps, so a decoded
/// record compares equal to the generated one.
fn quantize(value: f64) -> f64 {
    format_quantile(value).parse().unwrap_or(value)
}
