use crate::error::ValidationError;

use super::types::Label;

pub const FIELD_DELIMITER: char = ',';
pub const SUBFIELD_DELIMITER: char = ' ';
pub const MAX_LABELS: usize = 4;

pub const DEFAULT_BASE_NAME: &str = "metricName";
pub const DEFAULT_VALUE_BOUND: u64 = 5000;
pub const DEFAULT_BOUNDS: [f64; 3] = [0.01, 0.5, 0.99];
pub const DEFAULT_LABELS: [(&str, &str); MAX_LABELS] = [
    ("label1", "value1"),
    ("label2", "value2"),
    ("label3", "value3"),
    ("label4", "value4"),
];

/// Immutable tables shared by the encoder, decoder, payload builder and
/// normalizer for one run.
///
/// `bounds` doubles as histogram bucket upper bounds and summary quantile
/// levels, so both kinds are checked against the same three thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureCatalog {
    base_name: String,
    value_bound: u64,
    labels: Vec<Label>,
    bounds: Vec<f64>,
}

impl FixtureCatalog {
    /// Builds a catalog after checking every table against the line format.
    ///
    /// # Errors
    ///
    /// Returns an error when the label catalog is empty or larger than
    /// [`MAX_LABELS`], when a name or label contains a delimiter, when the
    /// bound list is empty or non-finite, or when `value_bound` is zero.
    pub fn new(
        base_name: impl Into<String>,
        value_bound: u64,
        labels: Vec<Label>,
        bounds: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        let base_name = base_name.into();
        if base_name.is_empty() || contains_delimiter(&base_name) {
            return Err(ValidationError::InvalidMetricName);
        }
        if value_bound == 0 {
            return Err(ValidationError::ValueTooSmall { min: 1 });
        }
        if labels.is_empty() || labels.len() > MAX_LABELS {
            return Err(ValidationError::LabelCatalogSize {
                max: MAX_LABELS,
                found: labels.len(),
            });
        }
        for label in &labels {
            for part in [&label.key, &label.value] {
                if part.is_empty() || contains_delimiter(part) {
                    return Err(ValidationError::LabelReservedCharacter {
                        value: part.clone(),
                    });
                }
            }
        }
        if bounds.is_empty() {
            return Err(ValidationError::BoundsEmpty);
        }
        if let Some(value) = bounds.iter().copied().find(|bound| !bound.is_finite()) {
            return Err(ValidationError::BoundNotFinite { value });
        }
        Ok(Self {
            base_name,
            value_bound,
            labels,
            bounds,
        })
    }

    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    #[must_use]
    pub const fn value_bound(&self) -> u64 {
        self.value_bound
    }

    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[must_use]
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Number of values in a histogram or summary value block.
    #[must_use]
    pub fn distribution_arity(&self) -> usize {
        self.bounds.len().saturating_add(2)
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_owned(),
            value_bound: DEFAULT_VALUE_BOUND,
            labels: default_labels(),
            bounds: DEFAULT_BOUNDS.to_vec(),
        }
    }
}

/// The catalog's label table when none is configured.
#[must_use]
pub fn default_labels() -> Vec<Label> {
    DEFAULT_LABELS
        .iter()
        .map(|(key, value)| Label::new(*key, *value))
        .collect()
}

fn contains_delimiter(value: &str) -> bool {
    value.contains(FIELD_DELIMITER) || value.chars().any(char::is_whitespace)
}
