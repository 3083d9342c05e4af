use std::fmt;

/// The four metric kinds the fixture generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    Summary,
}

impl MetricKind {
    pub const ALL: [Self; 4] = [Self::Counter, Self::Gauge, Self::Histogram, Self::Summary];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
            Self::Histogram => "histogram",
            Self::Summary => "summary",
        }
    }

    /// Returns `None` for type names this build does not know about.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "counter" => Some(Self::Counter),
            "gauge" => Some(Self::Gauge),
            "histogram" => Some(Self::Histogram),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }

    /// Maps a uniform draw in `[0, 4)` onto a kind.
    #[must_use]
    pub const fn from_draw(draw: u64) -> Self {
        match draw {
            0 => Self::Counter,
            1 => Self::Gauge,
            2 => Self::Histogram,
            _ => Self::Summary,
        }
    }

    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Counter | Self::Gauge)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Kind-dependent payload of a [`MetricRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValues {
    Scalar(f64),
    Histogram {
        sum: u64,
        count: u64,
        buckets: Vec<u64>,
    },
    Summary {
        sum: f64,
        count: f64,
        quantiles: Vec<f64>,
    },
}

impl MetricValues {
    /// Whether this payload is the shape `kind` requires.
    #[must_use]
    pub const fn fits(&self, kind: MetricKind) -> bool {
        matches!(
            (kind, self),
            (MetricKind::Counter | MetricKind::Gauge, Self::Scalar(_))
                | (MetricKind::Histogram, Self::Histogram { .. })
                | (MetricKind::Summary, Self::Summary { .. })
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub name: String,
    pub kind: MetricKind,
    pub labels: Vec<Label>,
    pub values: MetricValues,
}

impl MetricRecord {
    #[must_use]
    pub fn key(&self) -> RecordKey<'_> {
        RecordKey {
            name: &self.name,
            kind: self.kind,
            labels: &self.labels,
        }
    }

    /// Labels ordered by key, the order used when lines are compared.
    #[must_use]
    pub fn sorted_labels(&self) -> Vec<Label> {
        let mut labels = self.labels.clone();
        labels.sort();
        labels
    }
}

/// The part of a record the query side uses to look a series up.
#[derive(Debug, Clone, Copy)]
pub struct RecordKey<'record> {
    pub name: &'record str,
    pub kind: MetricKind,
    pub labels: &'record [Label],
}
