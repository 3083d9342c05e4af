use std::path::Path;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::metrics::{Decoded, FixtureCatalog, MetricRecord, decode_line, encode_line};

use super::files::{decode_records, read_text, write_text};
use super::outcome::CompareReport;
use super::settings::RunSettings;

const MISSING_LINE: &str = "<missing>";

/// Compares the input and output files line by line after putting both into
/// canonical form, writes a report to the diff file and returns the counts.
/// Mismatches are not an error here; callers decide what they mean.
pub(crate) async fn compare(settings: &RunSettings) -> AppResult<CompareReport> {
    let expected_text = read_text(&settings.input).await?;
    let actual_text = read_text(&settings.output).await?;

    let expected = expected_lines(&expected_text, &settings.input, &settings.catalog)?;
    let actual = actual_lines(&actual_text, &settings.catalog);
    let (report, diff) = diff_lines(&expected, &actual);

    write_text(&settings.diff, &diff).await?;
    if report.is_match() {
        info!(
            "All {} lines match; report written to {}.",
            report.total,
            settings.diff.display()
        );
    } else {
        warn!(
            "{} of {} lines differ; see {}.",
            report.mismatched,
            report.total,
            settings.diff.display()
        );
    }
    Ok(report)
}

fn expected_lines(content: &str, path: &Path, catalog: &FixtureCatalog) -> AppResult<Vec<String>> {
    let (records, _skipped) = decode_records(content, path, catalog)?;
    Ok(records.iter().map(canonical_line).collect())
}

// Output lines may be empty or truncated after failed queries, so anything
// that does not decode is compared as written.
fn actual_lines(content: &str, catalog: &FixtureCatalog) -> Vec<String> {
    content
        .lines()
        .map(|line| match decode_line(line, catalog) {
            Ok(Decoded::Record(record)) => canonical_line(&record),
            Ok(Decoded::Skipped { .. }) | Err(_) => line.trim().to_owned(),
        })
        .collect()
}

fn canonical_line(record: &MetricRecord) -> String {
    let sorted = MetricRecord {
        labels: record.sorted_labels(),
        ..record.clone()
    };
    encode_line(&sorted)
}

pub(super) fn diff_lines(expected: &[String], actual: &[String]) -> (CompareReport, String) {
    let total = expected.len().max(actual.len());
    let mut mismatched = 0_usize;
    let mut report = Vec::new();
    for index in 0..total {
        let left = expected.get(index).map_or(MISSING_LINE, String::as_str);
        let right = actual.get(index).map_or(MISSING_LINE, String::as_str);
        if left == right {
            continue;
        }
        mismatched = mismatched.saturating_add(1);
        report.push(format!("line {}:", index.saturating_add(1)));
        report.push(format!("- {left}"));
        report.push(format!("+ {right}"));
    }
    report.push(format!(
        "{mismatched} of {total} lines differ between expected and actual output."
    ));

    let mut diff = report.join("\n");
    diff.push('\n');
    (CompareReport { total, mismatched }, diff)
}
