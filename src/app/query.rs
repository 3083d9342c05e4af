use tracing::{info, warn};

use crate::error::AppResult;
use crate::metrics::{QueryClient, ResponseNormalizer};

use super::files::{read_records, write_text};
use super::outcome::StepOutcome;
use super::settings::RunSettings;

/// Rebuilds every record of the input file from the query backend and writes
/// one line per record to the output file. Failed sub-queries leave an empty
/// or truncated line and make the outcome partial.
pub(crate) async fn query(
    settings: &RunSettings,
    client: &(dyn QueryClient + '_),
) -> AppResult<StepOutcome> {
    let (records, _skipped) = read_records(&settings.input, &settings.catalog).await?;
    info!(
        "Querying {} records from {}.",
        records.len(),
        settings.query_url
    );

    let normalizer = ResponseNormalizer::new(client, settings.query_url.clone());
    let mut content = String::with_capacity(records.len().saturating_mul(64));
    let mut gaps = Vec::new();
    for record in &records {
        let normalized = normalizer.normalize(record.key()).await;
        content.push_str(&normalized.line);
        content.push('\n');
        gaps.extend(normalized.gaps);
    }

    write_text(&settings.output, &content).await?;
    let outcome = StepOutcome::from_gaps(gaps);
    if let StepOutcome::Partial { gaps } = &outcome {
        warn!(
            "{} sub-queries failed; affected lines in {} are empty or partial.",
            gaps.len(),
            settings.output.display()
        );
    } else {
        info!("Wrote {} lines to {}.", records.len(), settings.output.display());
    }
    Ok(outcome)
}
