use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, PipelineError};
use crate::metrics::{MetricSender, PayloadBuilder, export_request};

use super::files::read_records;
use super::outcome::SendSummary;
use super::settings::RunSettings;

/// Exports every record of the input file, one at a time, pausing
/// `send_delay` after each. The first failed export aborts the step.
pub(crate) async fn send(
    settings: &RunSettings,
    sender: &(dyn MetricSender + '_),
) -> AppResult<SendSummary> {
    let (records, skipped) = read_records(&settings.input, &settings.catalog).await?;
    info!(
        "Sending {} records from {} to {}.",
        records.len(),
        settings.input.display(),
        settings.endpoint
    );

    let builder = PayloadBuilder::new(&settings.catalog);
    let mut sent = 0_usize;
    for record in &records {
        let metric = builder.build(record).map_err(|source| {
            AppError::pipeline(PipelineError::Build {
                name: record.name.clone(),
                source,
            })
        })?;
        sender
            .send(export_request(metric), settings.request_timeout)
            .await
            .map_err(|source| {
                error!("Export of '{}' failed: {}", record.name, source);
                AppError::pipeline(PipelineError::Send {
                    name: record.name.clone(),
                    source,
                })
            })?;
        sent = sent.saturating_add(1);
        debug!("Sent '{}' ({}).", record.name, record.kind);

        if !settings.send_delay.is_zero() {
            tokio::time::sleep(settings.send_delay).await;
        }
    }

    info!("Sent {} records, skipped {}.", sent, skipped);
    Ok(SendSummary { sent, skipped })
}
