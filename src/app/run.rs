use tracing::info;

use crate::args::Command;
use crate::error::{AppError, AppResult, PipelineError};
use crate::http::{GrpcMetricSender, SignedQueryClient};
use crate::metrics::{MetricSender, QueryClient, RandomSource, SeededRandom};

use super::compare::compare;
use super::generate::generate;
use super::outcome::{CompareReport, StepOutcome};
use super::query::query;
use super::send::send;
use super::settings::RunSettings;

/// What a full pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub generated: usize,
    pub sent: usize,
    pub skipped: usize,
    pub query: StepOutcome,
    pub compare: CompareReport,
}

/// Waits for the collector to start, then runs generate, send, query and
/// compare in order.
///
/// # Errors
///
/// Returns the first fatal step error, or [`PipelineError::Mismatch`] when
/// the rebuilt lines differ from the generated ones.
pub async fn run_pipeline(
    settings: &RunSettings,
    rng: &mut dyn RandomSource,
    sender: &(dyn MetricSender + '_),
    client: &(dyn QueryClient + '_),
) -> AppResult<PipelineReport> {
    if !settings.startup_wait.is_zero() {
        info!(
            "Waiting {:?} for the collector and backend to come up.",
            settings.startup_wait
        );
        tokio::time::sleep(settings.startup_wait).await;
    }

    let generated = generate(settings, rng).await?;
    let summary = send(settings, sender).await?;
    let query_outcome = query(settings, client).await?;
    let report = compare(settings).await?;
    ensure_match(report)?;

    Ok(PipelineReport {
        generated,
        sent: summary.sent,
        skipped: summary.skipped,
        query: query_outcome,
        compare: report,
    })
}

/// Runs one subcommand against the real collector and query backend.
pub(crate) async fn execute(command: Command, settings: &RunSettings) -> AppResult<()> {
    match command {
        Command::Generate => {
            let mut rng = SeededRandom::new(settings.seed);
            let written = generate(settings, &mut rng).await?;
            info!("Wrote {} lines to {}.", written, settings.input.display());
        }
        Command::Send => {
            let sender = GrpcMetricSender::new(&settings.endpoint, settings.request_timeout)?;
            send(settings, &sender).await?;
        }
        Command::Query => {
            let client = SignedQueryClient::new(settings.request_timeout, settings.auth.clone())?;
            query(settings, &client).await?;
        }
        Command::Compare => {
            let report = compare(settings).await?;
            ensure_match(report)?;
        }
        Command::Run => {
            let mut rng = SeededRandom::new(settings.seed);
            let sender = GrpcMetricSender::new(&settings.endpoint, settings.request_timeout)?;
            let client = SignedQueryClient::new(settings.request_timeout, settings.auth.clone())?;
            let report = run_pipeline(settings, &mut rng, &sender, &client).await?;
            info!(
                "Round trip complete: {} generated, {} sent, {} skipped, {} lines compared.",
                report.generated, report.sent, report.skipped, report.compare.total
            );
        }
    }
    Ok(())
}

fn ensure_match(report: CompareReport) -> AppResult<()> {
    if report.is_match() {
        return Ok(());
    }
    Err(AppError::pipeline(PipelineError::Mismatch {
        mismatched: report.mismatched,
        total: report.total,
    }))
}
