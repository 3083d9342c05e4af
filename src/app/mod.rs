//! Pipeline steps: generate fixtures, export them, read them back and compare.
mod compare;
mod files;
mod generate;
mod outcome;
mod query;
mod run;
mod send;
mod settings;

#[cfg(test)]
mod tests;

pub use outcome::{CompareReport, SendSummary, StepOutcome};
pub use run::{PipelineReport, run_pipeline};
pub use settings::RunSettings;

pub(crate) use run::execute;
