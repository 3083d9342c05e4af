use std::path::PathBuf;
use std::time::Duration;

use crate::args::{BoundList, RoundtripArgs};
use crate::error::{AppError, AppResult};
use crate::http::{AuthConfig, resolve_auth, validate_query_url};
use crate::metrics::{DEFAULT_BOUNDS, FixtureCatalog, default_labels};

/// Everything a pipeline step needs, resolved and validated once per run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub catalog: FixtureCatalog,
    pub items: usize,
    pub endpoint: String,
    pub query_url: String,
    pub request_timeout: Duration,
    pub send_delay: Duration,
    pub startup_wait: Duration,
    pub input: PathBuf,
    pub output: PathBuf,
    pub diff: PathBuf,
    pub auth: Option<AuthConfig>,
    pub seed: Option<u64>,
}

impl RunSettings {
    /// # Errors
    ///
    /// Returns an error when the label catalog, bounds, query URL or auth
    /// flags are invalid.
    pub fn from_args(args: &RoundtripArgs) -> AppResult<Self> {
        let labels = if args.labels.is_empty() {
            default_labels()
        } else {
            args.labels.clone()
        };
        let bounds = args
            .bounds
            .clone()
            .map_or_else(|| DEFAULT_BOUNDS.to_vec(), BoundList::into_inner);
        let catalog = FixtureCatalog::new(
            args.metric_name.clone(),
            args.value_bound.get(),
            labels,
            bounds,
        )
        .map_err(AppError::validation)?;

        validate_query_url(&args.query_url).map_err(AppError::validation)?;
        let auth = resolve_auth(args)?;

        Ok(Self {
            catalog,
            items: args.items.get(),
            endpoint: args.endpoint.clone(),
            query_url: args.query_url.clone(),
            request_timeout: args.request_timeout,
            send_delay: args.send_delay,
            startup_wait: args.startup_wait,
            input: PathBuf::from(&args.input),
            output: PathBuf::from(&args.output),
            diff: PathBuf::from(&args.diff),
            auth,
            seed: args.seed,
        })
    }
}
