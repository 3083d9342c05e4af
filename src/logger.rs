use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding a tracing filter directive for this tool.
pub const LOG_ENV: &str = "ROUNDTRIP_LOG";

/// Installs the global subscriber. Later calls keep the first subscriber.
pub fn init_logging(verbose: bool, no_color: bool) {
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(if verbose { "debug" } else { "info" }),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global subscriber already installed.");
    }
}
