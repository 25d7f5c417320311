use tracing_subscriber::EnvFilter;

/// The environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "PROMPIPE_LOG";

const DEFAULT_FILTER: &str = "warn";

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr, so stdout only carries the result of the push.
/// Invalid or missing directives in `PROMPIPE_LOG` fall back to `warn`.
pub fn init_logging() {
    let directives = std::env::var(LOG_ENV_VAR).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
