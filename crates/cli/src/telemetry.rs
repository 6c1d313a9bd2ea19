use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr; stdout carries the response.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this twice is harmless.
pub fn init_logging(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
