// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// `RUST_LOG` wins when set; otherwise the level is "info", or "debug" when
/// the run was started with `--debug`.
pub fn setup_logging(debug: bool) {
    let default_level = if debug { "docx_catalog=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logging setup complete (default level: {}).", default_level);
}
