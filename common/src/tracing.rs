use tracing_subscriber::EnvFilter;

/// Initialize the fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (typically the
/// configured log level) is used.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
