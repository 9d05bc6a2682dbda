/// Initializes the tracing/logging infrastructure for the console.
///
/// This sets up structured logging using the `tracing` crate with:
/// - **Environment-based filtering**: Controlled via `RUST_LOG`, `info` when unset
/// - **Compact formatting**: Spans shown inline, module paths hidden
///
/// # Environment Variables
///
/// - `RUST_LOG=info` - Settled transitions and failures
/// - `RUST_LOG=debug` - Every request URL and session command
/// - `RUST_LOG=catalog_console::gateway=debug` - Only gateway traffic
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
