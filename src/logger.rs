use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default level.
pub fn setup_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}
