use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. `RUST_LOG` wins over `level`.
/// Library code logs through the `log` facade; the subscriber's log bridge
/// picks those records up.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("cocktail_catalog={level},load_cocktails={level},warn"))
    });

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        log::warn!("Logger already initialized");
    }
}
