//! Tracing setup shared by the binaries

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Output goes to
/// stderr so the dashboard's report on stdout stays clean.
pub fn init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match config.format.as_str() {
        "json" => registry.with(layer.json()).try_init(),
        _ => registry.with(layer).try_init(),
    }
}

fn default_directives(level: &str) -> String {
    format!("obesity_dash={level},obesity_api={level},obesity_dashboard={level},tower_http={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("obesity_dash=debug"));
        assert!(directives.ends_with("tower_http=debug"));
    }
}
