//! Tracing subscriber setup
//!
//! Library crates only emit through `tracing`; the host binary calls
//! [`init_tracing`] once at startup.

use authgate_domain::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins over [`LoggingConfig::level`]. Returns `false` when a
/// global subscriber was already set, in which case nothing changes.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = build_filter(config);

    let installed = if config.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).with_target(true).try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = config.effective_level(), json = config.json, "Tracing initialized");
            true
        }
        Err(_) => false,
    }
}

/// Filter from `RUST_LOG`, else from the configured level, else `info`.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.effective_level()))
        .unwrap_or_else(|_| EnvFilter::new(authgate_domain::constants::DEFAULT_LOG_LEVEL))
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let config = LoggingConfig::default();
        // the first call may lose to another test in this binary
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig { level: "authgate_core=loud".into(), json: false };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_configured_level_applies() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig { level: "trace".into(), json: true };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::TRACE));
    }
}
