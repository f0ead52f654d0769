//! Tracing subscriber setup shared by the binaries.

use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{RelayerError, Result};

/// Logging options for one binary.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    log_filter: String,
}

impl TelemetryConfig {
    /// Reads `<PREFIX>_LOG_FILTER`, e.g. `MONITOR_LOG_FILTER`, falling back to
    /// `info`.
    pub fn from_env(prefix: &str) -> Self {
        let key = format!("{}_LOG_FILTER", prefix.trim().to_ascii_uppercase());
        Self::with_filter(
            env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
        )
    }

    pub fn with_filter(log_filter: impl Into<String>) -> Self {
        Self {
            log_filter: log_filter.into(),
        }
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

/// Installs the global fmt subscriber. Fails if the filter does not parse or a
/// subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(config.log_filter())
        .map_err(|e| RelayerError::Telemetry(format!("invalid log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| RelayerError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = TelemetryConfig::with_filter("unified_relayer=notalevel");
        assert!(matches!(
            init_telemetry(&config),
            Err(RelayerError::Telemetry(_))
        ));
    }

    #[test]
    fn test_missing_filter_defaults_to_info() {
        let config = TelemetryConfig::from_env("UNIFIED_RELAYER_TEST_UNSET");
        assert_eq!(config.log_filter(), "info");
    }
}
