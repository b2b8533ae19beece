//! Process-level configuration for Arrange hosts.

use crate::logging;

/// Environment variable overriding [`Config::log_filter`].
pub const LOG_ENV: &str = "ARRANGE_LOG";

/// Environment variable enabling profiling scopes when set to `1` or `true`.
pub const PROFILE_ENV: &str = "ARRANGE_PROFILE";

/// Configuration applied once at host start-up.
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing-subscriber` filter directive, e.g. `"info,arrange=debug"`.
    pub log_filter: String,
    /// Whether puffin scopes are recorded.
    pub profiling: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: logging::DEFAULT_FILTER.to_string(),
            profiling: false,
        }
    }
}

impl Config {
    /// Read overrides from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(filter) = std::env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }
        if let Ok(flag) = std::env::var(PROFILE_ENV) {
            config.profiling = matches!(flag.trim(), "1" | "true" | "on");
        }
        config
    }

    /// Install logging and toggle profiling according to this configuration.
    ///
    /// Safe to call more than once; only the first subscriber wins.
    pub fn apply(&self) {
        logging::try_init_with_filter(&self.log_filter);
        crate::profiling::set_enabled(self.profiling);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_filter, logging::DEFAULT_FILTER);
        assert!(!config.profiling);
    }
}
