//! Relay configuration, resolved once at startup from the environment.
//!
//! Every variable is optional and has a default; a missing or malformed value
//! never aborts the hook path. The resolved struct is passed by value into the
//! relay so the rest of the code carries no ambient `env::var` lookups.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_PROJECT_KEY: &str = "SCRUM";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TOTAL_TIMEOUT_SECS: u64 = 10;

/// Effective relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Root of the ticketing-integration endpoint.
    pub api_base_url: String,
    /// Project key used for extraction when `strict_prefix` is on.
    pub project_key: String,
    /// `true`: only `project_key` prefixes match; `false`: any uppercase
    /// prefix. The two historical hook-script variants disagreed here, so the
    /// choice is an explicit flag instead of two parallel implementations.
    pub strict_prefix: bool,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
    /// `false` disables both HTTP timeouts (the lax script variant).
    pub enforce_timeout: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            project_key: DEFAULT_PROJECT_KEY.to_string(),
            strict_prefix: false,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            total_timeout: Duration::from_secs(DEFAULT_TOTAL_TIMEOUT_SECS),
            enforce_timeout: true,
        }
    }
}

impl RelayConfig {
    /// Resolve the configuration from `RELAY_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: std::env::var("RELAY_API_BASE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            project_key: std::env::var("RELAY_PROJECT_KEY").unwrap_or(defaults.project_key),
            strict_prefix: bool_var("RELAY_STRICT_PREFIX", defaults.strict_prefix),
            connect_timeout: secs_var("RELAY_CONNECT_TIMEOUT_SECS", defaults.connect_timeout),
            total_timeout: secs_var("RELAY_TIMEOUT_SECS", defaults.total_timeout),
            enforce_timeout: bool_var("RELAY_ENFORCE_TIMEOUT", defaults.enforce_timeout),
        }
    }

    /// The prefix constraint handed to the extractor: `Some` in strict mode,
    /// `None` in permissive mode.
    pub fn extraction_prefix(&self) -> Option<&str> {
        if self.strict_prefix {
            Some(&self.project_key)
        } else {
            None
        }
    }
}

fn bool_var(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                tracing::warn!(name, value = %other, "unrecognized boolean, using default");
                default
            }
        },
        Err(_) => default,
    }
}

fn secs_var(name: &str, default: Duration) -> Duration {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                tracing::warn!(name, value = %raw, "unparseable seconds, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state, so each one saves and restores the
    // variables it touches and they all go through this lock.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let _guard = ENV_LOCK.lock().unwrap();
        let saved: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(name, _)| (name.to_string(), std::env::var(name).ok()))
            .collect();
        for (name, value) in vars {
            match value {
                Some(v) => unsafe { std::env::set_var(name, v) },
                None => unsafe { std::env::remove_var(name) },
            }
        }
        f();
        for (name, value) in saved {
            match value {
                Some(v) => unsafe { std::env::set_var(&name, v) },
                None => unsafe { std::env::remove_var(&name) },
            }
        }
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        with_env(
            &[
                ("RELAY_API_BASE_URL", None),
                ("RELAY_PROJECT_KEY", None),
                ("RELAY_STRICT_PREFIX", None),
                ("RELAY_CONNECT_TIMEOUT_SECS", None),
                ("RELAY_TIMEOUT_SECS", None),
                ("RELAY_ENFORCE_TIMEOUT", None),
            ],
            || {
                let config = RelayConfig::from_env();
                assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
                assert_eq!(config.project_key, "SCRUM");
                assert!(!config.strict_prefix);
                assert_eq!(config.connect_timeout, Duration::from_secs(5));
                assert_eq!(config.total_timeout, Duration::from_secs(10));
                assert!(config.enforce_timeout);
                assert_eq!(config.extraction_prefix(), None);
            },
        );
    }

    #[test]
    fn overrides_apply_and_trailing_slash_is_dropped() {
        with_env(
            &[
                ("RELAY_API_BASE_URL", Some("https://tracker.example/api/v2/")),
                ("RELAY_PROJECT_KEY", Some("OPS")),
                ("RELAY_STRICT_PREFIX", Some("true")),
                ("RELAY_CONNECT_TIMEOUT_SECS", Some("2")),
                ("RELAY_TIMEOUT_SECS", Some("3")),
                ("RELAY_ENFORCE_TIMEOUT", Some("false")),
            ],
            || {
                let config = RelayConfig::from_env();
                assert_eq!(config.api_base_url, "https://tracker.example/api/v2");
                assert_eq!(config.extraction_prefix(), Some("OPS"));
                assert_eq!(config.connect_timeout, Duration::from_secs(2));
                assert_eq!(config.total_timeout, Duration::from_secs(3));
                assert!(!config.enforce_timeout);
            },
        );
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        with_env(
            &[
                ("RELAY_STRICT_PREFIX", Some("maybe")),
                ("RELAY_TIMEOUT_SECS", Some("soon")),
            ],
            || {
                let config = RelayConfig::from_env();
                assert!(!config.strict_prefix);
                assert_eq!(config.total_timeout, Duration::from_secs(10));
            },
        );
    }
}
