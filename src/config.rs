use std::time::Duration;

use tracing::{info, warn};

use crate::service::chat_service::SessionLimits;

pub const DEFAULT_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistral-small-latest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Runtime configuration, read once from the environment at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote completion credential. `None` keeps the agent in local-only mode.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub port: u16,
    /// Most conversations kept in memory at once.
    pub max_sessions: usize,
    /// Conversations untouched for this long are forgotten.
    pub session_idle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: DEFAULT_PORT,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_key = lookup("MISTRAL_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let request_timeout = positive(&lookup, "MISTRAL_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let session_idle = positive(&lookup, "SESSION_IDLE_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_idle);
        let max_sessions = positive(&lookup, "MAX_SESSIONS")
            .map(|n| n as usize)
            .unwrap_or(defaults.max_sessions);

        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let config = Self {
            api_key,
            api_url: lookup("MISTRAL_API_URL").unwrap_or(defaults.api_url),
            model: lookup("MISTRAL_MODEL").unwrap_or(defaults.model),
            request_timeout,
            port,
            max_sessions,
            session_idle,
        };

        if config.is_remote_configured() {
            info!("Remote completion enabled (model {})", config.model);
        } else {
            info!("MISTRAL_API_KEY not set; Chronos answers from the local pattern table");
        }
        config
    }

    pub fn is_remote_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_sessions: self.max_sessions,
            idle_timeout: self.session_idle,
        }
    }
}

/// Reads a strictly positive integer, warning about anything else.
fn positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!("Ignoring invalid {key}={raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn blank_key_means_local_only() {
        let config = Config::from_lookup(lookup(&[("MISTRAL_API_KEY", "   ")]));
        assert!(!config.is_remote_configured());
    }

    #[test]
    fn key_is_trimmed() {
        let config = Config::from_lookup(lookup(&[("MISTRAL_API_KEY", " sk-123\n")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-123"));
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[("MISTRAL_TIMEOUT_SECS", "0"), ("PORT", "3000")]));
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn session_limits_from_env() {
        let config = Config::from_lookup(lookup(&[
            ("MAX_SESSIONS", "64"),
            ("SESSION_IDLE_SECS", "nope"),
        ]));
        let limits = config.session_limits();
        assert_eq!(limits.max_sessions, 64);
        assert_eq!(limits.idle_timeout, Duration::from_secs(DEFAULT_SESSION_IDLE_SECS));
    }
}
