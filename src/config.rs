use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "HepatoGuard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Remote model used when `HEPATOGUARD_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

const DEFAULT_FALLBACK_DELAY_MS: u64 = 1500;
const DEFAULT_LOGIN_DELAY_MS: u64 = 800;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "hepatoguard_lib=info,hepatoguard=info,tower_http=warn"
}

/// Get the application data directory.
/// ~/HepatoGuard/ on all platforms, or the working directory when no home exists.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the remote model. `None` selects the fallback mode.
    pub api_key: Option<String>,
    pub model: String,
    pub gemini_url: String,
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub fallback_delay: Duration,
    pub login_delay: Duration,
    pub request_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("API_KEY").or_else(|| non_empty("GEMINI_API_KEY"));

        let bind_addr = match non_empty("HEPATOGUARD_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HEPATOGUARD_ADDR",
                value: raw,
            })?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "HEPATOGUARD_ADDR",
                    value: DEFAULT_BIND_ADDR.to_string(),
                })?,
        };

        Ok(Self {
            api_key,
            model: non_empty("HEPATOGUARD_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_url: non_empty("HEPATOGUARD_GEMINI_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
            bind_addr,
            data_dir: non_empty("HEPATOGUARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(app_data_dir),
            fallback_delay: Duration::from_millis(parse_u64(
                &lookup,
                "HEPATOGUARD_FALLBACK_DELAY_MS",
                DEFAULT_FALLBACK_DELAY_MS,
            )?),
            login_delay: Duration::from_millis(parse_u64(
                &lookup,
                "HEPATOGUARD_LOGIN_DELAY_MS",
                DEFAULT_LOGIN_DELAY_MS,
            )?),
            request_timeout: Duration::from_secs(parse_u64(
                &lookup,
                "HEPATOGUARD_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }

    /// Configuration for tests: no credential, no artificial delays.
    pub fn for_tests(data_dir: PathBuf) -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_dir,
            fallback_delay: Duration::ZERO,
            login_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_u64<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("HepatoGuard"));
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert!(!config.has_credential());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.fallback_delay, Duration::from_millis(1500));
        assert_eq!(config.login_delay, Duration::from_millis(800));
    }

    #[test]
    fn api_key_enables_credential() {
        let config = AppConfig::from_lookup(lookup_from(&[("API_KEY", "k-123")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
        assert!(config.has_credential());
    }

    #[test]
    fn gemini_api_key_is_secondary_source() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "g-456")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("g-456"));
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let config = AppConfig::from_lookup(lookup_from(&[("API_KEY", "  ")])).unwrap();
        assert!(!config.has_credential());
    }

    #[test]
    fn invalid_delay_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "HEPATOGUARD_FALLBACK_DELAY_MS",
            "soon",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("HEPATOGUARD_FALLBACK_DELAY_MS"));
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("HEPATOGUARD_ADDR", "nowhere")]));
        assert!(result.is_err());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
