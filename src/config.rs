use std::time::Duration;

use actix_web::cookie::Key;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_APP_NAME: &str = "IVF Care";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 480;
const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const MIN_SESSION_KEY_LEN: usize = 64;

/// Runtime configuration, read once at startup from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub bind_addr: String,
    pub app_name: String,
    pub session_ttl_minutes: i64,
    pub http_timeout: Duration,
    pub cookie_secure: bool,
    session_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cookie_secure: false,
            session_key: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Missing or malformed values fall
    /// back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = non_empty("API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let session_ttl_minutes = match non_empty("SESSION_TTL_MINUTES") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n > MAX_SESSION_TTL_MINUTES => {
                    log::warn!("SESSION_TTL_MINUTES={n} too large, capping at {MAX_SESSION_TTL_MINUTES}");
                    MAX_SESSION_TTL_MINUTES
                }
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!("Ignoring invalid SESSION_TTL_MINUTES={raw:?}, using {DEFAULT_SESSION_TTL_MINUTES}");
                    DEFAULT_SESSION_TTL_MINUTES
                }
            },
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        let http_timeout = match non_empty("HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n > 0 => Duration::from_secs(n),
                _ => {
                    log::warn!("Ignoring invalid HTTP_TIMEOUT_SECS={raw:?}, using {DEFAULT_HTTP_TIMEOUT_SECS}");
                    defaults.http_timeout
                }
            },
            None => defaults.http_timeout,
        };

        let cookie_secure = non_empty("COOKIE_SECURE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            api_base_url,
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
            app_name: non_empty("APP_NAME").unwrap_or(defaults.app_name),
            session_ttl_minutes,
            http_timeout,
            cookie_secure,
            session_key: non_empty("SESSION_KEY"),
        }
    }

    /// Cookie signing key. Sessions survive restarts only when SESSION_KEY is set.
    pub fn session_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need {MIN_SESSION_KEY_LEN}+), generating random key",
                    val.len()
                );
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}
