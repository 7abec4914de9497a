//! Configuration system (layered: code > env > defaults).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{IdentityError, Result};

/// Default API origin when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Client configuration.
///
/// Resolution order:
/// 1. Values set in code through the `with_*` builders
/// 2. Environment variables (`UNDERROOF_BASE_URL`, `UNDERROOF_HOME`), `.env` included
/// 3. Built-in defaults
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use underroof::config::ClientConfig;
///
/// let config = ClientConfig::new("https://house.example.com")
///     .with_redirect_delay(Duration::from_millis(500));
/// assert_eq!(config.token_url(), "https://house.example.com/api/token/");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    state_dir: PathBuf,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    redirect_delay: Duration,
    resync_delay: Duration,
    notice_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            state_dir: default_state_dir(),
            access_ttl: chrono::Duration::days(1),
            refresh_ttl: chrono::Duration::days(7),
            redirect_delay: Duration::from_millis(1500),
            resync_delay: Duration::from_secs(1),
            notice_ttl: Duration::from_secs(5),
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        if let Ok(url) = std::env::var("UNDERROOF_BASE_URL") {
            config.base_url = normalize_base_url(url);
        }
        if let Some(home) = std::env::var_os("UNDERROOF_HOME") {
            config.state_dir = PathBuf::from(home);
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(url.into());
        self
    }

    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    /// Advisory cookie lifetimes; real expiry is enforced by the API.
    pub fn with_token_ttls(mut self, access: chrono::Duration, refresh: chrono::Duration) -> Self {
        self.access_ttl = access;
        self.refresh_ttl = refresh;
        self
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn with_resync_delay(mut self, delay: Duration) -> Self {
        self.resync_delay = delay;
        self
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// Zero every UI delay. Useful for scripted runs and tests.
    pub fn without_delays(self) -> Self {
        self.with_redirect_delay(Duration::ZERO)
            .with_resync_delay(Duration::ZERO)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token/", self.base_url)
    }

    pub fn profile_url(&self) -> String {
        format!("{}/api/profile/me/", self.base_url)
    }

    pub fn state_dir(&self) -> &PathBuf {
        &self.state_dir
    }

    pub fn access_ttl(&self) -> chrono::Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        self.refresh_ttl
    }

    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay
    }

    pub fn resync_delay(&self) -> Duration {
        self.resync_delay
    }

    pub fn notice_ttl(&self) -> Duration {
        self.notice_ttl
    }

    /// Reject configurations that cannot reach any API.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(IdentityError::Configuration(format!(
                "base URL must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.access_ttl <= chrono::Duration::zero() || self.refresh_ttl <= chrono::Duration::zero()
        {
            return Err(IdentityError::Configuration(
                "token lifetimes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_state_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".underroof"))
        .unwrap_or_else(|| PathBuf::from(".underroof"))
}
