//! Client configuration from environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://opensky-network.org/api";
pub const DEFAULT_TIMEOUT_S: u64 = 5;

#[derive(Clone)]
pub struct OpenSkyConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Default for OpenSkyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_S),
        }
    }
}

impl OpenSkyConfig {
    /// Missing credentials are not an error here; the upstream rejects the
    /// request and the fetch degrades like any other transport failure.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("OPENSKY_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            username: env::var("OPENSKY_USERNAME").ok(),
            password: env::var("OPENSKY_PASSWORD").ok(),
            timeout: Duration::from_secs(
                env::var("OPENSKY_TIMEOUT_S")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_S),
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for OpenSkyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSkyConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
