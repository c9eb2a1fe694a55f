//! Server configuration from environment.

use aeroimpact_opensky::OpenSkyConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Emit logs as JSON lines instead of the human-readable format.
    pub log_json: bool,
    /// Seed for sampling and placeholder telemetry; random when unset.
    pub seed: Option<u64>,
    pub opensky: OpenSkyConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("AEROIMPACT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            log_json: env::var("AEROIMPACT_LOG_FORMAT")
                .map(|value| value.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            seed: env::var("AEROIMPACT_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
            opensky: OpenSkyConfig::from_env(),
        }
    }
}
