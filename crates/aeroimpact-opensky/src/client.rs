//! OpenSky API HTTP client.

use aeroimpact_core::{AircraftCategory, CategoryLookup, RawStateRow, Snapshot, SnapshotSource, TransportError};
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::config::OpenSkyConfig;

/// Body of `GET /states/all`.
#[derive(Debug, Deserialize)]
pub struct StatesResponse {
    #[serde(default)]
    pub time: Option<i64>,
    /// `null` when no aircraft are tracked.
    #[serde(default)]
    pub states: Option<Vec<RawStateRow>>,
}

#[derive(Debug, Deserialize)]
struct AircraftMetadata {
    #[serde(default)]
    category: Option<i64>,
}

/// HTTP client for the OpenSky REST API.
pub struct OpenSkyClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::Malformed(err.to_string())
    } else if let Some(status) = err.status() {
        TransportError::Status(status.as_u16())
    } else {
        TransportError::Network(err.to_string())
    }
}

impl OpenSkyClient {
    pub fn new(config: OpenSkyConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;
        let username = config
            .username
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username,
            password: config.password,
            timeout: config.timeout,
        })
    }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        match self.username.as_deref() {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request.timeout(self.timeout).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response)
    }

    /// Fetch all currently tracked state vectors.
    pub async fn try_fetch_states(&self) -> Result<StatesResponse, TransportError> {
        let url = format!("{}/states/all", self.base_url);
        let response = self.send(self.authenticated(self.client.get(&url))).await?;
        response.json::<StatesResponse>().await.map_err(classify)
    }

    /// Like [`try_fetch_states`](Self::try_fetch_states), but a failure becomes an
    /// empty snapshot carrying the error.
    pub async fn fetch_states(&self) -> Snapshot {
        match self.try_fetch_states().await {
            Ok(payload) => {
                let rows = payload.states.unwrap_or_default();
                tracing::debug!("Fetched {} state vectors", rows.len());
                Snapshot::new(payload.time, rows)
            }
            Err(err) => {
                tracing::warn!("State snapshot fetch failed: {}", err);
                Snapshot::failed(err)
            }
        }
    }

    /// Raw category code for one aircraft, `None` when the field is absent.
    pub async fn try_aircraft_category(&self, icao24: &str) -> Result<Option<i64>, TransportError> {
        let url = format!("{}/metadata/aircraft/icao/{}", self.base_url, icao24);
        let response = self.send(self.client.get(&url)).await?;
        let metadata = response.json::<AircraftMetadata>().await.map_err(classify)?;
        Ok(metadata.category)
    }

    /// Category for one aircraft; medium on any failure.
    pub async fn aircraft_category(&self, icao24: &str) -> AircraftCategory {
        match self.try_aircraft_category(icao24).await {
            Ok(Some(code)) => AircraftCategory::from_code(code),
            Ok(None) => {
                tracing::debug!("No category for {}, using default", icao24);
                AircraftCategory::default()
            }
            Err(err) => {
                tracing::debug!("Category lookup for {} failed: {}", icao24, err);
                AircraftCategory::default()
            }
        }
    }
}

impl SnapshotSource for OpenSkyClient {
    fn fetch_snapshot(&self) -> impl Future<Output = Snapshot> + Send {
        self.fetch_states()
    }
}

impl CategoryLookup for OpenSkyClient {
    fn resolve_category(&self, icao24: &str) -> impl Future<Output = AircraftCategory> + Send {
        self.aircraft_category(icao24)
    }
}
