//! In-memory application state.

use aeroimpact_core::FlightMarker;
use aeroimpact_opensky::OpenSkyClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use crate::config::Config;

/// Markers published by the latest accepted refresh.
#[derive(Debug, Clone, Default)]
pub struct RenderedFlights {
    /// Sequence number of the refresh that produced these markers (0 = none yet).
    pub seq: u64,
    pub markers: Vec<FlightMarker>,
}

/// Application state shared by all handlers.
pub struct AppState {
    opensky: OpenSkyClient,
    rendered: RwLock<RenderedFlights>,
    refresh_counter: AtomicU64,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = OpenSkyClient::new(config.opensky.clone())?;
        Ok(Self::with_client(client, config.seed))
    }

    pub fn with_client(opensky: OpenSkyClient, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            opensky,
            rendered: RwLock::new(RenderedFlights::default()),
            refresh_counter: AtomicU64::new(0),
            rng: Mutex::new(rng),
        }
    }

    pub fn opensky(&self) -> &OpenSkyClient {
        &self.opensky
    }

    /// Take a sequence number for a refresh that is about to start.
    pub fn begin_refresh(&self) -> u64 {
        self.refresh_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the rendered markers unless a newer refresh already published.
    /// Returns `false` when the result was stale and discarded.
    pub fn publish(&self, seq: u64, markers: Vec<FlightMarker>) -> bool {
        let mut rendered = self
            .rendered
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if seq <= rendered.seq {
            return false;
        }
        *rendered = RenderedFlights { seq, markers };
        true
    }

    pub fn rendered(&self) -> RenderedFlights {
        self.rendered
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn rendered_markers(&self) -> Vec<FlightMarker> {
        self.rendered().markers
    }

    /// Independent RNG for one request, derived from the shared seed stream.
    pub fn request_rng(&self) -> StdRng {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        StdRng::from_rng(&mut *rng)
    }
}
