//! Refresh report: fetch, validate, sample and aggregate in one pass.

use std::future::Future;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::estimation::{aggregate_estimate, EstimationResult};
use crate::models::{FlightMarker, Snapshot};
use crate::sampling::validate_and_sample;

pub const NO_ACTIVE_FLIGHTS: &str = "No active flights found.";
pub const NO_GLOBAL_METRICS: &str = "No global metrics available.";
pub const NO_ALTERNATIVE_ENERGY: &str = "No alternative energy data available.";

/// Anything that can produce a state snapshot. Failures are reported inside
/// the [`Snapshot`], never as an `Err`.
pub trait SnapshotSource {
    fn fetch_snapshot(&self) -> impl Future<Output = Snapshot> + Send;
}

/// Everything the display layer needs after a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub fetched_at: DateTime<Utc>,
    /// Flights on the map.
    pub shown: usize,
    /// Raw rows received from upstream.
    pub total: usize,
    pub markers: Vec<FlightMarker>,
    pub count_text: String,
    pub global_metrics: Option<EstimationResult>,
    pub global_stats: Vec<String>,
    pub alternative_energy: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
}

impl RefreshReport {
    pub fn build<R: Rng + ?Sized>(snapshot: Snapshot, rng: &mut R, fetched_at: DateTime<Utc>) -> Self {
        let upstream_error = snapshot.error.as_ref().map(ToString::to_string);
        let outcome = validate_and_sample(&snapshot.rows, rng);

        if outcome.flights.is_empty() {
            return Self {
                fetched_at,
                shown: 0,
                total: outcome.total_seen,
                markers: Vec::new(),
                count_text: NO_ACTIVE_FLIGHTS.to_string(),
                global_metrics: None,
                global_stats: vec![NO_GLOBAL_METRICS.to_string()],
                alternative_energy: vec![NO_ALTERNATIVE_ENERGY.to_string()],
                upstream_error,
            };
        }

        let shown = outcome.flights.len();
        let count = u32::try_from(shown).unwrap_or(u32::MAX);
        let metrics = aggregate_estimate(count);

        Self {
            fetched_at,
            shown,
            total: outcome.total_seen,
            markers: outcome.flights.values().map(FlightMarker::from).collect(),
            count_text: format!("Shows {} of {} flights.", shown, outcome.total_seen),
            global_metrics: Some(metrics),
            global_stats: vec![
                format!("Total fuel consumption: {:.2} kg", metrics.fuel_kg),
                format!("Total CO2 emissions: {:.2} kg", metrics.co2_kg),
            ],
            alternative_energy: vec![
                format!("Solar energy: {:.2} W", metrics.solar_watts),
                format!("Wind energy: {:.2} W", metrics.wind_watts),
            ],
            upstream_error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// One refresh trigger: fetch a snapshot and build its report.
pub async fn refresh<S, R>(source: &S, rng: &mut R) -> RefreshReport
where
    S: SnapshotSource + ?Sized,
    R: Rng + ?Sized,
{
    let snapshot = source.fetch_snapshot().await;
    RefreshReport::build(snapshot, rng, Utc::now())
}
