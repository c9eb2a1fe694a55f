//! Selection resolver: which flight is being inspected, and its estimate.
//!
//! Nothing is remembered between batches. Every batch of activation signals
//! is resolved from scratch against the markers currently on the map.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::category::{AircraftCategory, CategoryLookup};
use crate::estimation::{estimate_flight, EstimationResult};
use crate::models::FlightMarker;

pub const NO_FLIGHT_INFORMATION: &str = "No flight information available.";
pub const FLIGHT_NOT_FOUND: &str = "No flight information found.";

/// Placeholder velocity range for markers without telemetry (m/s).
pub const PLACEHOLDER_VELOCITY_MPS: RangeInclusive<f64> = 150.0..=900.0;
/// Placeholder altitude range for markers without telemetry (m).
pub const PLACEHOLDER_ALTITUDE_M: RangeInclusive<f64> = 5000.0..=12000.0;
/// Assumed hours flown, used to turn a velocity into a distance.
pub const FLIGHT_HOURS: RangeInclusive<f64> = 1.0..=3.0;

pub const FALLBACK_VELOCITY_MPS: f64 = 250.0;
pub const FALLBACK_ALTITUDE_M: f64 = 10_000.0;

const MPS_TO_KMH: f64 = 3.6;

/// One marker activation signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTrigger {
    pub icao24: String,
    /// Activation counter; missing counts as zero.
    #[serde(default)]
    pub n_clicks: Option<u64>,
}

impl SelectionTrigger {
    pub fn new(icao24: impl Into<String>, n_clicks: Option<u64>) -> Self {
        Self {
            icao24: icao24.into(),
            n_clicks,
        }
    }

    fn count(&self) -> u64 {
        self.n_clicks.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Resolved(String),
}

/// Highest counter wins; equal counters go to the lowest identifier.
pub fn resolve_selection(batch: &[SelectionTrigger]) -> SelectionState {
    batch
        .iter()
        .max_by(|a, b| {
            a.count()
                .cmp(&b.count())
                .then_with(|| b.icao24.cmp(&a.icao24))
        })
        .map_or(SelectionState::Idle, |winner| {
            SelectionState::Resolved(winner.icao24.clone())
        })
}

/// Where velocity and altitude came from when the marker could not supply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryFallback {
    /// Marker had no telemetry; random placeholders were drawn.
    Placeholder,
    /// Marker telemetry was not numeric; fixed defaults were used.
    ParseFailure,
}

/// Velocity and altitude read from a marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryReading {
    pub velocity_mps: f64,
    pub altitude_m: f64,
    pub fallback: Option<TelemetryFallback>,
}

impl TelemetryReading {
    fn parse_failure() -> Self {
        Self {
            velocity_mps: FALLBACK_VELOCITY_MPS,
            altitude_m: FALLBACK_ALTITUDE_M,
            fallback: Some(TelemetryFallback::ParseFailure),
        }
    }
}

pub fn read_telemetry<R: Rng + ?Sized>(marker: &FlightMarker, rng: &mut R) -> TelemetryReading {
    let mut placeholder = false;

    let velocity_mps = match &marker.velocity_mps {
        Some(value) => match value.as_f64() {
            Some(velocity) => velocity,
            None => return TelemetryReading::parse_failure(),
        },
        None => {
            placeholder = true;
            rng.random_range(PLACEHOLDER_VELOCITY_MPS)
        }
    };
    let altitude_m = match &marker.altitude_m {
        Some(value) => match value.as_f64() {
            Some(altitude) => altitude,
            None => return TelemetryReading::parse_failure(),
        },
        None => {
            placeholder = true;
            rng.random_range(PLACEHOLDER_ALTITUDE_M)
        }
    };

    TelemetryReading {
        velocity_mps,
        altitude_m,
        fallback: placeholder.then_some(TelemetryFallback::Placeholder),
    }
}

/// Display bundle for the inspected flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDetail {
    pub icao24: String,
    pub callsign: String,
    pub country: String,
    pub velocity_mps: f64,
    pub altitude_m: f64,
    /// Approximation: velocity times one to three flight hours.
    pub estimated_distance_km: f64,
    pub category: AircraftCategory,
    /// Category rate after the altitude adjustment.
    pub fuel_rate_kg_per_km: f64,
    pub estimate: EstimationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<TelemetryFallback>,
}

impl FlightDetail {
    pub fn build<R: Rng + ?Sized>(
        marker: &FlightMarker,
        reading: TelemetryReading,
        category: AircraftCategory,
        rng: &mut R,
    ) -> Self {
        let velocity_kmh = reading.velocity_mps * MPS_TO_KMH;
        let estimated_distance_km = velocity_kmh * rng.random_range(FLIGHT_HOURS);
        let flight = estimate_flight(estimated_distance_km, category, reading.altitude_m);

        Self {
            icao24: marker.icao24.clone(),
            callsign: marker.callsign.clone(),
            country: marker.country.clone(),
            velocity_mps: reading.velocity_mps,
            altitude_m: reading.altitude_m,
            estimated_distance_km,
            category,
            fuel_rate_kg_per_km: flight.fuel_rate_kg_per_km,
            estimate: flight.result,
            fallback: reading.fallback,
        }
    }

    pub fn info_lines(&self) -> Vec<String> {
        vec![
            format!("Flight number: {}", self.icao24),
            format!("Callsign: {}", self.callsign),
            format!("Origin country: {}", self.country),
            format!("Estimated flight distance: {:.2} km", self.estimated_distance_km),
            format!("Aircraft category: {} ({})", self.category, self.category.label()),
            format!("Fuel consumption: {:.2} kg", self.estimate.fuel_kg),
            format!("CO2 emissions: {:.2} kg", self.estimate.co2_kg),
        ]
    }

    pub fn energy_lines(&self) -> Vec<String> {
        vec![
            format!("Solar energy: {:.2} W", self.estimate.solar_watts),
            format!("Wind energy: {:.2} W", self.estimate.wind_watts),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// No activation signal in the batch.
    NoSelection,
    /// The winning marker is no longer displayed (e.g. after a refresh).
    NotFound { icao24: String },
    Found(Box<FlightDetail>),
}

impl SelectionOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            SelectionOutcome::NoSelection => "none",
            SelectionOutcome::NotFound { .. } => "not_found",
            SelectionOutcome::Found(_) => "found",
        }
    }

    /// Identifier the batch resolved to, whether or not it is still displayed.
    pub fn icao24(&self) -> Option<&str> {
        match self {
            SelectionOutcome::NoSelection => None,
            SelectionOutcome::NotFound { icao24 } => Some(icao24),
            SelectionOutcome::Found(detail) => Some(&detail.icao24),
        }
    }

    pub fn detail(&self) -> Option<&FlightDetail> {
        match self {
            SelectionOutcome::Found(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn info_lines(&self) -> Vec<String> {
        match self {
            SelectionOutcome::NoSelection => vec![NO_FLIGHT_INFORMATION.to_string()],
            SelectionOutcome::NotFound { .. } => vec![FLIGHT_NOT_FOUND.to_string()],
            SelectionOutcome::Found(detail) => detail.info_lines(),
        }
    }

    pub fn energy_lines(&self) -> Vec<String> {
        self.detail().map(FlightDetail::energy_lines).unwrap_or_default()
    }
}

/// Resolve a batch against the displayed markers and estimate the winner.
///
/// The category lookup is skipped when the marker telemetry does not parse.
pub async fn describe_selection<C, R>(
    batch: &[SelectionTrigger],
    markers: &[FlightMarker],
    lookup: &C,
    rng: &mut R,
) -> SelectionOutcome
where
    C: CategoryLookup + ?Sized,
    R: Rng + ?Sized,
{
    let icao24 = match resolve_selection(batch) {
        SelectionState::Idle => return SelectionOutcome::NoSelection,
        SelectionState::Resolved(icao24) => icao24,
    };

    let Some(marker) = markers.iter().find(|marker| marker.icao24 == icao24) else {
        return SelectionOutcome::NotFound { icao24 };
    };

    let reading = read_telemetry(marker, rng);
    let category = match reading.fallback {
        Some(TelemetryFallback::ParseFailure) => AircraftCategory::MEDIUM,
        _ => lookup.resolve_category(&marker.icao24).await,
    };

    SelectionOutcome::Found(Box::new(FlightDetail::build(marker, reading, category, rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::FixedCategory;
    use crate::models::TelemetryValue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn marker(icao24: &str, velocity: Option<TelemetryValue>, altitude: Option<TelemetryValue>) -> FlightMarker {
        FlightMarker {
            icao24: icao24.to_string(),
            callsign: format!("CS{icao24}"),
            country: "Switzerland".to_string(),
            latitude: 47.45,
            longitude: 8.56,
            velocity_mps: velocity,
            altitude_m: altitude,
        }
    }

    struct CountingLookup {
        calls: AtomicUsize,
    }

    impl CategoryLookup for CountingLookup {
        fn resolve_category(&self, _icao24: &str) -> impl Future<Output = AircraftCategory> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(AircraftCategory::SUPER_HEAVY)
        }
    }

    #[test]
    fn empty_batch_is_idle() {
        assert_eq!(resolve_selection(&[]), SelectionState::Idle);
    }

    #[test]
    fn highest_counter_wins_and_missing_counts_as_zero() {
        let batch = vec![
            SelectionTrigger::new("aaa111", None),
            SelectionTrigger::new("bbb222", Some(3)),
            SelectionTrigger::new("ccc333", Some(1)),
        ];
        assert_eq!(resolve_selection(&batch), SelectionState::Resolved("bbb222".into()));

        let only_missing = vec![SelectionTrigger::new("ddd444", None)];
        assert_eq!(resolve_selection(&only_missing), SelectionState::Resolved("ddd444".into()));
    }

    #[test]
    fn ties_go_to_lowest_identifier() {
        let batch = vec![
            SelectionTrigger::new("zzz999", Some(2)),
            SelectionTrigger::new("abc123", Some(2)),
            SelectionTrigger::new("mmm555", Some(2)),
        ];
        assert_eq!(resolve_selection(&batch), SelectionState::Resolved("abc123".into()));

        let reversed: Vec<_> = batch.into_iter().rev().collect();
        assert_eq!(resolve_selection(&reversed), SelectionState::Resolved("abc123".into()));
    }

    #[test]
    fn placeholders_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let bare = marker("abc123", None, None);
        for _ in 0..100 {
            let reading = read_telemetry(&bare, &mut rng);
            assert!(PLACEHOLDER_VELOCITY_MPS.contains(&reading.velocity_mps));
            assert!(PLACEHOLDER_ALTITUDE_M.contains(&reading.altitude_m));
            assert_eq!(reading.fallback, Some(TelemetryFallback::Placeholder));
        }
    }

    #[tokio::test]
    async fn empty_batch_reports_no_information() {
        let lookup = CountingLookup { calls: AtomicUsize::new(0) };
        let markers = vec![marker("abc123", Some(200.0.into()), Some(9000.0.into()))];
        let outcome = describe_selection(&[], &markers, &lookup, &mut StdRng::seed_from_u64(1)).await;

        assert_eq!(outcome, SelectionOutcome::NoSelection);
        assert_eq!(outcome.info_lines(), vec![NO_FLIGHT_INFORMATION.to_string()]);
        assert!(outcome.energy_lines().is_empty());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_selection_is_not_found() {
        let markers = vec![marker("abc123", None, None)];
        let batch = vec![SelectionTrigger::new("gone00", Some(5))];
        let outcome = describe_selection(
            &batch,
            &markers,
            &FixedCategory::default(),
            &mut StdRng::seed_from_u64(1),
        )
        .await;

        assert_eq!(outcome, SelectionOutcome::NotFound { icao24: "gone00".into() });
        assert_eq!(outcome.info_lines(), vec![FLIGHT_NOT_FOUND.to_string()]);
        assert_eq!(outcome.status(), "not_found");
        assert_eq!(outcome.icao24(), Some("gone00"));
    }

    #[tokio::test]
    async fn found_flight_uses_category_and_altitude() {
        let lookup = CountingLookup { calls: AtomicUsize::new(0) };
        let markers = vec![
            marker("abc123", Some(250.0.into()), Some(11_000.0.into())),
            marker("def456", Some(100.0.into()), Some(500.0.into())),
        ];
        let batch = vec![
            SelectionTrigger::new("abc123", Some(4)),
            SelectionTrigger::new("def456", Some(1)),
        ];
        let outcome = describe_selection(&batch, &markers, &lookup, &mut StdRng::seed_from_u64(9)).await;
        let detail = outcome.detail().expect("flight found");

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(detail.icao24, "abc123");
        assert_eq!(detail.callsign, "CSabc123");
        assert_eq!(detail.category, AircraftCategory::SUPER_HEAVY);
        assert_eq!(detail.fallback, None);
        // 250 m/s = 900 km/h flown for one to three hours
        assert!(detail.estimated_distance_km >= 900.0 - 1e-9);
        assert!(detail.estimated_distance_km <= 2700.0 + 1e-9);
        assert!((detail.fuel_rate_kg_per_km - 7.0 * 0.85).abs() < 1e-12);
        let expected_fuel = detail.estimated_distance_km * detail.fuel_rate_kg_per_km;
        assert!((detail.estimate.fuel_kg - expected_fuel).abs() < 1e-6);
        assert!((detail.estimate.co2_kg - expected_fuel * 3.16).abs() < 1e-6);
        assert_eq!(detail.estimate.solar_watts, 10_000.0);
        assert_eq!(outcome.info_lines().len(), 7);
        assert_eq!(outcome.info_lines()[4], "Aircraft category: 6 (super heavy)");
        assert_eq!(outcome.icao24(), Some("abc123"));
    }

    #[tokio::test]
    async fn unparseable_telemetry_uses_fixed_defaults() {
        let lookup = CountingLookup { calls: AtomicUsize::new(0) };
        let markers = vec![marker("abc123", Some(TelemetryValue::Text("fast".into())), None)];
        let batch = vec![SelectionTrigger::new("abc123", Some(1))];
        let outcome = describe_selection(&batch, &markers, &lookup, &mut StdRng::seed_from_u64(2)).await;
        let detail = outcome.detail().expect("flight found");

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
        assert_eq!(detail.fallback, Some(TelemetryFallback::ParseFailure));
        assert_eq!(detail.velocity_mps, FALLBACK_VELOCITY_MPS);
        assert_eq!(detail.altitude_m, FALLBACK_ALTITUDE_M);
        assert_eq!(detail.category, AircraftCategory::MEDIUM);
        assert!((detail.fuel_rate_kg_per_km - 3.5 * 0.85).abs() < 1e-12);
    }

    #[tokio::test]
    async fn seeded_selection_is_reproducible() {
        let markers = vec![marker("abc123", None, None)];
        let batch = vec![SelectionTrigger::new("abc123", Some(1))];
        let lookup = FixedCategory(AircraftCategory::LIGHT);

        let first = describe_selection(&batch, &markers, &lookup, &mut StdRng::seed_from_u64(5)).await;
        let second = describe_selection(&batch, &markers, &lookup, &mut StdRng::seed_from_u64(5)).await;
        assert_eq!(first, second);
        assert_eq!(
            first.detail().and_then(|detail| detail.fallback),
            Some(TelemetryFallback::Placeholder)
        );
    }
}
