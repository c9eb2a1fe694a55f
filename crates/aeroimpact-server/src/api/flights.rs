//! Refresh and selection endpoints.

use aeroimpact_core::{
    describe_selection, refresh, FlightDetail, FlightMarker, RefreshReport, SelectionOutcome,
    SelectionTrigger, TelemetryFallback,
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::request_id::{record_refresh_seq, record_selected, RequestId};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    #[serde(flatten)]
    pub report: RefreshReport,
    /// Set when a newer refresh published first; the map keeps the newer markers.
    pub superseded: bool,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub triggers: Vec<SelectionTrigger>,
    /// Markers currently on the map. Falls back to the last published set.
    #[serde(default)]
    pub markers: Option<Vec<FlightMarker>>,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub status: &'static str,
    pub flight_info: Vec<String>,
    pub alternative_energy: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<FlightDetail>,
}

impl From<SelectionOutcome> for SelectResponse {
    fn from(outcome: SelectionOutcome) -> Self {
        Self {
            status: outcome.status(),
            flight_info: outcome.info_lines(),
            alternative_energy: outcome.energy_lines(),
            detail: outcome.detail().cloned(),
        }
    }
}

pub async fn list_rendered(State(state): State<Arc<AppState>>) -> Json<Vec<FlightMarker>> {
    Json(state.rendered_markers())
}

pub async fn refresh_flights(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> Json<RefreshResponse> {
    let seq = state.begin_refresh();
    record_refresh_seq(seq);
    let mut rng = state.request_rng();
    let report = refresh(state.opensky(), &mut rng).await;

    if let Some(err) = &report.upstream_error {
        tracing::warn!("Refresh {} degraded to no flights: {}", seq, err);
    }

    let superseded = !state.publish(seq, report.markers.clone());
    if superseded {
        tracing::info!("Refresh {} ({}) superseded by a newer refresh", seq, request_id);
    } else {
        tracing::info!("Refresh {}: {}", seq, report.count_text);
    }

    Json(RefreshResponse { report, superseded })
}

pub async fn select_flight(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectRequest>,
) -> Json<SelectResponse> {
    let markers = payload
        .markers
        .unwrap_or_else(|| state.rendered_markers());
    let mut rng = state.request_rng();
    let outcome = describe_selection(&payload.triggers, &markers, state.opensky(), &mut rng).await;

    if let Some(icao24) = outcome.icao24() {
        record_selected(icao24);
    }
    match &outcome {
        SelectionOutcome::NotFound { icao24 } => {
            tracing::debug!("Selected flight {} is no longer displayed", icao24);
        }
        SelectionOutcome::Found(detail) if detail.fallback == Some(TelemetryFallback::ParseFailure) => {
            tracing::warn!(
                "Non-numeric telemetry on marker {}, using default velocity/altitude",
                detail.icao24
            );
        }
        _ => {}
    }

    Json(SelectResponse::from(outcome))
}
