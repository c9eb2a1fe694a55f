//! Core data models for the snapshot pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// One upstream state vector, as a positional JSON array.
pub type RawStateRow = Vec<Value>;

/// Fixed positions inside a [`RawStateRow`].
pub mod field {
    pub const ICAO24: usize = 0;
    pub const CALLSIGN: usize = 1;
    pub const ORIGIN_COUNTRY: usize = 2;
    pub const LONGITUDE: usize = 5;
    pub const LATITUDE: usize = 6;
    pub const BARO_ALTITUDE: usize = 7;
    pub const VELOCITY: usize = 9;
    /// Shortest row that still carries every field above.
    pub const MIN_LEN: usize = VELOCITY + 1;
}

/// Shown in place of a blank callsign or country.
pub const PLACEHOLDER: &str = "N/A";

/// Result of one snapshot fetch. `error` is set when the rows are empty
/// because the upstream call failed.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Upstream UNIX timestamp of the snapshot, when reported.
    pub time: Option<i64>,
    pub rows: Vec<RawStateRow>,
    pub error: Option<TransportError>,
}

impl Snapshot {
    pub fn new(time: Option<i64>, rows: Vec<RawStateRow>) -> Self {
        Self {
            time,
            rows,
            error: None,
        }
    }

    pub fn failed(error: TransportError) -> Self {
        Self {
            time: None,
            rows: Vec::new(),
            error: Some(error),
        }
    }
}

/// A validated aircraft state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Barometric altitude in meters
    pub altitude_m: f64,
    /// Ground velocity in m/s
    pub velocity_mps: f64,
}

/// Telemetry attribute carried on a marker. Display layers may hand values
/// back as text, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Number(f64),
    Text(String),
}

impl TelemetryValue {
    /// Finite numeric value, or `None` when the value does not parse.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            TelemetryValue::Number(value) => *value,
            TelemetryValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for TelemetryValue {
    fn from(value: f64) -> Self {
        TelemetryValue::Number(value)
    }
}

/// Structured per-marker record passed alongside the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightMarker {
    pub icao24: String,
    pub callsign: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity_mps: Option<TelemetryValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<TelemetryValue>,
}

impl FlightMarker {
    /// Hover text for the map marker.
    pub fn tooltip(&self) -> String {
        format!("Flight: {} | Country: {}", self.callsign, self.country)
    }
}

impl From<&FlightRecord> for FlightMarker {
    fn from(record: &FlightRecord) -> Self {
        Self {
            icao24: record.icao24.clone(),
            callsign: record.callsign.clone(),
            country: record.origin_country.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            velocity_mps: Some(record.velocity_mps.into()),
            altitude_m: Some(record.altitude_m.into()),
        }
    }
}
