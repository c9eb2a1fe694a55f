pub mod category;
pub mod error;
pub mod estimation;
pub mod models;
pub mod report;
pub mod sampling;
pub mod selection;

pub use category::{AircraftCategory, CategoryLookup, FixedCategory};
pub use error::{SkipReason, TransportError};
pub use estimation::{
    aggregate_estimate, altitude_factor, category_fuel_rate, estimate_flight, fuel_and_co2,
    solar_energy, wind_energy, EstimationResult, FlightEstimate, FuelModel, SolarModel, WindModel,
};
pub use models::{FlightMarker, FlightRecord, RawStateRow, Snapshot, TelemetryValue};
pub use report::{refresh, RefreshReport, SnapshotSource};
pub use sampling::{sample_flights, sample_size, validate_and_sample, validate_row, validate_rows, SampleOutcome};
pub use selection::{
    describe_selection, resolve_selection, FlightDetail, SelectionOutcome, SelectionState,
    SelectionTrigger, TelemetryFallback,
};
