//! Subcommand logic shared by the `aeroimpact` binary.

use aeroimpact_core::{
    describe_selection, estimate_flight, fuel_and_co2, solar_energy, validate_rows, wind_energy,
    AircraftCategory, CategoryLookup, FlightMarker, SelectionOutcome, SelectionTrigger, Snapshot,
};
use rand::Rng;

/// Output lines for `aeroimpact estimate`.
///
/// With a category the figures describe a single flight at the category rate
/// and the altitude discount, and `count` is ignored.
pub fn estimate_lines(
    distance_km: f64,
    count: u32,
    category: Option<AircraftCategory>,
    altitude_m: f64,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(5);
    let (fuel_kg, co2_kg, flights) = match category {
        Some(category) => {
            let flight = estimate_flight(distance_km, category, altitude_m);
            lines.push(format!("Fuel rate: {:.3} kg/km", flight.fuel_rate_kg_per_km));
            (flight.result.fuel_kg, flight.result.co2_kg, 1)
        }
        None => {
            let (fuel_kg, co2_kg) = fuel_and_co2(distance_km, count);
            (fuel_kg, co2_kg, count)
        }
    };
    lines.push(format!("Fuel consumption: {:.2} kg", fuel_kg));
    lines.push(format!("CO2 emissions: {:.2} kg", co2_kg));
    lines.push(format!("Solar energy: {:.2} W", solar_energy(flights)));
    lines.push(format!("Wind energy: {:.2} W", wind_energy(flights)));
    lines
}

/// Resolve one flight against every valid row of the snapshot, not just a sample.
pub async fn inspect_snapshot<C, R>(
    snapshot: &Snapshot,
    icao24: &str,
    lookup: &C,
    rng: &mut R,
) -> SelectionOutcome
where
    C: CategoryLookup + ?Sized,
    R: Rng + ?Sized,
{
    let markers: Vec<FlightMarker> = validate_rows(&snapshot.rows)
        .values()
        .map(FlightMarker::from)
        .collect();
    tracing::debug!("Inspecting {} against {} valid flights", icao24, markers.len());
    let batch = [SelectionTrigger::new(icao24.trim(), Some(1))];
    describe_selection(&batch, &markers, lookup, rng).await
}
