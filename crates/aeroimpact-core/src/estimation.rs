//! Environmental estimation engine.
//!
//! Illustrative approximations only: fuel burn is linear in distance, the
//! alternative-energy figures are what hypothetical on-board panels and
//! rotors could yield. Every function here is pure.

use serde::{Deserialize, Serialize};

use crate::category::AircraftCategory;

/// Sea-level air density in kg/m³.
pub const AIR_DENSITY_KG_M3: f64 = 1.225;
/// Altitude from which the cruise efficiency factor applies (inclusive).
pub const HIGH_ALTITUDE_THRESHOLD_M: f64 = 3000.0;
pub const HIGH_ALTITUDE_FACTOR: f64 = 0.85;
/// Fuel rate for codes missing from the category table.
pub const DEFAULT_CATEGORY_FUEL_RATE: f64 = 3.5;
/// Distance assumed per flight for the aggregate figures.
pub const NOMINAL_DISTANCE_KM: f64 = 1000.0;

/// Estimated fuel, emissions and alternative-energy yields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EstimationResult {
    pub fuel_kg: f64,
    pub co2_kg: f64,
    pub solar_watts: f64,
    pub wind_watts: f64,
}

/// Linear fuel burn model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelModel {
    pub fuel_rate_kg_per_km: f64,
    /// kg of CO2 released per kg of jet fuel burned
    pub co2_kg_per_kg_fuel: f64,
}

impl Default for FuelModel {
    fn default() -> Self {
        Self {
            fuel_rate_kg_per_km: 2.5,
            co2_kg_per_kg_fuel: 3.16,
        }
    }
}

impl FuelModel {
    pub fn with_rate(fuel_rate_kg_per_km: f64) -> Self {
        Self {
            fuel_rate_kg_per_km,
            ..Self::default()
        }
    }

    /// Returns `(fuel_kg, co2_kg)` for `count` flights over `distance_km` each.
    pub fn estimate(&self, distance_km: f64, count: u32) -> (f64, f64) {
        let fuel = f64::from(count) * distance_km * self.fuel_rate_kg_per_km;
        (fuel, fuel * self.co2_kg_per_kg_fuel)
    }
}

/// Fuselage-mounted solar panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarModel {
    pub panel_area_m2: f64,
    pub efficiency: f64,
    pub irradiance_w_m2: f64,
}

impl Default for SolarModel {
    fn default() -> Self {
        Self {
            panel_area_m2: 50.0,
            efficiency: 0.2,
            irradiance_w_m2: 1000.0,
        }
    }
}

impl SolarModel {
    pub fn estimate(&self, count: u32) -> f64 {
        f64::from(count) * self.panel_area_m2 * self.efficiency * self.irradiance_w_m2
    }
}

/// Ram-air turbine driven by the relative airflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindModel {
    pub air_speed_mps: f64,
    pub efficiency: f64,
    pub rotor_area_m2: f64,
}

impl Default for WindModel {
    fn default() -> Self {
        Self {
            air_speed_mps: 250.0,
            efficiency: 0.3,
            rotor_area_m2: 1.5,
        }
    }
}

impl WindModel {
    pub fn estimate(&self, count: u32) -> f64 {
        f64::from(count)
            * 0.5
            * AIR_DENSITY_KG_M3
            * self.rotor_area_m2
            * self.air_speed_mps.powi(3)
            * self.efficiency
    }
}

/// `(fuel_kg, co2_kg)` with the default fuel model.
pub fn fuel_and_co2(distance_km: f64, count: u32) -> (f64, f64) {
    FuelModel::default().estimate(distance_km, count)
}

pub fn solar_energy(count: u32) -> f64 {
    SolarModel::default().estimate(count)
}

pub fn wind_energy(count: u32) -> f64 {
    WindModel::default().estimate(count)
}

/// Fuel burn rate in kg/km for a weight category.
pub fn category_fuel_rate(category: AircraftCategory) -> f64 {
    match category.code() {
        2 => 1.0,
        3 => 2.0,
        4 => 3.5,
        5 => 5.0,
        6 => 7.0,
        _ => DEFAULT_CATEGORY_FUEL_RATE,
    }
}

/// Multiplier on the fuel rate; thinner air at cruise altitude burns less.
pub fn altitude_factor(altitude_m: f64) -> f64 {
    if altitude_m >= HIGH_ALTITUDE_THRESHOLD_M {
        HIGH_ALTITUDE_FACTOR
    } else {
        1.0
    }
}

/// Estimate for a single flight together with the fuel rate it was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightEstimate {
    pub fuel_rate_kg_per_km: f64,
    pub result: EstimationResult,
}

pub fn estimate_flight(distance_km: f64, category: AircraftCategory, altitude_m: f64) -> FlightEstimate {
    let fuel_rate = category_fuel_rate(category) * altitude_factor(altitude_m);
    let (fuel_kg, co2_kg) = FuelModel::with_rate(fuel_rate).estimate(distance_km, 1);
    FlightEstimate {
        fuel_rate_kg_per_km: fuel_rate,
        result: EstimationResult {
            fuel_kg,
            co2_kg,
            solar_watts: solar_energy(1),
            wind_watts: wind_energy(1),
        },
    }
}

/// Totals for `count` flights at the nominal distance and default rates.
pub fn aggregate_estimate(count: u32) -> EstimationResult {
    let (fuel_kg, co2_kg) = fuel_and_co2(NOMINAL_DISTANCE_KM, count);
    EstimationResult {
        fuel_kg,
        co2_kg,
        solar_watts: solar_energy(count),
        wind_watts: wind_energy(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fuel_and_co2_with_default_rates() {
        let (fuel, co2) = fuel_and_co2(1000.0, 1);
        assert_close(fuel, 2500.0);
        assert_close(co2, 7900.0);
    }

    #[test]
    fn fuel_scales_with_flight_count() {
        let (fuel, _) = fuel_and_co2(1000.0, 4);
        assert_close(fuel, 10_000.0);
        assert_eq!(fuel_and_co2(1000.0, 0), (0.0, 0.0));
    }

    #[test]
    fn solar_and_wind_defaults() {
        assert_close(solar_energy(1), 10_000.0);
        assert_close(wind_energy(1), 4_306_640.625);
        assert_close(wind_energy(2), 8_613_281.25);
    }

    #[test]
    fn category_rates() {
        assert_eq!(category_fuel_rate(AircraftCategory::LIGHT), 1.0);
        assert_eq!(category_fuel_rate(AircraftCategory::SUPER_HEAVY), 7.0);
        assert_eq!(category_fuel_rate(AircraftCategory::new(99)), 3.5);
        assert_eq!(category_fuel_rate(AircraftCategory::new(0)), 3.5);
    }

    #[test]
    fn altitude_boundary_is_inclusive() {
        assert_eq!(altitude_factor(3000.0), 0.85);
        assert_eq!(altitude_factor(2999.999), 1.0);
        assert_eq!(altitude_factor(0.0), 1.0);
    }

    #[test]
    fn flight_estimate_combines_category_and_altitude() {
        let estimate = estimate_flight(100.0, AircraftCategory::HEAVY, 11_000.0);
        assert_close(estimate.fuel_rate_kg_per_km, 5.0 * 0.85);
        assert_close(estimate.result.fuel_kg, 425.0);
        assert_close(estimate.result.co2_kg, 425.0 * 3.16);
        assert_close(estimate.result.solar_watts, 10_000.0);

        let low = estimate_flight(100.0, AircraftCategory::HEAVY, 500.0);
        assert_close(low.result.fuel_kg, 500.0);
    }

    #[test]
    fn aggregate_uses_nominal_distance() {
        let total = aggregate_estimate(3);
        assert_close(total.fuel_kg, 7500.0);
        assert_close(total.co2_kg, 23_700.0);
        assert_close(total.solar_watts, 30_000.0);
    }
}
