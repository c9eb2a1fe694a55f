//! Validation and bounded random sampling of raw state rows.

use std::collections::BTreeMap;

use rand::seq::index;
use rand::Rng;
use serde_json::Value;

use crate::error::SkipReason;
use crate::models::{field, FlightRecord, RawStateRow, PLACEHOLDER};

/// Smallest sample drawn when enough flights are available.
pub const MIN_SAMPLE: usize = 10;
/// One in this many valid flights is shown.
pub const SAMPLE_DIVISOR: usize = 10;

/// Sampled flights keyed by ICAO24, plus the raw row count.
#[derive(Debug, Clone, Default)]
pub struct SampleOutcome {
    pub flights: BTreeMap<String, FlightRecord>,
    /// Number of raw rows received, valid or not.
    pub total_seen: usize,
    /// Number of distinct valid flights before sampling.
    pub total_valid: usize,
}

fn truthy_text(row: &[Value], idx: usize) -> Option<&str> {
    row.get(idx)?.as_str().filter(|text| !text.is_empty())
}

fn number(row: &[Value], idx: usize, name: &'static str) -> Result<f64, SkipReason> {
    row.get(idx)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .ok_or(SkipReason::MissingNumber(name))
}

fn normalize(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Check one raw row. Zero is a valid coordinate, altitude or velocity.
pub fn validate_row(row: &[Value]) -> Result<FlightRecord, SkipReason> {
    if row.len() < field::MIN_LEN {
        return Err(SkipReason::TooShort(row.len()));
    }

    let icao24 = truthy_text(row, field::ICAO24)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(SkipReason::MissingIdentifier)?;
    let callsign = truthy_text(row, field::CALLSIGN).ok_or(SkipReason::MissingCallsign)?;
    let country = truthy_text(row, field::ORIGIN_COUNTRY).ok_or(SkipReason::MissingCountry)?;

    Ok(FlightRecord {
        icao24: icao24.to_string(),
        callsign: normalize(callsign),
        origin_country: normalize(country),
        longitude: number(row, field::LONGITUDE, "longitude")?,
        latitude: number(row, field::LATITUDE, "latitude")?,
        altitude_m: number(row, field::BARO_ALTITUDE, "altitude")?,
        velocity_mps: number(row, field::VELOCITY, "velocity")?,
    })
}

/// Keep every valid row, keyed by ICAO24. Later rows replace earlier ones.
pub fn validate_rows(rows: &[RawStateRow]) -> BTreeMap<String, FlightRecord> {
    let mut valid = BTreeMap::new();
    for row in rows {
        if let Ok(record) = validate_row(row) {
            valid.insert(record.icao24.clone(), record);
        }
    }
    valid
}

/// `clamp(total_valid / 10, 10, total_valid)`.
pub fn sample_size(total_valid: usize) -> usize {
    (total_valid / SAMPLE_DIVISOR).max(MIN_SAMPLE).min(total_valid)
}

/// Draw a uniform subset of [`sample_size`] flights without replacement.
pub fn sample_flights<R: Rng + ?Sized>(
    valid: BTreeMap<String, FlightRecord>,
    rng: &mut R,
) -> BTreeMap<String, FlightRecord> {
    let total = valid.len();
    if total == 0 {
        return valid;
    }

    let mut keep = vec![false; total];
    for idx in index::sample(rng, total, sample_size(total)) {
        keep[idx] = true;
    }

    valid
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, keep)| keep.then_some(entry))
        .collect()
}

pub fn validate_and_sample<R: Rng + ?Sized>(rows: &[RawStateRow], rng: &mut R) -> SampleOutcome {
    let valid = validate_rows(rows);
    let total_valid = valid.len();
    SampleOutcome {
        flights: sample_flights(valid, rng),
        total_seen: rows.len(),
        total_valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn row(icao24: &str, callsign: Value, alt: Value, vel: Value) -> RawStateRow {
        vec![
            json!(icao24),
            callsign,
            json!("Germany"),
            json!(1_700_000_000),
            json!(1_700_000_000),
            json!(8.56),
            json!(50.03),
            alt,
            json!(false),
            vel,
            json!(90.0),
        ]
    }

    fn valid_rows(count: usize) -> Vec<RawStateRow> {
        (0..count)
            .map(|i| row(&format!("a{i:05x}"), json!("TEST01 "), json!(10_000.0), json!(230.0)))
            .collect()
    }

    /// Counts calls so tests can assert the source was never consulted.
    struct CountingRng {
        inner: StdRng,
        calls: usize,
    }

    impl rand::RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.calls += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.calls += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            self.calls += 1;
            self.inner.fill_bytes(dst)
        }
    }

    #[test]
    fn rejects_rows_missing_required_fields() {
        let null_alt = row("abc123", json!("DLH1"), Value::Null, json!(200.0));
        assert_eq!(validate_row(&null_alt), Err(SkipReason::MissingNumber("altitude")));

        let null_vel = row("abc123", json!("DLH1"), json!(100.0), Value::Null);
        assert_eq!(validate_row(&null_vel), Err(SkipReason::MissingNumber("velocity")));

        let no_callsign = row("abc123", Value::Null, json!(100.0), json!(200.0));
        assert_eq!(validate_row(&no_callsign), Err(SkipReason::MissingCallsign));

        let empty_callsign = row("abc123", json!(""), json!(100.0), json!(200.0));
        assert_eq!(validate_row(&empty_callsign), Err(SkipReason::MissingCallsign));

        let no_id = row("", json!("DLH1"), json!(100.0), json!(200.0));
        assert_eq!(validate_row(&no_id), Err(SkipReason::MissingIdentifier));

        let mut no_lon = row("abc123", json!("DLH1"), json!(100.0), json!(200.0));
        no_lon[field::LONGITUDE] = Value::Null;
        assert_eq!(validate_row(&no_lon), Err(SkipReason::MissingNumber("longitude")));

        let short = vec![json!("abc123"), json!("DLH1")];
        assert_eq!(validate_row(&short), Err(SkipReason::TooShort(2)));
    }

    #[test]
    fn zero_values_are_valid() {
        let mut zero = row("abc123", json!("DLH1"), json!(0), json!(0.0));
        zero[field::LONGITUDE] = json!(0.0);
        zero[field::LATITUDE] = json!(0);
        let record = validate_row(&zero).unwrap();
        assert_eq!(record.altitude_m, 0.0);
        assert_eq!(record.velocity_mps, 0.0);
        assert_eq!(record.latitude, 0.0);
    }

    #[test]
    fn trims_and_fills_placeholders() {
        let mut blank = row(" abc123 ", json!("   "), json!(100.0), json!(200.0));
        blank[field::ORIGIN_COUNTRY] = json!(" Spain ");
        let record = validate_row(&blank).unwrap();
        assert_eq!(record.icao24, "abc123");
        assert_eq!(record.callsign, PLACEHOLDER);
        assert_eq!(record.origin_country, "Spain");
    }

    #[test]
    fn duplicate_identifiers_keep_last_row() {
        let rows = vec![
            row("abc123", json!("FIRST"), json!(100.0), json!(200.0)),
            row("abc123", json!("SECOND"), json!(200.0), json!(210.0)),
        ];
        let valid = validate_rows(&rows);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid["abc123"].callsign, "SECOND");
        assert_eq!(valid["abc123"].altitude_m, 200.0);
    }

    #[test]
    fn sample_size_is_clamped() {
        assert_eq!(sample_size(0), 0);
        assert_eq!(sample_size(3), 3);
        assert_eq!(sample_size(10), 10);
        assert_eq!(sample_size(99), 10);
        assert_eq!(sample_size(150), 15);
        assert_eq!(sample_size(10_000), 1000);
    }

    #[test]
    fn sample_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for total in [10usize, 11, 57, 100, 101, 345] {
            let outcome = validate_and_sample(&valid_rows(total), &mut rng);
            let shown = outcome.flights.len();
            assert!((10..=total).contains(&shown));
            assert_eq!(shown, sample_size(total));
            assert_eq!(outcome.total_valid, total);
            assert!(outcome.flights.keys().all(|id| id.starts_with('a')));
        }
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let rows = valid_rows(250);
        let first = validate_and_sample(&rows, &mut StdRng::seed_from_u64(42));
        let second = validate_and_sample(&rows, &mut StdRng::seed_from_u64(42));
        assert_eq!(first.flights.len(), 25);
        assert_eq!(
            first.flights.keys().collect::<Vec<_>>(),
            second.flights.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_input_skips_sampling() {
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(1),
            calls: 0,
        };
        let rows = vec![row("abc123", Value::Null, json!(1.0), json!(1.0))];
        let outcome = validate_and_sample(&rows, &mut rng);
        assert!(outcome.flights.is_empty());
        assert_eq!(outcome.total_seen, 1);
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn total_seen_counts_raw_rows() {
        let mut rows = valid_rows(3);
        rows.push(row("bad", json!("X"), Value::Null, json!(1.0)));
        rows.push(rows[0].clone());
        let outcome = validate_and_sample(&rows, &mut StdRng::seed_from_u64(3));
        assert_eq!(outcome.total_seen, 5);
        assert_eq!(outcome.total_valid, 3);
        assert_eq!(outcome.flights.len(), 3);
    }
}
