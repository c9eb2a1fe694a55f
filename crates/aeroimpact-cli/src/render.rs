//! Plain-text rendering of pipeline results.

use aeroimpact_core::{FlightDetail, RefreshReport, SelectionOutcome};
use std::fmt::Write;

fn section(out: &mut String, title: &str, lines: &[String]) {
    let _ = writeln!(out, "== {} ==", title);
    for line in lines {
        let _ = writeln!(out, "  {}", line);
    }
}

pub fn render_report(report: &RefreshReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.count_text);
    if let Some(err) = &report.upstream_error {
        let _ = writeln!(out, "(upstream unavailable: {})", err);
    }
    section(&mut out, "Global metrics", &report.global_stats);
    section(&mut out, "Alternative energy (global)", &report.alternative_energy);

    if !report.markers.is_empty() {
        let _ = writeln!(out, "== Flights ==");
        for marker in &report.markers {
            let _ = writeln!(
                out,
                "  {:<8} {:>9.4} {:>10.4}  {}",
                marker.icao24,
                marker.latitude,
                marker.longitude,
                marker.tooltip()
            );
        }
    }
    out
}

pub fn render_detail(detail: &FlightDetail) -> String {
    let mut out = String::new();
    section(&mut out, "Flight information", &detail.info_lines());
    section(&mut out, "Alternative energy (flight)", &detail.energy_lines());
    out
}

pub fn render_outcome(outcome: &SelectionOutcome) -> String {
    match outcome.detail() {
        Some(detail) => render_detail(detail),
        None => {
            let mut out = String::new();
            section(&mut out, "Flight information", &outcome.info_lines());
            out
        }
    }
}
