//! CSV manifest export.
//!
//! Semicolon-delimited, UTF-8 with BOM, the dialect the fleet team's
//! spreadsheet tooling expects. One row per passenger with their stop,
//! schedule time and walking distance.

use std::collections::HashMap;

use chrono::NaiveTime;

use crate::planner::PlannedRoute;
use crate::schedule;

const BOM: &str = "\u{feff}";
const HEADER: &str = "passenger;stop;order;departure;walk_distance_m;in_vehicle_min";

/// One manifest line.
#[derive(Debug, Clone)]
pub struct ManifestRow {
    pub passenger: String,
    pub stop: String,
    pub order: usize,
    pub departure: Option<NaiveTime>,
    pub walk_distance_m: f64,
    pub in_vehicle_min: i64,
}

/// Builds manifest rows for outbound routes. `destination_arrival` is
/// the anchor used for in-vehicle time; passengers missing from `names`
/// are labeled by id.
pub fn manifest_rows(
    routes: &[PlannedRoute],
    names: &HashMap<u64, String>,
    destination_arrival: NaiveTime,
) -> Vec<ManifestRow> {
    let mut rows = Vec::new();

    for route in routes {
        for (i, stop) in route.stops.iter().enumerate() {
            let entry = route.schedule.get(i);
            let departure = entry.map(|s| s.departure);
            let stop_label = stop
                .reference_address
                .clone()
                .unwrap_or_else(|| format!("{:.6}, {:.6}", stop.lat, stop.lng));

            for &pid in &stop.passenger_ids {
                rows.push(ManifestRow {
                    passenger: names
                        .get(&pid)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", pid)),
                    stop: stop_label.clone(),
                    order: i + 1,
                    departure,
                    walk_distance_m: stop.walk_distances.get(&pid).copied().unwrap_or(0.0),
                    in_vehicle_min: departure
                        .map(|d| schedule::in_vehicle_minutes(d, destination_arrival))
                        .unwrap_or(0),
                });
            }
        }
    }

    rows
}

/// Renders rows as semicolon-delimited CSV, UTF-8 with BOM.
pub fn manifest_csv(rows: &[ManifestRow]) -> String {
    let mut out = String::from(BOM);
    out.push_str(HEADER);
    out.push('\n');

    for row in rows {
        let departure = row
            .departure
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{};{};{};{};{:.1};{}\n",
            field(&row.passenger),
            field(&row.stop),
            row.order,
            departure,
            row.walk_distance_m,
            row.in_vehicle_min,
        ));
    }

    out
}

/// Quotes a field when it contains the delimiter, quotes or newlines.
fn field(raw: &str) -> String {
    if raw.contains(';') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
