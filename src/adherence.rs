//! Planned-versus-executed route comparison.
//!
//! Coverage is bidirectional: a vehicle that left the planned corridor
//! and a vehicle that shortcut past part of it both lose adherence. The
//! final percentage is the worse of the two directions.

use serde::Serialize;

use crate::geo;

/// Metrics from comparing an executed path against a planned one.
///
/// Fields are `None` when the corresponding input was missing or empty.
/// In particular, adherence is never assumed when there is no planned
/// path to compare against.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdherenceReport {
    pub km_planned: Option<f64>,
    pub km_executed: Option<f64>,
    pub max_deviation_m: Option<f64>,
    pub adherence_percent: Option<f64>,
    pub points_off_route: Option<usize>,
}

/// Minimum haversine distance from `point` to any vertex of `path`.
/// An empty path is infinitely far away.
pub fn distance_to_path(point: (f64, f64), path: &[(f64, f64)]) -> f64 {
    path.iter().fold(f64::INFINITY, |best, &(lat, lng)| {
        best.min(geo::haversine(point.0, point.1, lat, lng))
    })
}

/// Compares an executed coordinate path against the planned one.
///
/// Direction 1: share of executed points within `tolerance_m` of the
/// planned path. Direction 2: share of planned points covered by some
/// executed point. Adherence is `min(d1, d2) * 100`.
pub fn compare(
    planned: Option<&[(f64, f64)]>,
    executed: &[(f64, f64)],
    tolerance_m: f64,
) -> AdherenceReport {
    let mut report = AdherenceReport::default();

    if executed.is_empty() {
        return report;
    }
    report.km_executed = Some(round2(geo::total_distance_km(executed)));

    let planned = match planned {
        Some(path) if !path.is_empty() => path,
        // No planned path: executed distance only, adherence undefined.
        _ => return report,
    };
    report.km_planned = Some(round2(geo::total_distance_km(planned)));

    let mut points_off = 0usize;
    let mut max_deviation = 0.0f64;
    for &point in executed {
        let dist = distance_to_path(point, planned);
        if dist > tolerance_m {
            points_off += 1;
        }
        if dist > max_deviation {
            max_deviation = dist;
        }
    }
    report.max_deviation_m = Some(round2(max_deviation));
    report.points_off_route = Some(points_off);

    let direction1 = (executed.len() - points_off) as f64 / executed.len() as f64;

    let covered = planned
        .iter()
        .filter(|&&point| distance_to_path(point, executed) <= tolerance_m)
        .count();
    let direction2 = covered as f64 / planned.len() as f64;

    report.adherence_percent = Some(round2(direction1.min(direction2) * 100.0));
    report
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Vec<(f64, f64)> {
        (0..10)
            .map(|i| (-22.90 - 0.001 * i as f64, -47.06))
            .collect()
    }

    #[test]
    fn test_identical_paths_fully_adhere() {
        let route = path();
        let report = compare(Some(&route), &route, 100.0);
        assert_eq!(report.adherence_percent, Some(100.0));
        assert_eq!(report.max_deviation_m, Some(0.0));
        assert_eq!(report.points_off_route, Some(0));
        assert_eq!(report.km_planned, report.km_executed);
    }

    #[test]
    fn test_missing_planned_path_leaves_adherence_undefined() {
        let executed = path();
        let report = compare(None, &executed, 100.0);
        assert!(report.km_executed.is_some());
        assert_eq!(report.adherence_percent, None);
        assert_eq!(report.km_planned, None);
        assert_eq!(report.points_off_route, None);
    }

    #[test]
    fn test_empty_executed_path_reports_nothing() {
        let planned = path();
        let report = compare(Some(&planned), &[], 100.0);
        assert_eq!(report, AdherenceReport::default());
    }

    #[test]
    fn test_detour_counts_points_off_route() {
        let planned = path();
        let mut executed = path();
        // Push two points ~1km east of the corridor
        executed[4].1 += 0.01;
        executed[5].1 += 0.01;

        let report = compare(Some(&planned), &executed, 100.0);
        assert_eq!(report.points_off_route, Some(2));
        let deviation = report.max_deviation_m.unwrap();
        assert!(deviation > 900.0, "got {}", deviation);
        let adherence = report.adherence_percent.unwrap();
        assert!(adherence < 100.0);
    }

    #[test]
    fn test_shortcut_penalized_by_coverage_direction() {
        let planned = path();
        // Executed only covers the first three planned points, so even
        // though every executed point is on the corridor, coverage drops.
        let executed: Vec<(f64, f64)> = planned[..3].to_vec();

        let report = compare(Some(&planned), &executed, 100.0);
        assert_eq!(report.points_off_route, Some(0));
        let adherence = report.adherence_percent.unwrap();
        assert!(adherence < 50.0, "shortcut should tank adherence, got {}", adherence);
    }

    #[test]
    fn test_distance_to_empty_path_is_infinite() {
        assert!(distance_to_path((-22.9, -47.0), &[]).is_infinite());
    }
}
