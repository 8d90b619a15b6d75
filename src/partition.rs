//! Splitting stop sets into vehicle-sized, time-bounded route groups.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::cluster::Stop;
use crate::optimize::{self, OptimizedRoute};
use crate::traits::RoutingProvider;

/// Fraction of the time budget at which a route is cut when splitting.
const SPLIT_BUDGET_FRACTION: f64 = 0.9;

/// Splits stops into groups whose passenger totals fit the vehicle.
///
/// Stops are swept by polar angle around the overall centroid so each
/// group stays geographically contiguous; groups are filled greedily and
/// are not balanced. A single stop that alone exceeds capacity ends up
/// in its own oversized group — callers must surface it, not drop it.
pub fn partition_by_capacity(stops: Vec<Stop>, capacity: usize) -> Vec<Vec<Stop>> {
    if stops.is_empty() {
        return Vec::new();
    }

    let total: usize = stops.iter().map(Stop::passenger_count).sum();
    if total <= capacity {
        return vec![stops];
    }

    let center_lat = stops.iter().map(|s| s.lat).sum::<f64>() / stops.len() as f64;
    let center_lng = stops.iter().map(|s| s.lng).sum::<f64>() / stops.len() as f64;

    let mut swept = stops;
    swept.sort_by(|a, b| {
        let angle_a = (a.lat - center_lat).atan2(a.lng - center_lng);
        let angle_b = (b.lat - center_lat).atan2(b.lng - center_lng);
        angle_a.partial_cmp(&angle_b).unwrap_or(Ordering::Equal)
    });

    let mut groups = Vec::new();
    let mut current: Vec<Stop> = Vec::new();
    let mut current_count = 0usize;

    for stop in swept {
        let pax = stop.passenger_count();
        if current_count + pax > capacity && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
            current_count = 0;
        }
        current_count += pax;
        current.push(stop);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    for group in &groups {
        let count: usize = group.iter().map(Stop::passenger_count).sum();
        if count > capacity {
            warn!(
                passengers = count,
                capacity, "stop group exceeds vehicle capacity on its own"
            );
        }
    }

    debug!(total, groups = groups.len(), "capacity partition complete");
    groups
}

/// Splits an optimized group whose travel time exceeds `max_minutes`.
///
/// The ordered stop list is cut where cumulative leg time first reaches
/// 90% of the budget (midpoint when no leg reaches it), each half is
/// re-optimized independently and checked again, recursing up to
/// `max_depth` levels. A half whose re-optimization fails is returned
/// with no route; a group that cannot be split further is returned
/// over budget with a warning.
pub fn partition_by_time<P: RoutingProvider>(
    stops: Vec<Stop>,
    optimized: OptimizedRoute,
    max_minutes: u32,
    destination: (f64, f64),
    departure: Option<i64>,
    provider: &P,
    max_depth: usize,
) -> Vec<(Vec<Stop>, Option<OptimizedRoute>)> {
    if optimized.total_duration_min <= max_minutes {
        return vec![(stops, Some(optimized))];
    }

    if max_depth == 0 {
        warn!(
            duration_min = optimized.total_duration_min,
            max_minutes, "split depth exhausted, keeping over-budget route"
        );
        return vec![(stops, Some(optimized))];
    }

    let ordered: Vec<Stop> = optimized
        .order
        .iter()
        .filter_map(|&i| stops.get(i).cloned())
        .collect();

    let split_at = find_split_point(&optimized, ordered.len(), max_minutes);
    let (first, second) = ordered.split_at(split_at.min(ordered.len()));

    let mut results = Vec::new();
    for half in [first, second] {
        if half.is_empty() {
            continue;
        }

        let points: Vec<(f64, f64)> = half.iter().map(Stop::position).collect();
        match optimize::optimize(&points, destination, departure, provider) {
            Ok(route) => {
                let sub = partition_by_time(
                    half.to_vec(),
                    route,
                    max_minutes,
                    destination,
                    departure,
                    provider,
                    max_depth - 1,
                );
                results.extend(sub);
            }
            Err(err) => {
                warn!(error = %err, stops = half.len(), "re-optimization failed for split half");
                results.push((half.to_vec(), None));
            }
        }
    }

    results
}

/// Index of the first stop after cumulative leg time reaches 90% of the
/// budget. The final leg (last stop into the destination) is excluded.
fn find_split_point(optimized: &OptimizedRoute, stop_count: usize, max_minutes: u32) -> usize {
    let mut split_at = stop_count / 2;
    let threshold = f64::from(max_minutes) * SPLIT_BUDGET_FRACTION;

    let mut cumulative_min = 0.0;
    for (i, leg) in optimized
        .legs
        .iter()
        .take(optimized.legs.len().saturating_sub(1))
        .enumerate()
    {
        cumulative_min += f64::from(leg.duration_s) / 60.0;
        if cumulative_min >= threshold {
            split_at = (i + 1).max(1);
            break;
        }
    }

    split_at
}
