//! Provider-backed stop sequencing.
//!
//! The external provider does the actual sequencing; this module decides
//! which point anchors each request and how to split requests that
//! exceed the provider's waypoint limit.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanError;
use crate::geo;
use crate::traits::{RouteLeg, RoutingProvider};

/// An ordered, provider-sequenced route over a set of stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedRoute {
    /// Visiting order as a permutation of the input stop indices.
    pub order: Vec<usize>,
    /// One leg per hop, ending with the hop into the destination.
    pub legs: Vec<RouteLeg>,
    pub total_distance_km: f64,
    pub total_duration_min: u32,
    /// Encoded overview polyline. For chunked routes only the first
    /// chunk's geometry is retained.
    pub polyline: String,
}

/// Sequences `points` into a route ending at `destination`.
///
/// The farthest point from the destination is forced as the request
/// origin so the vehicle starts at the extremity and drives inward.
/// Above the provider's waypoint limit the request is chunked
/// farthest-first, chaining each chunk into the next.
pub fn optimize<P: RoutingProvider>(
    points: &[(f64, f64)],
    destination: (f64, f64),
    departure: Option<i64>,
    provider: &P,
) -> Result<OptimizedRoute, PlanError> {
    if points.is_empty() {
        return Err(PlanError::NoStops);
    }

    let limit = provider.waypoint_limit();
    if points.len() <= limit {
        single_request(points, destination, departure, provider)
    } else {
        chunked_request(points, destination, departure, provider, limit)
    }
}

/// Sequences a return trip: the vehicle leaves `origin` and drops
/// passengers off, ending at the stop farthest from the origin.
pub fn optimize_return<P: RoutingProvider>(
    points: &[(f64, f64)],
    origin: (f64, f64),
    departure: Option<i64>,
    provider: &P,
) -> Result<OptimizedRoute, PlanError> {
    if points.is_empty() {
        return Err(PlanError::NoStops);
    }

    if points.len() == 1 {
        let route = provider.optimize_waypoints(origin, points[0], &[], departure)?;
        return Ok(assemble(vec![0], route.legs, route.polyline));
    }

    let last_idx = farthest_index(points, origin);
    let other_indices: Vec<usize> = (0..points.len()).filter(|&i| i != last_idx).collect();
    let waypoints: Vec<(f64, f64)> = other_indices.iter().map(|&i| points[i]).collect();

    let route = provider.optimize_waypoints(origin, points[last_idx], &waypoints, departure)?;
    let raw_order = effective_order(&route.waypoint_order, waypoints.len());

    let mut order: Vec<usize> = raw_order.iter().map(|&j| other_indices[j]).collect();
    order.push(last_idx);

    Ok(assemble(order, route.legs, route.polyline))
}

fn single_request<P: RoutingProvider>(
    points: &[(f64, f64)],
    destination: (f64, f64),
    departure: Option<i64>,
    provider: &P,
) -> Result<OptimizedRoute, PlanError> {
    if points.len() == 1 {
        let route = provider.optimize_waypoints(points[0], destination, &[], departure)?;
        return Ok(assemble(vec![0], route.legs, route.polyline));
    }

    let origin_idx = farthest_index(points, destination);
    let other_indices: Vec<usize> = (0..points.len()).filter(|&i| i != origin_idx).collect();
    let waypoints: Vec<(f64, f64)> = other_indices.iter().map(|&i| points[i]).collect();

    let route =
        provider.optimize_waypoints(points[origin_idx], destination, &waypoints, departure)?;
    let raw_order = effective_order(&route.waypoint_order, waypoints.len());

    let mut order = Vec::with_capacity(points.len());
    order.push(origin_idx);
    order.extend(raw_order.iter().map(|&j| other_indices[j]));

    Ok(assemble(order, route.legs, route.polyline))
}

fn chunked_request<P: RoutingProvider>(
    points: &[(f64, f64)],
    destination: (f64, f64),
    departure: Option<i64>,
    provider: &P,
    limit: usize,
) -> Result<OptimizedRoute, PlanError> {
    // Farthest-first pre-ordering bounds the number of provider calls;
    // it is not globally optimal.
    let distances: Vec<f64> = points
        .iter()
        .map(|&(lat, lng)| geo::haversine(lat, lng, destination.0, destination.1))
        .collect();
    let mut sorted_indices: Vec<usize> = (0..points.len()).collect();
    sorted_indices.sort_by(|&a, &b| {
        distances[b]
            .partial_cmp(&distances[a])
            .unwrap_or(Ordering::Equal)
    });

    let chunks: Vec<&[usize]> = sorted_indices.chunks(limit).collect();
    debug!(stops = points.len(), chunks = chunks.len(), "chunked optimization");

    let mut order = Vec::with_capacity(points.len());
    let mut legs = Vec::new();
    let mut total_distance_km = 0.0;
    let mut total_duration_min = 0u32;
    let mut polyline = String::new();

    for (i, chunk) in chunks.iter().enumerate() {
        // Each chunk drives toward the next chunk's first stop; the last
        // chunk drives to the true destination.
        let chunk_destination = match chunks.get(i + 1) {
            Some(next) => points[next[0]],
            None => destination,
        };

        let chunk_points: Vec<(f64, f64)> = chunk.iter().map(|&idx| points[idx]).collect();
        let result = single_request(&chunk_points, chunk_destination, departure, provider)?;

        order.extend(result.order.iter().map(|&local| chunk[local]));
        legs.extend(result.legs);
        total_distance_km += result.total_distance_km;
        total_duration_min += result.total_duration_min;
        if polyline.is_empty() {
            polyline = result.polyline;
        }
    }

    Ok(OptimizedRoute {
        order,
        legs,
        total_distance_km: round2(total_distance_km),
        total_duration_min,
        polyline,
    })
}

/// Provider order for the submitted waypoints; identity when the
/// provider omitted it.
fn effective_order(raw: &[usize], waypoint_count: usize) -> Vec<usize> {
    if raw.len() == waypoint_count {
        raw.to_vec()
    } else {
        (0..waypoint_count).collect()
    }
}

/// First index at maximum haversine distance from `target`.
fn farthest_index(points: &[(f64, f64)], target: (f64, f64)) -> usize {
    let mut best = 0;
    let mut best_dist = f64::NEG_INFINITY;
    for (i, &(lat, lng)) in points.iter().enumerate() {
        let dist = geo::haversine(lat, lng, target.0, target.1);
        if dist > best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

fn assemble(order: Vec<usize>, legs: Vec<RouteLeg>, polyline: String) -> OptimizedRoute {
    let total_distance_m: u64 = legs.iter().map(|leg| u64::from(leg.distance_m)).sum();
    let total_duration_s: u64 = legs.iter().map(|leg| u64::from(leg.duration_s)).sum();

    OptimizedRoute {
        order,
        legs,
        total_distance_km: round2(total_distance_m as f64 / 1000.0),
        total_duration_min: ((total_duration_s as f64) / 60.0).round() as u32,
        polyline,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
