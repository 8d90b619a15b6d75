//! Stop placement and clustering.
//!
//! Stops are positioned along a trunk road rather than at each door:
//! passengers walk up to the configured radius to reach them. Merging is
//! greedy and insertion-order dependent; callers that need reproducible
//! stop sets must feed passengers in a fixed order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PlanError;
use crate::geo;
use crate::traits::RoutingProvider;

/// Stop candidates closer than this merge into one cluster, provided the
/// walk-radius invariant survives the merged centroid.
const MERGE_DISTANCE_M: f64 = 200.0;

/// A geocoded passenger point ready for clustering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassengerPoint {
    pub id: u64,
    pub lat: f64,
    pub lng: f64,
}

/// A pickup/drop-off point serving one or more passengers.
///
/// The centroid is the running mean of the member stop candidates, not of
/// the passenger addresses. Walking distances are always measured from
/// the passenger's address to the centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub lat: f64,
    pub lng: f64,
    pub passenger_ids: Vec<u64>,
    /// Walking distance per passenger in meters.
    pub walk_distances: HashMap<u64, f64>,
    /// Reverse-geocoded reference address, filled by the planner.
    pub reference_address: Option<String>,
}

impl Stop {
    pub fn position(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn passenger_count(&self) -> usize {
        self.passenger_ids.len()
    }
}

struct StopCandidate {
    lat: f64,
    lng: f64,
    passenger_id: u64,
    walk_m: f64,
}

/// Groups passengers into stops along the trunk route toward
/// `destination`, keeping every passenger within `walk_radius_m` of their
/// stop's centroid.
///
/// Without a destination each passenger becomes their own stop at their
/// own address. Zero passengers yields an empty list.
pub fn cluster<P: RoutingProvider>(
    passengers: &[PassengerPoint],
    walk_radius_m: f64,
    destination: Option<(f64, f64)>,
    provider: &P,
) -> Vec<Stop> {
    if passengers.is_empty() {
        return Vec::new();
    }

    let Some(destination) = destination else {
        return passengers
            .iter()
            .map(|p| single_stop(p.id, p.lat, p.lng, 0.0))
            .collect();
    };

    let trunk = trunk_route(passengers, destination, provider);
    let ref_lat = passengers[0].lat;

    let mut candidates = Vec::with_capacity(passengers.len());
    for p in passengers {
        let candidate = match &trunk {
            Some(points) => place_on_trunk(p, points, ref_lat, walk_radius_m),
            None => place_toward_destination(p, destination, walk_radius_m),
        };
        candidates.push(candidate);
    }

    let positions: HashMap<u64, (f64, f64)> = passengers
        .iter()
        .map(|p| (p.id, (p.lat, p.lng)))
        .collect();

    let mut clusters = merge_candidates(candidates, &positions, walk_radius_m);

    // Final walking distances are measured against the settled centroid,
    // not the intermediate positions used during merge simulation.
    for stop in &mut clusters {
        let centroid = (stop.lat, stop.lng);
        for &pid in &stop.passenger_ids {
            if let Some(&(plat, plng)) = positions.get(&pid) {
                stop.walk_distances
                    .insert(pid, round1(geo::haversine(centroid.0, centroid.1, plat, plng)));
            }
        }
    }

    debug!(
        passengers = passengers.len(),
        stops = clusters.len(),
        "clustering complete"
    );
    clusters
}

/// Fetches the trunk route: driving directions from the farthest
/// passenger to the destination. Returns None when the provider fails or
/// the decoded polyline is unusable.
fn trunk_route<P: RoutingProvider>(
    passengers: &[PassengerPoint],
    destination: (f64, f64),
    provider: &P,
) -> Option<Vec<(f64, f64)>> {
    let farthest = passengers.iter().fold(None::<(&PassengerPoint, f64)>, |best, p| {
        let dist = geo::haversine(p.lat, p.lng, destination.0, destination.1);
        match best {
            Some((_, best_dist)) if dist <= best_dist => best,
            _ => Some((p, dist)),
        }
    })?;

    match provider.directions((farthest.0.lat, farthest.0.lng), destination) {
        Ok(route) => {
            let points = geo::decode_polyline(&route.polyline);
            if points.len() < 2 {
                warn!("trunk polyline too short, placing stops without a trunk");
                None
            } else {
                Some(points)
            }
        }
        Err(err) => {
            warn!(error = %err, "trunk route unavailable, placing stops without a trunk");
            None
        }
    }
}

fn place_on_trunk(
    p: &PassengerPoint,
    trunk: &[(f64, f64)],
    ref_lat: f64,
    walk_radius_m: f64,
) -> StopCandidate {
    let ((proj_lat, proj_lng), dist) =
        geo::project_point_on_polyline((p.lat, p.lng), trunk, ref_lat);

    if dist <= walk_radius_m {
        // Passenger walks all the way to the trunk road.
        StopCandidate {
            lat: proj_lat,
            lng: proj_lng,
            passenger_id: p.id,
            walk_m: round1(dist),
        }
    } else {
        // Too far from the road: the stop moves toward the projection by
        // exactly the walk radius and stays short of the trunk.
        let frac = if dist > 0.0 { walk_radius_m / dist } else { 0.0 };
        StopCandidate {
            lat: p.lat + (proj_lat - p.lat) * frac,
            lng: p.lng + (proj_lng - p.lng) * frac,
            passenger_id: p.id,
            walk_m: round1(walk_radius_m),
        }
    }
}

/// No-trunk fallback: move the stop toward the destination, capped at 50%
/// of the straight-line distance so nearby passengers keep a sane stop.
fn place_toward_destination(
    p: &PassengerPoint,
    destination: (f64, f64),
    walk_radius_m: f64,
) -> StopCandidate {
    let dist_to_dest = geo::haversine(p.lat, p.lng, destination.0, destination.1);
    if dist_to_dest > 0.0 {
        let frac = (walk_radius_m / dist_to_dest).min(0.5);
        let lat = p.lat + (destination.0 - p.lat) * frac;
        let lng = p.lng + (destination.1 - p.lng) * frac;
        let walk = geo::haversine(p.lat, p.lng, lat, lng);
        StopCandidate {
            lat,
            lng,
            passenger_id: p.id,
            walk_m: round1(walk),
        }
    } else {
        StopCandidate {
            lat: p.lat,
            lng: p.lng,
            passenger_id: p.id,
            walk_m: 0.0,
        }
    }
}

/// Greedy merge: each candidate joins the first existing cluster within
/// [`MERGE_DISTANCE_M`] whose recomputed centroid keeps every member (and
/// the newcomer) inside the walk radius; otherwise it starts a cluster.
fn merge_candidates(
    candidates: Vec<StopCandidate>,
    positions: &HashMap<u64, (f64, f64)>,
    walk_radius_m: f64,
) -> Vec<Stop> {
    let mut clusters: Vec<Stop> = Vec::new();

    for candidate in candidates {
        let mut merged = false;

        for cluster in clusters.iter_mut() {
            let dist = geo::haversine(candidate.lat, candidate.lng, cluster.lat, cluster.lng);
            if dist > MERGE_DISTANCE_M {
                continue;
            }

            let n = (cluster.passenger_ids.len() + 1) as f64;
            let new_lat = (cluster.lat * (n - 1.0) + candidate.lat) / n;
            let new_lng = (cluster.lng * (n - 1.0) + candidate.lng) / n;

            let members_ok = cluster
                .passenger_ids
                .iter()
                .chain(std::iter::once(&candidate.passenger_id))
                .all(|pid| match positions.get(pid) {
                    Some(&(plat, plng)) => {
                        geo::haversine(plat, plng, new_lat, new_lng) <= walk_radius_m
                    }
                    None => false,
                });

            if members_ok {
                cluster.passenger_ids.push(candidate.passenger_id);
                cluster.lat = new_lat;
                cluster.lng = new_lng;
                cluster
                    .walk_distances
                    .insert(candidate.passenger_id, candidate.walk_m);
                merged = true;
                break;
            }
        }

        if !merged {
            clusters.push(single_stop(
                candidate.passenger_id,
                candidate.lat,
                candidate.lng,
                candidate.walk_m,
            ));
        }
    }

    clusters
}

fn single_stop(passenger_id: u64, lat: f64, lng: f64, walk_m: f64) -> Stop {
    Stop {
        lat,
        lng,
        passenger_ids: vec![passenger_id],
        walk_distances: HashMap::from([(passenger_id, walk_m)]),
        reference_address: None,
    }
}

/// Moves a passenger between stops as a single transaction: membership
/// and walking distance change together or not at all. Stop centroids do
/// not move on manual reassignment.
pub fn reassign_passenger(
    stops: &mut [Stop],
    from: usize,
    to: usize,
    passenger_id: u64,
    passenger_pos: (f64, f64),
) -> Result<(), PlanError> {
    if from >= stops.len() {
        return Err(PlanError::UnknownStop(from));
    }
    if to >= stops.len() {
        return Err(PlanError::UnknownStop(to));
    }
    let member_idx = stops[from]
        .passenger_ids
        .iter()
        .position(|&id| id == passenger_id)
        .ok_or(PlanError::UnknownPassenger(passenger_id))?;

    if from == to {
        return Ok(());
    }

    stops[from].passenger_ids.remove(member_idx);
    stops[from].walk_distances.remove(&passenger_id);

    let target = &mut stops[to];
    let walk = round1(geo::haversine(
        target.lat,
        target.lng,
        passenger_pos.0,
        passenger_pos.1,
    ));
    target.passenger_ids.push(passenger_id);
    target.walk_distances.insert(passenger_id, walk);

    Ok(())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
