//! Simulation snapshots for what-if re-planning.
//!
//! A snapshot freezes routes, stops and parameters as a JSON document so
//! alternative scenarios can be compared or rolled back without touching
//! the provider again. Snapshots are appended to a log and never mutated
//! after capture.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::cluster::Stop;
use crate::planner::{Direction, PlanConfig, PlannedRoute};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRoute {
    pub name: String,
    pub direction: Direction,
    pub order: usize,
    pub total_distance_km: f64,
    pub total_duration_min: u32,
    pub passenger_count: usize,
    pub capacity: usize,
    pub first_departure: Option<NaiveTime>,
    pub last_departure: Option<NaiveTime>,
    pub polyline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotStop {
    pub name: String,
    pub reference_address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Visiting order within the linked route.
    pub order: usize,
    /// Route linkage by name.
    pub route_name: Option<String>,
    pub arrival: Option<NaiveTime>,
    pub departure: Option<NaiveTime>,
    pub passenger_ids: Vec<u64>,
    pub walk_distances: HashMap<u64, f64>,
}

/// A frozen copy of one planning state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub config: PlanConfig,
    pub destination: (f64, f64),
    pub routes: Vec<SnapshotRoute>,
    pub stops: Vec<SnapshotStop>,
}

impl Snapshot {
    /// Captures the current routes into an immutable snapshot.
    pub fn capture(
        name: impl Into<String>,
        config: &PlanConfig,
        destination: (f64, f64),
        routes: &[PlannedRoute],
    ) -> Self {
        let mut snapshot_routes = Vec::with_capacity(routes.len());
        let mut snapshot_stops = Vec::new();

        for (route_order, route) in routes.iter().enumerate() {
            snapshot_routes.push(SnapshotRoute {
                name: route.name.clone(),
                direction: route.direction,
                order: route_order,
                total_distance_km: route.total_distance_km,
                total_duration_min: route.total_duration_min,
                passenger_count: route.passenger_count(),
                capacity: route.capacity,
                first_departure: route.schedule.first().map(|s| s.departure),
                last_departure: route.schedule.last().map(|s| s.departure),
                polyline: route.polyline.clone(),
            });

            for (stop_order, stop) in route.stops.iter().enumerate() {
                let entry = route.schedule.get(stop_order);
                snapshot_stops.push(SnapshotStop {
                    name: stop
                        .reference_address
                        .clone()
                        .unwrap_or_else(|| format!("Stop {}", stop_order + 1)),
                    reference_address: stop.reference_address.clone(),
                    lat: stop.lat,
                    lng: stop.lng,
                    order: stop_order,
                    route_name: Some(route.name.clone()),
                    arrival: entry.map(|s| s.arrival),
                    departure: entry.map(|s| s.departure),
                    passenger_ids: stop.passenger_ids.clone(),
                    walk_distances: stop.walk_distances.clone(),
                });
            }
        }

        Self {
            name: name.into(),
            config: config.clone(),
            destination,
            routes: snapshot_routes,
            stops: snapshot_stops,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Stops linked to the named route, in visiting order.
    pub fn route_stops(&self, route_name: &str) -> Vec<&SnapshotStop> {
        let mut stops: Vec<&SnapshotStop> = self
            .stops
            .iter()
            .filter(|s| s.route_name.as_deref() == Some(route_name))
            .collect();
        stops.sort_by_key(|s| s.order);
        stops
    }

    /// Rebuilds planned routes from the captured state.
    ///
    /// Schedule times come straight from the snapshot; travel legs are
    /// not captured (they would require re-invoking the provider), so
    /// restored routes carry none.
    pub fn restore_routes(&self) -> Vec<PlannedRoute> {
        let mut routes: Vec<&SnapshotRoute> = self.routes.iter().collect();
        routes.sort_by_key(|r| r.order);

        routes
            .into_iter()
            .map(|route| {
                let stops = self.route_stops(&route.name);
                let schedule = stops
                    .iter()
                    .filter_map(|s| {
                        Some(crate::schedule::StopSchedule {
                            order: s.order,
                            arrival: s.arrival?,
                            departure: s.departure?,
                        })
                    })
                    .collect();
                let restored_stops = stops
                    .iter()
                    .map(|s| Stop {
                        lat: s.lat,
                        lng: s.lng,
                        passenger_ids: s.passenger_ids.clone(),
                        walk_distances: s.walk_distances.clone(),
                        reference_address: s.reference_address.clone(),
                    })
                    .collect();

                PlannedRoute {
                    name: route.name.clone(),
                    direction: route.direction,
                    stops: restored_stops,
                    schedule,
                    legs: Vec::new(),
                    total_distance_km: route.total_distance_km,
                    total_duration_min: route.total_duration_min,
                    polyline: route.polyline.clone(),
                    capacity: route.capacity,
                }
            })
            .collect()
    }
}

/// Append-only sequence of snapshots.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SnapshotLog {
    entries: Vec<Snapshot>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot and returns its index. Existing entries are
    /// never touched.
    pub fn push(&mut self, snapshot: Snapshot) -> usize {
        self.entries.push(snapshot);
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }
}
