//! End-to-end planning pipeline.
//!
//! cluster → resolve stop addresses → capacity partition → per-group
//! optimize and time-split → schedules. Groups are independent and run
//! in parallel; one group's provider failure never aborts the run, and
//! a wall-clock budget turns stragglers into "not processed" results
//! instead of a hung batch.

use std::time::{Duration, Instant};

use chrono::NaiveTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cluster::{self, PassengerPoint, Stop};
use crate::error::PlanError;
use crate::optimize::{self, OptimizedRoute};
use crate::partition;
use crate::schedule::{self, StopSchedule};
use crate::traits::{Progress, RouteLeg, RoutingProvider};

/// How a passenger's coordinates were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeocodeStatus {
    Pending,
    Success,
    Failed,
    /// Coordinates set by hand; batch geocoding must not overwrite them.
    Manual,
}

/// A passenger record as it arrives from registration or import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub geocode_status: GeocodeStatus,
}

impl Passenger {
    pub fn new(id: u64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            lat: None,
            lng: None,
            geocode_status: GeocodeStatus::Pending,
        }
    }

    /// Clustering point, when coordinates are resolved.
    pub fn point(&self) -> Option<PassengerPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(PassengerPoint {
                id: self.id,
                lat,
                lng,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeocodeSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Geocodes every unresolved passenger, one provider call each.
///
/// Failures mark the passenger and move on; already-resolved and
/// manually placed passengers are skipped. Stops early when cancelled,
/// leaving the rest pending.
pub fn geocode_batch<P: RoutingProvider>(
    passengers: &mut [Passenger],
    provider: &P,
    progress: &dyn Progress,
) -> GeocodeSummary {
    let total = passengers.len();
    let mut summary = GeocodeSummary::default();

    for (i, passenger) in passengers.iter_mut().enumerate() {
        if progress.cancelled() {
            break;
        }
        if matches!(
            passenger.geocode_status,
            GeocodeStatus::Success | GeocodeStatus::Manual
        ) {
            summary.skipped += 1;
            continue;
        }

        progress.stage(
            &format!("geocoding passenger {} of {}", i + 1, total),
            ratio_percent(i, total, 0, 100),
        );

        match provider.geocode(&passenger.address) {
            Ok(geocoded) => {
                passenger.lat = Some(geocoded.lat);
                passenger.lng = Some(geocoded.lng);
                passenger.geocode_status = GeocodeStatus::Success;
                summary.succeeded += 1;
            }
            Err(err) => {
                warn!(passenger = passenger.id, error = %err, "geocoding failed");
                passenger.geocode_status = GeocodeStatus::Failed;
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Scalar configuration for a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub walk_radius_m: f64,
    pub vehicle_capacity: usize,
    pub max_route_minutes: u32,
    /// Anchor arrival time at the destination (outbound).
    pub arrival_time: NaiveTime,
    pub dwell_secs: u32,
    /// Departure hint forwarded to the provider, unix timestamp.
    pub departure_timestamp: Option<i64>,
    /// Wall-clock cap on the whole run; groups past it are reported
    /// unprocessed rather than attempted.
    pub run_budget_secs: u64,
    pub max_split_depth: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            walk_radius_m: 300.0,
            vehicle_capacity: 20,
            max_route_minutes: 60,
            arrival_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
            dwell_secs: 60,
            departure_timestamp: None,
            run_budget_secs: 240,
            max_split_depth: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Outbound,
    Return,
}

/// An optimized, scheduled route for one vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub name: String,
    pub direction: Direction,
    /// Stops in visiting order.
    pub stops: Vec<Stop>,
    /// One entry per stop, same order.
    pub schedule: Vec<StopSchedule>,
    pub legs: Vec<RouteLeg>,
    pub total_distance_km: f64,
    pub total_duration_min: u32,
    pub polyline: String,
    pub capacity: usize,
}

impl PlannedRoute {
    pub fn passenger_count(&self) -> usize {
        self.stops.iter().map(Stop::passenger_count).sum()
    }
}

/// A group the run could not turn into a route.
#[derive(Debug, Clone)]
pub struct GroupFailure {
    pub stops: Vec<Stop>,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanSummary {
    pub planned_routes: usize,
    pub failed_groups: usize,
    pub unprocessed_groups: usize,
    pub planned_stops: usize,
    pub planned_passengers: usize,
}

/// Aggregate result of a planning run. Partial success is the normal
/// case: inspect `failed_groups` and `unprocessed_groups` alongside the
/// planned routes.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    pub routes: Vec<PlannedRoute>,
    pub failed_groups: Vec<GroupFailure>,
    pub unprocessed_groups: Vec<Vec<Stop>>,
}

impl PlanOutcome {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            planned_routes: self.routes.len(),
            failed_groups: self.failed_groups.len(),
            unprocessed_groups: self.unprocessed_groups.len(),
            planned_stops: self.routes.iter().map(|r| r.stops.len()).sum(),
            planned_passengers: self.routes.iter().map(PlannedRoute::passenger_count).sum(),
        }
    }

    /// Human-readable run outcome.
    pub fn message(&self) -> String {
        let mut parts = vec![format!("{} routes planned", self.routes.len())];
        if !self.failed_groups.is_empty() {
            parts.push(format!("{} groups failed", self.failed_groups.len()));
        }
        if !self.unprocessed_groups.is_empty() {
            parts.push(format!(
                "{} groups not processed, retry to continue",
                self.unprocessed_groups.len()
            ));
        }
        parts.join(", ")
    }
}

enum GroupPlan {
    Planned(PlannedRoute),
    Failed(GroupFailure),
    Skipped(Vec<Stop>),
}

/// Plans the outbound trip for a geocoded passenger set.
///
/// Returns `Err` only when cancelled before any work happened; provider
/// failures and budget exhaustion surface inside the outcome.
pub fn plan<P: RoutingProvider + Sync>(
    passengers: &[PassengerPoint],
    destination: (f64, f64),
    config: &PlanConfig,
    provider: &P,
    progress: &dyn Progress,
) -> Result<PlanOutcome, PlanError> {
    if progress.cancelled() {
        return Err(PlanError::Cancelled);
    }

    progress.stage("clustering passengers", 5);
    let mut stops = cluster::cluster(
        passengers,
        config.walk_radius_m,
        Some(destination),
        provider,
    );
    if stops.is_empty() {
        return Ok(PlanOutcome::default());
    }

    let total_stops = stops.len();
    for (i, stop) in stops.iter_mut().enumerate() {
        if progress.cancelled() {
            return Err(PlanError::Cancelled);
        }
        progress.stage(
            &format!("resolving stop address {} of {}", i + 1, total_stops),
            ratio_percent(i, total_stops, 10, 25),
        );
        stop.reference_address = Some(resolve_reference_address(stop, provider));
    }

    progress.stage("partitioning by capacity", 35);
    let groups = partition::partition_by_capacity(stops, config.vehicle_capacity);
    let group_count = groups.len();
    let deadline = Instant::now() + Duration::from_secs(config.run_budget_secs);

    let results: Vec<Vec<GroupPlan>> = groups
        .into_par_iter()
        .enumerate()
        .map(|(i, group)| {
            if progress.cancelled() || Instant::now() >= deadline {
                return vec![GroupPlan::Skipped(group)];
            }
            progress.stage(
                &format!("optimizing group {} of {}", i + 1, group_count),
                ratio_percent(i, group_count, 40, 95),
            );

            let points: Vec<(f64, f64)> = group.iter().map(Stop::position).collect();
            match optimize::optimize(&points, destination, config.departure_timestamp, provider) {
                Ok(route) => partition::partition_by_time(
                    group,
                    route,
                    config.max_route_minutes,
                    destination,
                    config.departure_timestamp,
                    provider,
                    config.max_split_depth,
                )
                .into_iter()
                .map(|(part_stops, optimized)| match optimized {
                    Some(optimized) => {
                        GroupPlan::Planned(build_outbound_route(part_stops, optimized, config))
                    }
                    None => GroupPlan::Failed(GroupFailure {
                        stops: part_stops,
                        reason: "re-optimization failed after time split".to_string(),
                    }),
                })
                .collect(),
                Err(err) => {
                    warn!(group = i, error = %err, "group optimization failed");
                    vec![GroupPlan::Failed(GroupFailure {
                        stops: group,
                        reason: err.to_string(),
                    })]
                }
            }
        })
        .collect();

    let outcome = assemble_outcome(results, "Route");
    progress.stage("planning complete", 100);
    info!(message = %outcome.message(), "outbound planning finished");
    Ok(outcome)
}

/// Plans the return trip for existing route groups, anchored on a fixed
/// departure time from the origin.
pub fn plan_return<P: RoutingProvider + Sync>(
    route_stops: &[Vec<Stop>],
    origin: (f64, f64),
    departure_time: NaiveTime,
    config: &PlanConfig,
    provider: &P,
    progress: &dyn Progress,
) -> Result<PlanOutcome, PlanError> {
    if progress.cancelled() {
        return Err(PlanError::Cancelled);
    }

    let group_count = route_stops.len();
    let deadline = Instant::now() + Duration::from_secs(config.run_budget_secs);

    let results: Vec<Vec<GroupPlan>> = route_stops
        .par_iter()
        .enumerate()
        .map(|(i, group)| {
            if group.is_empty() {
                return Vec::new();
            }
            if progress.cancelled() || Instant::now() >= deadline {
                return vec![GroupPlan::Skipped(group.clone())];
            }
            progress.stage(
                &format!("optimizing return group {} of {}", i + 1, group_count),
                ratio_percent(i, group_count, 5, 95),
            );

            let points: Vec<(f64, f64)> = group.iter().map(Stop::position).collect();
            match optimize::optimize_return(&points, origin, config.departure_timestamp, provider)
            {
                Ok(optimized) => {
                    let ordered: Vec<Stop> = optimized
                        .order
                        .iter()
                        .filter_map(|&idx| group.get(idx).cloned())
                        .collect();
                    let stop_schedule = schedule::return_schedule(
                        &optimized.legs,
                        departure_time,
                        config.dwell_secs,
                    );
                    vec![GroupPlan::Planned(PlannedRoute {
                        name: String::new(),
                        direction: Direction::Return,
                        stops: ordered,
                        schedule: stop_schedule,
                        legs: optimized.legs,
                        total_distance_km: optimized.total_distance_km,
                        total_duration_min: optimized.total_duration_min,
                        polyline: optimized.polyline,
                        capacity: config.vehicle_capacity,
                    })]
                }
                Err(err) => {
                    warn!(group = i, error = %err, "return optimization failed");
                    vec![GroupPlan::Failed(GroupFailure {
                        stops: group.clone(),
                        reason: err.to_string(),
                    })]
                }
            }
        })
        .collect();

    let outcome = assemble_outcome(results, "Return");
    progress.stage("return planning complete", 100);
    info!(message = %outcome.message(), "return planning finished");
    Ok(outcome)
}

fn resolve_reference_address<P: RoutingProvider>(stop: &Stop, provider: &P) -> String {
    match provider.reverse_geocode(stop.lat, stop.lng) {
        Ok(address) => address,
        Err(err) => {
            warn!(error = %err, "reverse geocode failed, labeling stop by coordinates");
            format!("{:.6}, {:.6}", stop.lat, stop.lng)
        }
    }
}

fn build_outbound_route(
    group: Vec<Stop>,
    optimized: OptimizedRoute,
    config: &PlanConfig,
) -> PlannedRoute {
    let ordered: Vec<Stop> = optimized
        .order
        .iter()
        .filter_map(|&idx| group.get(idx).cloned())
        .collect();
    let stop_schedule =
        schedule::outbound_schedule(&optimized.legs, config.arrival_time, config.dwell_secs);

    PlannedRoute {
        name: String::new(),
        direction: Direction::Outbound,
        stops: ordered,
        schedule: stop_schedule,
        legs: optimized.legs,
        total_distance_km: optimized.total_distance_km,
        total_duration_min: optimized.total_duration_min,
        polyline: optimized.polyline,
        capacity: config.vehicle_capacity,
    }
}

fn assemble_outcome(results: Vec<Vec<GroupPlan>>, name_prefix: &str) -> PlanOutcome {
    let mut outcome = PlanOutcome::default();
    for plan in results.into_iter().flatten() {
        match plan {
            GroupPlan::Planned(mut route) => {
                route.name = format!("{} {}", name_prefix, outcome.routes.len() + 1);
                outcome.routes.push(route);
            }
            GroupPlan::Failed(failure) => outcome.failed_groups.push(failure),
            GroupPlan::Skipped(stops) => outcome.unprocessed_groups.push(stops),
        }
    }
    outcome
}

fn ratio_percent(done: usize, total: usize, base: u8, top: u8) -> u8 {
    if total == 0 {
        return base;
    }
    let span = top.saturating_sub(base) as usize;
    base + (span * done / total) as u8
}
