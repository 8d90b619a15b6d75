//! Mock routing providers backed by straight-line estimates.
//!
//! Useful stand-ins when the real directions API is unavailable:
//! directions are straight lines, waypoint optimization keeps the
//! submitted order and travel time assumes a fixed average speed.

use shuttle_planner::error::ProviderError;
use shuttle_planner::geo;
use shuttle_planner::traits::{Geocoded, ProviderRoute, RouteLeg, RoutingProvider};

/// Haversine-based provider.
#[derive(Debug, Clone)]
pub struct HaversineProvider {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineProvider {
    fn default() -> Self {
        Self { speed_kmh: 30.0 }
    }
}

impl HaversineProvider {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> RouteLeg {
        let meters = geo::haversine(from.0, from.1, to.0, to.1);
        let meters_per_second = self.speed_kmh / 3.6;
        RouteLeg {
            distance_m: meters.round() as u32,
            duration_s: (meters / meters_per_second).round() as u32,
        }
    }

    fn route_through(&self, path: &[(f64, f64)], waypoint_count: usize) -> ProviderRoute {
        ProviderRoute {
            waypoint_order: (0..waypoint_count).collect(),
            legs: path.windows(2).map(|pair| self.leg(pair[0], pair[1])).collect(),
            polyline: geo::encode_polyline(path),
        }
    }
}

impl RoutingProvider for HaversineProvider {
    fn geocode(&self, _address: &str) -> Result<Geocoded, ProviderError> {
        Err(ProviderError::ZeroResults)
    }

    fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<String, ProviderError> {
        Ok(format!("Reference point {:.5}, {:.5}", lat, lng))
    }

    fn directions(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<ProviderRoute, ProviderError> {
        Ok(self.route_through(&[origin, destination], 0))
    }

    fn optimize_waypoints(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        waypoints: &[(f64, f64)],
        _departure: Option<i64>,
    ) -> Result<ProviderRoute, ProviderError> {
        let mut path = Vec::with_capacity(waypoints.len() + 2);
        path.push(origin);
        path.extend_from_slice(waypoints);
        path.push(destination);
        Ok(self.route_through(&path, waypoints.len()))
    }
}

/// Provider where every call fails, for outage scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableProvider;

impl RoutingProvider for UnreachableProvider {
    fn geocode(&self, _address: &str) -> Result<Geocoded, ProviderError> {
        Err(ProviderError::ZeroResults)
    }

    fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Result<String, ProviderError> {
        Err(ProviderError::ZeroResults)
    }

    fn directions(
        &self,
        _origin: (f64, f64),
        _destination: (f64, f64),
    ) -> Result<ProviderRoute, ProviderError> {
        Err(ProviderError::ZeroResults)
    }

    fn optimize_waypoints(
        &self,
        _origin: (f64, f64),
        _destination: (f64, f64),
        _waypoints: &[(f64, f64)],
        _departure: Option<i64>,
    ) -> Result<ProviderRoute, ProviderError> {
        Err(ProviderError::ZeroResults)
    }
}
