//! Core traits for the route-planning engine.
//!
//! These are intentionally minimal. Concrete adapters (Google Maps, test
//! mocks) implement them; the planning pipeline is generic over them.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A single travel leg between consecutive points of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_m: u32,
    pub duration_s: u32,
}

/// Provider answer for a directions or waypoint-optimization request.
#[derive(Debug, Clone)]
pub struct ProviderRoute {
    /// Visiting order of the submitted waypoints, as indices into the
    /// waypoint slice. Empty when no waypoints were submitted.
    pub waypoint_order: Vec<usize>,
    pub legs: Vec<RouteLeg>,
    /// Encoded overview polyline.
    pub polyline: String,
}

/// A forward-geocoding result.
#[derive(Debug, Clone)]
pub struct Geocoded {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

/// External geocoding/directions provider.
///
/// The engine delegates all road-network knowledge here: it never routes
/// in-process. Every method is a suspension point with provider-side
/// latency; callers batch and isolate failures accordingly.
pub trait RoutingProvider {
    fn geocode(&self, address: &str) -> Result<Geocoded, ProviderError>;

    fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<String, ProviderError>;

    /// Driving directions between two points, no intermediate stops.
    fn directions(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<ProviderRoute, ProviderError>;

    /// Best visiting order for `waypoints` between `origin` and
    /// `destination`, departing at the optional unix timestamp.
    fn optimize_waypoints(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        waypoints: &[(f64, f64)],
        departure: Option<i64>,
    ) -> Result<ProviderRoute, ProviderError>;

    /// Maximum optimizable waypoints per request, origin and destination
    /// excluded.
    fn waypoint_limit(&self) -> usize {
        23
    }
}

/// Progress sink for long planning runs.
///
/// The pipeline itself is synchronous; an orchestration layer that wants
/// background execution wraps the run and forwards these callbacks.
/// Implementations must be cheap: they are called between provider calls.
pub trait Progress: Sync {
    /// Reports the current stage and overall percent complete (0-100).
    fn stage(&self, stage: &str, percent: u8);

    /// Polled between units of work; returning true stops the run at the
    /// next boundary.
    fn cancelled(&self) -> bool {
        false
    }
}

/// Progress sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn stage(&self, _stage: &str, _percent: u8) {}
}
