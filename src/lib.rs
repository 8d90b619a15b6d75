//! shuttle-planner core
//!
//! Route-planning engine for commuter shuttles: passengers are clustered
//! into walking-distance stops along a trunk road, split into
//! capacity- and time-bounded vehicle routes, sequenced by an external
//! directions provider and scheduled backward from a fixed arrival time.
//! Also ships the planned-versus-executed KML adherence comparator and
//! the fuel-consumption anomaly detector.

pub mod traits;
pub mod error;
pub mod geo;
pub mod google;
pub mod cluster;
pub mod partition;
pub mod optimize;
pub mod schedule;
pub mod planner;
pub mod snapshot;
pub mod adherence;
pub mod kml;
pub mod fuel;
pub mod export;
