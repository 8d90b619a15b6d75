//! Test fixtures for shuttle-planner.
//!
//! Provides realistic test data including:
//! - Real Campinas locations (from OpenStreetMap)
//! - Straight-line mock routing providers

pub mod campinas_locations;
pub mod providers;

pub use campinas_locations::*;
pub use providers::*;
