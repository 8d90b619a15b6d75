//! Error types for provider calls and planning runs.

use thiserror::Error;

/// Failure of a single routing-provider operation.
///
/// Distinguishes "the provider answered and found nothing" from
/// transport or credential failures so callers can decide whether a
/// retry makes sense.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no route or result found")]
    ZeroResults,

    #[error("provider rejected the request: {0}")]
    Auth(String),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Failure of a planning operation.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no stops to optimize")]
    NoStops,

    #[error("run cancelled")]
    Cancelled,

    #[error("passenger {0} not assigned to the source stop")]
    UnknownPassenger(u64),

    #[error("stop index {0} out of range")]
    UnknownStop(usize),
}
