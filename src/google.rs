//! Google Maps HTTP adapter (geocoding + directions).

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::traits::{Geocoded, ProviderRoute, RouteLeg, RoutingProvider};

/// Google Directions accepts 25 waypoints per request; two slots are
/// reserved for origin and destination.
const MAX_WAYPOINTS: usize = 23;

#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    pub api_key: String,
    pub base_url: String,
    /// Region bias for forward geocoding (ccTLD, e.g. "br").
    pub region: String,
    pub language: String,
    pub directions_timeout_secs: u64,
    pub geocode_timeout_secs: u64,
}

impl GoogleMapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            region: "br".to_string(),
            language: "pt-BR".to_string(),
            directions_timeout_secs: 30,
            geocode_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { config, client })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        timeout_secs: u64,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.config.base_url, path);
        debug!(path, "google maps request");
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(Duration::from_secs(timeout_secs))
            .send()?
            .json::<T>()?;
        Ok(response)
    }

    fn directions_request(
        &self,
        params: Vec<(&str, String)>,
    ) -> Result<ProviderRoute, ProviderError> {
        let body: DirectionsResponse =
            self.get_json("directions/json", &params, self.config.directions_timeout_secs)?;
        check_status(&body.status)?;

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("OK status with no routes".to_string()))?;

        let legs = route
            .legs
            .iter()
            .map(|leg| RouteLeg {
                distance_m: leg.distance.value,
                duration_s: leg.duration.value,
            })
            .collect();

        Ok(ProviderRoute {
            waypoint_order: route.waypoint_order,
            legs,
            polyline: route.overview_polyline.points,
        })
    }
}

impl RoutingProvider for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<Geocoded, ProviderError> {
        let params = vec![
            ("address", address.to_string()),
            ("key", self.config.api_key.clone()),
            ("region", self.config.region.clone()),
            ("language", self.config.language.clone()),
        ];
        let body: GeocodeResponse =
            self.get_json("geocode/json", &params, self.config.geocode_timeout_secs)?;
        check_status(&body.status)?;

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("OK status with no results".to_string()))?;

        Ok(Geocoded {
            lat: result.geometry.location.lat,
            lng: result.geometry.location.lng,
            formatted_address: result.formatted_address,
        })
    }

    fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<String, ProviderError> {
        let params = vec![
            ("latlng", format!("{:.6},{:.6}", lat, lng)),
            ("key", self.config.api_key.clone()),
            ("language", self.config.language.clone()),
            ("result_type", "street_address|route".to_string()),
        ];
        let body: GeocodeResponse =
            self.get_json("geocode/json", &params, self.config.geocode_timeout_secs)?;
        check_status(&body.status)?;

        body.results
            .into_iter()
            .next()
            .map(|result| result.formatted_address)
            .ok_or_else(|| ProviderError::Malformed("OK status with no results".to_string()))
    }

    fn directions(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<ProviderRoute, ProviderError> {
        let params = vec![
            ("origin", format!("{:.6},{:.6}", origin.0, origin.1)),
            (
                "destination",
                format!("{:.6},{:.6}", destination.0, destination.1),
            ),
            ("mode", "driving".to_string()),
            ("language", self.config.language.clone()),
            ("key", self.config.api_key.clone()),
        ];
        self.directions_request(params)
    }

    fn optimize_waypoints(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        waypoints: &[(f64, f64)],
        departure: Option<i64>,
    ) -> Result<ProviderRoute, ProviderError> {
        let mut params = vec![
            ("origin", format!("{:.6},{:.6}", origin.0, origin.1)),
            (
                "destination",
                format!("{:.6},{:.6}", destination.0, destination.1),
            ),
            ("mode", "driving".to_string()),
            ("language", self.config.language.clone()),
            ("key", self.config.api_key.clone()),
        ];

        if !waypoints.is_empty() {
            let joined = waypoints
                .iter()
                .map(|(lat, lng)| format!("{:.6},{:.6}", lat, lng))
                .collect::<Vec<_>>()
                .join("|");
            params.push(("waypoints", format!("optimize:true|{}", joined)));
        }

        if let Some(timestamp) = departure {
            params.push(("departure_time", timestamp.to_string()));
        }

        self.directions_request(params)
    }

    fn waypoint_limit(&self) -> usize {
        MAX_WAYPOINTS
    }
}

fn check_status(status: &str) -> Result<(), ProviderError> {
    match status {
        "OK" => Ok(()),
        "ZERO_RESULTS" | "NOT_FOUND" => Err(ProviderError::ZeroResults),
        "REQUEST_DENIED" | "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
            warn!(status, "google maps request rejected");
            Err(ProviderError::Auth(status.to_string()))
        }
        other => Err(ProviderError::Malformed(format!("status {}", other))),
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLngValue,
}

#[derive(Debug, Deserialize)]
struct LatLngValue {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    waypoint_order: Vec<usize>,
    legs: Vec<DirectionsLeg>,
    overview_polyline: OverviewPolyline,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: u32,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(check_status("OK").is_ok());
        assert!(matches!(
            check_status("ZERO_RESULTS"),
            Err(ProviderError::ZeroResults)
        ));
        assert!(matches!(
            check_status("REQUEST_DENIED"),
            Err(ProviderError::Auth(_))
        ));
        assert!(matches!(
            check_status("UNKNOWN_ERROR"),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_directions_response_parsing() {
        let raw = r#"{
            "status": "OK",
            "routes": [{
                "waypoint_order": [1, 0],
                "legs": [
                    {"distance": {"value": 1200}, "duration": {"value": 240}},
                    {"distance": {"value": 800}, "duration": {"value": 150}}
                ],
                "overview_polyline": {"points": "_p~iF~ps|U"}
            }]
        }"#;
        let parsed: DirectionsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.routes[0].waypoint_order, vec![1, 0]);
        assert_eq!(parsed.routes[0].legs[1].duration.value, 150);
    }

    #[test]
    fn test_geocode_response_without_results() {
        let raw = r#"{"status": "ZERO_RESULTS"}"#;
        let parsed: GeocodeResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.results.is_empty());
    }
}
