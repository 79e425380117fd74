//! OSRM route service DTOs.

use serde::{Deserialize, Serialize};

/// Response from `/route/v1/driving/...`.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRouteResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    pub code: String,

    /// Human-readable detail accompanying an error code.
    pub message: Option<String>,

    /// Candidate routes, best first. Absent on error.
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// One candidate route.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    /// Metres
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    /// GeoJSON LineString when requested with `geometries=geojson`.
    #[serde(default)]
    pub geometry: serde_json::Value,
}

/// A planned driving route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrivingRoute {
    /// Metres
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    /// GeoJSON geometry of the route
    pub geometry: serde_json::Value,
}

impl From<OsrmRoute> for DrivingRoute {
    fn from(route: OsrmRoute) -> Self {
        Self {
            distance: route.distance,
            duration: route.duration,
            geometry: route.geometry,
        }
    }
}
