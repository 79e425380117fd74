//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Leg, Route, Station, StationName};

/// `from`/`to` query used by the fare and journey endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FromToQuery {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// Query for `/route-map`.
#[derive(Debug, Default, Deserialize)]
pub struct RouteMapQuery {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    /// Rider's latitude, if known
    pub user_lat: Option<String>,
    /// Rider's longitude, if known
    pub user_lng: Option<String>,
}

/// Query for `/nearest-station`. Kept as text so a bad number is our
/// error message rather than the extractor's.
#[derive(Debug, Default, Deserialize)]
pub struct NearestStationQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<Station>,
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<Route>,
}

/// Acknowledgement of a change.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NearestStationResponse {
    pub station: Station,
    pub distance_meters: f64,
}

/// A journey decorated for drawing on a map.
#[derive(Debug, Serialize)]
pub struct RouteMapResponse {
    /// Stations in travel order
    pub route: Vec<Station>,
    /// GeoJSON of the rider's way to the first station, if requested and found
    pub path: Option<serde_json::Value>,
    pub total_price: f64,
    /// Metres, summed over every leg the directions service answered
    pub distance: f64,
    /// Seconds, summed likewise
    pub duration: f64,
    pub legs: Vec<Leg>,
}

/// One pickup place, keyed by display name in [`PlacesResponse`].
#[derive(Debug, Serialize)]
pub struct Place {
    pub stations: Vec<StationName>,
    /// `[longitude, latitude]`
    pub location: [f64; 2],
    pub connected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlacesResponse {
    pub places: BTreeMap<String, Place>,
}

impl PlacesResponse {
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let places = stations
            .into_iter()
            .map(|station| {
                let place = Place {
                    location: station.location.coordinates,
                    connected: station.connected_routes,
                    stations: vec![station.name.clone()],
                };
                (station.name.base().to_string(), place)
            })
            .collect();
        Self { places }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
