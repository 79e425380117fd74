//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Station;

/// Map page listing every pickup place.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub places: Vec<PlaceView>,
}

/// Place view model for the index page.
#[derive(Debug, Clone)]
pub struct PlaceView {
    /// Display name, without the station suffix
    pub name: String,
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceView {
    pub fn from_station(station: &Station) -> Self {
        Self {
            name: station.name.base().to_string(),
            station: station.name.as_str().to_string(),
            latitude: station.location.latitude(),
            longitude: station.location.longitude(),
        }
    }
}
