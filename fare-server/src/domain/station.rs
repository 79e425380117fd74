//! Station names and station documents.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::StationValidationError;
use super::id::DocumentId;

/// Marker word appended to every canonical station name.
///
/// Distinguishes a station ("Bole Station") from the place it serves ("Bole").
pub const STATION_SUFFIX: &str = " Station";

/// Error returned when a station name is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// A canonical station name.
///
/// Canonicalization trims surrounding whitespace, strips one trailing
/// [`STATION_SUFFIX`] if present and then reapplies it, so `"Bole"`,
/// `" Bole Station "` and `"Bole Station"` all denote the same station.
/// Parsing is idempotent: parsing a canonical name returns it unchanged.
///
/// # Examples
///
/// ```
/// use fare_server::domain::StationName;
///
/// let bole = StationName::parse("Bole").unwrap();
/// assert_eq!(bole.as_str(), "Bole Station");
/// assert_eq!(bole.base(), "Bole");
///
/// assert_eq!(StationName::parse("Bole Station").unwrap(), bole);
/// assert!(StationName::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationName(String);

impl StationName {
    /// Parse and canonicalize a station name.
    pub fn parse(raw: &str) -> Result<Self, InvalidStationName> {
        let base = base_name(raw);
        if base.is_empty() {
            return Err(InvalidStationName {
                reason: "name must not be empty",
            });
        }
        Ok(Self(format!("{base}{STATION_SUFFIX}")))
    }

    /// Returns the canonical name, suffix included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name without the station suffix, as shown to riders.
    pub fn base(&self) -> &str {
        self.0.strip_suffix(STATION_SUFFIX).unwrap_or(&self.0)
    }
}

fn base_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix(STATION_SUFFIX)
        .unwrap_or(trimmed)
        .trim_end()
}

impl TryFrom<String> for StationName {
    type Error = InvalidStationName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationName> for String {
    fn from(name: StationName) -> Self {
        name.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// GeoJSON geometry type tag. Stations are always points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    #[default]
    Point,
}

/// A GeoJSON point.
///
/// Coordinates are `[longitude, latitude]` in degrees, the GeoJSON order.
/// The fixed-size array makes a malformed coordinate list unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default)]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}

impl Location {
    /// Create a point from longitude and latitude.
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// Returns `(latitude, longitude)`, the order distance functions take.
    pub fn lat_lng(&self) -> (f64, f64) {
        (self.latitude(), self.longitude())
    }

    fn is_valid(&self) -> bool {
        let (lat, lng) = self.lat_lng();
        lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng)
    }
}

/// A stored station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: DocumentId,
    pub name: StationName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub location: Location,
    #[serde(default)]
    pub connected_routes: Vec<String>,
}

impl Station {
    /// Build a stored station from validated fields.
    pub fn from_spec(id: DocumentId, spec: StationSpec) -> Self {
        Self {
            id,
            name: spec.name,
            image: spec.image,
            location: spec.location,
            connected_routes: spec.connected_routes,
        }
    }
}

/// Station fields as submitted by an administrator, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub location: Location,
    #[serde(default)]
    pub connected_routes: Vec<String>,
}

/// Validated station fields, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSpec {
    pub name: StationName,
    pub image: Option<String>,
    pub location: Location,
    pub connected_routes: Vec<String>,
}

impl StationDraft {
    /// Canonicalize the name and check the coordinates.
    pub fn validate(self) -> Result<StationSpec, StationValidationError> {
        let name =
            StationName::parse(&self.name).map_err(|_| StationValidationError::MissingName)?;

        if !self.location.is_valid() {
            return Err(StationValidationError::InvalidCoordinates);
        }

        let image = self.image.filter(|url| !url.trim().is_empty());

        Ok(StationSpec {
            name,
            image,
            location: self.location,
            connected_routes: self.connected_routes,
        })
    }
}
