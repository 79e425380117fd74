//! Priced route records between stations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::RouteValidationError;
use super::id::DocumentId;
use super::station::StationName;

/// A stored route.
///
/// `price` is the total for the whole record. A direct route has no
/// intermediate stations; a non-direct route has at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: DocumentId,
    pub from: StationName,
    pub to: StationName,
    pub price: f64,
    pub is_direct_route: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intermediate_stations: Vec<StationName>,
}

impl Route {
    /// Build a stored route from validated fields.
    pub fn from_spec(id: DocumentId, spec: RouteSpec) -> Self {
        Self {
            id,
            from: spec.from,
            to: spec.to,
            price: spec.price,
            is_direct_route: spec.is_direct_route,
            intermediate_stations: spec.intermediate_stations,
        }
    }

    /// True if this record joins `a` and `b`, in either order.
    pub fn connects(&self, a: &StationName, b: &StationName) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    /// True if `name` is the origin, the destination or an intermediate stop.
    pub fn references(&self, name: &StationName) -> bool {
        &self.from == name || &self.to == name || self.intermediate_stations.contains(name)
    }

    /// All stations in travel order, origin first.
    pub fn stops(&self) -> Vec<&StationName> {
        std::iter::once(&self.from)
            .chain(self.intermediate_stations.iter())
            .chain(std::iter::once(&self.to))
            .collect()
    }
}

/// Route fields as submitted by an administrator, before validation.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation error rather than a JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteDraft {
    pub from: String,
    pub to: String,
    pub price: f64,
    pub is_direct_route: bool,
    pub intermediate_stations: Vec<String>,
}

/// Validated route fields, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSpec {
    pub from: StationName,
    pub to: StationName,
    pub price: f64,
    pub is_direct_route: bool,
    pub intermediate_stations: Vec<StationName>,
}

impl RouteDraft {
    /// Canonicalize every station name and check the record's invariants.
    pub fn validate(self) -> Result<RouteSpec, RouteValidationError> {
        let from =
            StationName::parse(&self.from).map_err(|_| RouteValidationError::InvalidData)?;
        let to = StationName::parse(&self.to).map_err(|_| RouteValidationError::InvalidData)?;

        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(RouteValidationError::InvalidData);
        }

        if self.is_direct_route {
            if from == to {
                return Err(RouteValidationError::DuplicateStation);
            }
            return Ok(RouteSpec {
                from,
                to,
                price: self.price,
                is_direct_route: true,
                intermediate_stations: Vec::new(),
            });
        }

        if self.intermediate_stations.is_empty() {
            return Err(RouteValidationError::MissingIntermediates);
        }

        let intermediate_stations = self
            .intermediate_stations
            .iter()
            .map(|raw| StationName::parse(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RouteValidationError::InvalidIntermediate)?;

        let mut seen = HashSet::new();
        let all_distinct = std::iter::once(&from)
            .chain(intermediate_stations.iter())
            .chain(std::iter::once(&to))
            .all(|name| seen.insert(name));
        if !all_distinct {
            return Err(RouteValidationError::DuplicateStation);
        }

        Ok(RouteSpec {
            from,
            to,
            price: self.price,
            is_direct_route: false,
            intermediate_stations,
        })
    }
}
