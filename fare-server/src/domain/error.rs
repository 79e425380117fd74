//! Domain validation errors.
//!
//! These represent rejected administrative input. They are distinct from
//! store/IO errors and always map to a bad-request response.

/// Reasons a route document is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteValidationError {
    /// Missing endpoint or non-positive price
    #[error("Invalid route data")]
    InvalidData,

    /// A route flagged as non-direct listed no intermediate stations
    #[error("Non-direct route must have intermediate stations")]
    MissingIntermediates,

    /// An intermediate station name was blank
    #[error("Invalid intermediate station")]
    InvalidIntermediate,

    /// The same station appears twice among origin, intermediates and destination
    #[error("Duplicate stations in route")]
    DuplicateStation,
}

/// Reasons a station document is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationValidationError {
    /// Name was blank
    #[error("Invalid station data: name is required")]
    MissingName,

    /// Coordinates were not finite or outside the valid range
    #[error("Invalid station data: coordinates must be [longitude, latitude]")]
    InvalidCoordinates,
}
