//! Domain types for the taxi fare service.
//!
//! Routes reference stations by name rather than by identifier, so the
//! station name doubles as the join key. Every name entering the system goes
//! through [`StationName::parse`], which guarantees one canonical spelling
//! per station. Types here enforce their invariants at construction time.

mod error;
mod id;
mod journey;
mod route;
mod station;

pub use error::{RouteValidationError, StationValidationError};
pub use id::{DocumentId, InvalidDocumentId};
pub use journey::{Journey, Leg};
pub use route::{Route, RouteDraft, RouteSpec};
pub use station::{
    GeometryType, InvalidStationName, Location, STATION_SUFFIX, Station, StationDraft,
    StationName, StationSpec,
};
