//! Station and route persistence.
//!
//! The resolver and catalog only see the [`StationStore`] and [`RouteStore`]
//! traits. [`DocumentStore`] keeps both collections in memory and mirrors
//! them to a JSON file; [`TimedStore`] puts a deadline on every call.

mod document;
mod error;
mod query;
mod timed;

use std::future::Future;

pub use document::DocumentStore;
pub use error::StoreError;
pub use query::RouteQuery;
pub use timed::{DEFAULT_STORE_TIMEOUT, TimedStore};

use crate::domain::{DocumentId, Route, RouteSpec, Station, StationName, StationSpec};

/// Access to station documents.
pub trait StationStore: Send + Sync {
    /// Look up a station by canonical name.
    fn station_by_name(
        &self,
        name: &StationName,
    ) -> impl Future<Output = Result<Option<Station>, StoreError>> + Send;

    /// Every station, in insertion order.
    fn all_stations(&self) -> impl Future<Output = Result<Vec<Station>, StoreError>> + Send;

    /// The station closest to a point, with its great-circle distance in metres.
    fn nearest_station(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Option<(Station, f64)>, StoreError>> + Send;

    fn station(
        &self,
        id: DocumentId,
    ) -> impl Future<Output = Result<Option<Station>, StoreError>> + Send;

    /// Store a new station under a fresh identifier.
    ///
    /// Fails with [`StoreError::Conflict`] if the name is taken.
    fn insert_station(
        &self,
        spec: StationSpec,
    ) -> impl Future<Output = Result<Station, StoreError>> + Send;

    /// Replace a station's fields. `None` if no station has this id.
    ///
    /// Fails with [`StoreError::Conflict`] if the new name is taken, or if the
    /// name changes while routes still refer to the old one.
    fn update_station(
        &self,
        id: DocumentId,
        spec: StationSpec,
    ) -> impl Future<Output = Result<Option<Station>, StoreError>> + Send;

    /// Remove a station. `false` if no station has this id.
    ///
    /// Fails with [`StoreError::Conflict`] while any route refers to it.
    fn delete_station(&self, id: DocumentId)
    -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Access to route documents.
pub trait RouteStore: Send + Sync {
    /// First route, in insertion order, matching the query.
    fn find_route(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<Option<Route>, StoreError>> + Send;

    /// Every route, in insertion order.
    fn all_routes(&self) -> impl Future<Output = Result<Vec<Route>, StoreError>> + Send;

    fn route(&self, id: DocumentId)
    -> impl Future<Output = Result<Option<Route>, StoreError>> + Send;

    /// Store a new route under a fresh identifier.
    ///
    /// Fails with [`StoreError::Conflict`] if a route already joins the same
    /// two stations, in either order.
    fn insert_route(
        &self,
        spec: RouteSpec,
    ) -> impl Future<Output = Result<Route, StoreError>> + Send;

    /// Replace a route's fields. `None` if no route has this id.
    fn update_route(
        &self,
        id: DocumentId,
        spec: RouteSpec,
    ) -> impl Future<Output = Result<Option<Route>, StoreError>> + Send;

    /// Remove a route. `false` if no route has this id.
    fn delete_route(&self, id: DocumentId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Number of routes naming `station` as origin, destination or stop.
    fn count_routes_referencing(
        &self,
        station: &StationName,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;
}
