//! Driving directions between stations.
//!
//! Used only to decorate map responses. Callers treat every failure here as
//! "no directions available" and carry on.

mod client;
mod error;
mod types;

use std::future::Future;

pub use client::{OsrmClient, OsrmConfig};
pub use error::DirectionsError;
pub use types::DrivingRoute;

use crate::domain::Location;

/// Something that can plan a driving route between two points.
pub trait DirectionsService: Send + Sync {
    fn driving_route(
        &self,
        from: &Location,
        to: &Location,
    ) -> impl Future<Output = Result<DrivingRoute, DirectionsError>> + Send;
}
