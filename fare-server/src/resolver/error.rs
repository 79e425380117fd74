//! Resolution error types.

use crate::store::StoreError;

/// Errors from journey and fare resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A station name was missing or blank
    #[error("{0}")]
    BadRequest(String),

    /// The requested station or route does not exist
    #[error("{0}")]
    NotFound(String),

    /// A station named by a stored route could not be found
    #[error("error fetching station details: {0}")]
    Lookup(String),

    /// A stored route is neither direct nor has intermediate stations
    #[error("route {0} is neither direct nor has intermediate stations")]
    InvalidState(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
