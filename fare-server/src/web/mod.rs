//! Web layer for the taxi fare service.
//!
//! Handlers are thin: they parse input, call the resolver, catalog or
//! contribution desk, and map typed errors to status codes.

mod dto;
mod map;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use map::{MapEnrichment, enrich};
pub use routes::{AppError, create_router};
pub use state::{AppState, Contributions, Store};
pub use templates::*;
