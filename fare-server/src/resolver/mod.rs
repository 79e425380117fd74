//! Fare and journey resolution.
//!
//! Two entry points share the stores but differ in strategy:
//!
//! - [`JourneyResolver`] answers "what does this trip cost and which
//!   stations does it pass?" from stored records, falling back to a
//!   distance estimate when no record joins the two stations. Prices are
//!   returned as stored.
//! - [`FareLookup`] answers the single-fare question: a stored record if
//!   there is one, otherwise the cheapest path through the route graph,
//!   with the evening surcharge applied.

mod error;
mod fare_lookup;
mod journey;

pub use error::ResolveError;
pub use fare_lookup::{FareLookup, FareQuote};
pub use journey::{JourneyResolver, split_unknown_segments};
