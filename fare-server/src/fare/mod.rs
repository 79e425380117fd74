//! Fare computation.
//!
//! Pure functions: a distance-based fare estimator, great-circle distance
//! and the evening surcharge policy. Nothing here touches the store.

mod distance;
mod estimate;
mod night;

pub use distance::{EARTH_RADIUS_KM, distance_km, haversine_km};
pub use estimate::{FARE_BRACKETS, PER_KM_RATE, estimate_fare};
pub use night::NightFarePolicy;
