//! Driving directions for journeys shown on a map.
//!
//! Directions are decoration: every failure is logged and the affected leg
//! contributes nothing.

use futures::future::{join, join_all};
use tracing::warn;

use crate::directions::{DirectionsService, DrivingRoute};
use crate::domain::{Location, Station};

/// What the directions service added to a journey.
#[derive(Debug, Default, PartialEq)]
pub struct MapEnrichment {
    /// Geometry of the rider's way to the first station
    pub path: Option<serde_json::Value>,
    /// Metres
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

async fn leg<D: DirectionsService>(
    directions: &D,
    from: &Location,
    to: &Location,
    label: &str,
) -> Option<DrivingRoute> {
    match directions.driving_route(from, to).await {
        Ok(route) => Some(route),
        Err(e) => {
            warn!(leg = label, error = %e, "directions unavailable");
            None
        }
    }
}

/// Ask for driving directions along `stations`, and from `rider` to the
/// first station when a position is given. Requests run concurrently.
pub async fn enrich<D: DirectionsService>(
    directions: &D,
    stations: &[Station],
    rider: Option<Location>,
) -> MapEnrichment {
    let approach = async {
        match (rider.as_ref(), stations.first()) {
            (Some(rider), Some(first)) => {
                leg(directions, rider, &first.location, "approach").await
            }
            _ => None,
        }
    };
    let hops = join_all(stations.windows(2).map(|pair| {
        let label = pair[0].name.as_str();
        leg(directions, &pair[0].location, &pair[1].location, label)
    }));

    let (approach, hops) = join(approach, hops).await;

    let mut enrichment = MapEnrichment::default();
    if let Some(route) = approach {
        enrichment.distance += route.distance;
        enrichment.duration += route.duration;
        enrichment.path = Some(route.geometry);
    }
    for route in hops.into_iter().flatten() {
        enrichment.distance += route.distance;
        enrichment.duration += route.duration;
    }
    enrichment
}
