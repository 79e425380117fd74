//! Single-fare lookup with the evening surcharge.

use chrono::NaiveTime;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Leg, StationName};
use crate::fare::NightFarePolicy;
use crate::graph::GraphSource;
use crate::store::{RouteQuery, RouteStore};

use super::error::ResolveError;
use super::journey::requested_station;

/// A priced path, as returned to riders asking for a fare.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    /// Stations in travel order
    pub route: Vec<StationName>,
    pub total_price: f64,
    pub legs: Vec<Leg>,
    /// Whether the evening surcharge was applied
    pub is_night: bool,
}

impl FareQuote {
    fn surcharged(mut self, policy: &NightFarePolicy) -> Self {
        self.total_price = policy.surcharge(self.total_price);
        for leg in &mut self.legs {
            leg.price = policy.surcharge(leg.price);
        }
        self.is_night = true;
        self
    }
}

/// Looks up a fare: a stored record joining the two stations if there is
/// one, otherwise the cheapest path through the route graph.
pub struct FareLookup<'a, R, G> {
    routes: &'a R,
    graph: &'a G,
    policy: NightFarePolicy,
}

impl<'a, R: RouteStore, G: GraphSource> FareLookup<'a, R, G> {
    pub fn new(routes: &'a R, graph: &'a G, policy: NightFarePolicy) -> Self {
        Self {
            routes,
            graph,
            policy,
        }
    }

    /// Resolve the fare from `from` to `to` at local time `now`.
    ///
    /// When `now` falls in the policy's window, the total and every leg are
    /// multiplied by the policy's factor.
    pub async fn resolve_with_night_policy(
        &self,
        from: &str,
        to: &str,
        now: NaiveTime,
    ) -> Result<FareQuote, ResolveError> {
        let from = requested_station(from, "from")?;
        let to = requested_station(to, "to")?;

        let stored = self
            .routes
            .find_route(&RouteQuery::between(&from, &to))
            .await?;

        let quote = match stored {
            Some(route) => {
                debug!(route = %route.id, "fare from stored route");
                FareQuote {
                    route: vec![from.clone(), to.clone()],
                    total_price: route.price,
                    legs: vec![Leg::new(from, to, route.price)],
                    is_night: false,
                }
            }
            None => {
                let graph = self.graph.route_graph().await?;
                debug!(
                    stations = graph.station_count(),
                    edges = graph.edge_count(),
                    "searching route graph"
                );
                let path = graph
                    .shortest_path(&from, &to)
                    .ok_or_else(|| ResolveError::NotFound("No route found".into()))?;
                debug!(
                    hops = path.legs.len(),
                    total = path.total_price,
                    "fare from cheapest path"
                );
                FareQuote {
                    route: path.stations,
                    total_price: path.total_price,
                    legs: path.legs,
                    is_night: false,
                }
            }
        };

        if self.policy.is_active(now) {
            Ok(quote.surcharged(&self.policy))
        } else {
            Ok(quote)
        }
    }
}
