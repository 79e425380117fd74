//! Journey resolution from stored records.

use tracing::{debug, warn};

use crate::domain::{Journey, Leg, Route, Station, StationName};
use crate::fare::{distance_km, estimate_fare};
use crate::store::{RouteQuery, RouteStore, StationStore};

use super::error::ResolveError;

/// Largest tolerated gap between the leg sum and a route's stored price
/// before it is reported as a data problem.
const PRICE_TOLERANCE: f64 = 1e-6;

/// Parse a station name from request input.
pub(crate) fn requested_station(raw: &str, field: &str) -> Result<StationName, ResolveError> {
    StationName::parse(raw)
        .map_err(|_| ResolveError::BadRequest(format!("Missing or empty '{field}' station")))
}

/// Price each segment of a multi-hop route.
///
/// `known[i]` is the price of segment `i` if a direct record covers it.
/// Whatever the known segments leave of `total` is shared evenly between
/// the unknown ones.
///
/// ```
/// use fare_server::resolver::split_unknown_segments;
///
/// let prices = split_unknown_segments(90.0, &[Some(20.0), None, None]);
/// assert_eq!(prices, vec![20.0, 35.0, 35.0]);
/// ```
pub fn split_unknown_segments(total: f64, known: &[Option<f64>]) -> Vec<f64> {
    let known_sum: f64 = known.iter().flatten().sum();
    let unknown = known.iter().filter(|p| p.is_none()).count();
    let share = if unknown == 0 {
        0.0
    } else {
        (total - known_sum) / unknown as f64
    };
    known.iter().map(|p| p.unwrap_or(share)).collect()
}

/// Resolves journeys between two stations.
///
/// Holds no state of its own; every call reads the stores afresh.
pub struct JourneyResolver<'a, S, R> {
    stations: &'a S,
    routes: &'a R,
}

impl<'a, S: StationStore, R: RouteStore> JourneyResolver<'a, S, R> {
    pub fn new(stations: &'a S, routes: &'a R) -> Self {
        Self { stations, routes }
    }

    /// Resolve a journey from `from` to `to`.
    ///
    /// Names are canonicalized first, so `"Bole"` and `"Bole Station"` are
    /// the same station. In order:
    ///
    /// 1. The same station on both ends is a free, legless journey.
    /// 2. A direct record joining the two (either order) gives one leg at
    ///    the stored price.
    /// 3. A multi-hop record gives one leg per hop. Hops covered by their
    ///    own direct record take that price; the rest share the remainder.
    /// 4. With no record at all, the fare is estimated from the
    ///    great-circle distance.
    pub async fn resolve(&self, from: &str, to: &str) -> Result<Journey, ResolveError> {
        let from = requested_station(from, "from")?;
        let to = requested_station(to, "to")?;
        debug!(%from, %to, "resolving journey");

        if from == to {
            let station = self
                .stations
                .station_by_name(&from)
                .await?
                .ok_or_else(|| ResolveError::NotFound(format!("Station not found: {from}")))?;
            return Ok(Journey::single_stop(station));
        }

        let route = self
            .routes
            .find_route(&RouteQuery::between(&from, &to))
            .await?;

        match route {
            Some(route) if route.is_direct_route => {
                let (origin, destination) = self.endpoints(&from, &to).await?;
                Ok(Journey::direct(origin, destination, route.price))
            }
            Some(route) if !route.intermediate_stations.is_empty() => {
                self.via_intermediates(&from, &route).await
            }
            Some(route) => Err(ResolveError::InvalidState(route.id.to_string())),
            None => {
                let (origin, destination) = self.endpoints(&from, &to).await?;
                let km = distance_km(&origin.location, &destination.location);
                let fare = estimate_fare(km);
                debug!(km, fare, "no stored route, fare estimated from distance");
                Ok(Journey::direct(origin, destination, fare))
            }
        }
    }

    async fn endpoints(
        &self,
        from: &StationName,
        to: &StationName,
    ) -> Result<(Station, Station), ResolveError> {
        let origin = self.lookup(from).await?;
        let destination = self.lookup(to).await?;
        Ok((origin, destination))
    }

    async fn lookup(&self, name: &StationName) -> Result<Station, ResolveError> {
        self.stations
            .station_by_name(name)
            .await?
            .ok_or_else(|| ResolveError::Lookup(name.to_string()))
    }

    async fn via_intermediates(
        &self,
        from: &StationName,
        route: &Route,
    ) -> Result<Journey, ResolveError> {
        // Travel in the requested direction even if the record runs the other way.
        let mut stops: Vec<StationName> = route.stops().into_iter().cloned().collect();
        if &route.from != from {
            stops.reverse();
        }

        let mut stations = Vec::with_capacity(stops.len());
        for name in &stops {
            stations.push(self.lookup(name).await?);
        }

        let mut known = Vec::with_capacity(stops.len() - 1);
        for hop in stops.windows(2) {
            let direct = self
                .routes
                .find_route(&RouteQuery::direct_between(&hop[0], &hop[1]))
                .await?;
            known.push(direct.map(|r| r.price));
        }

        let prices = split_unknown_segments(route.price, &known);
        let legs: Vec<Leg> = stops
            .windows(2)
            .zip(prices)
            .map(|(hop, price)| Leg::new(hop[0].clone(), hop[1].clone(), price))
            .collect();

        let journey = Journey {
            stations,
            total_price: route.price,
            legs,
        };

        let leg_sum = journey.leg_total();
        if (leg_sum - route.price).abs() > PRICE_TOLERANCE {
            warn!(
                route = %route.id,
                leg_sum,
                route_price = route.price,
                "leg prices do not add up to the route price"
            );
        }

        Ok(journey)
    }
}
