//! Graph construction from route records.

use std::collections::BTreeMap;

use crate::domain::{Route, StationName};

/// Undirected weighted adjacency map keyed by canonical station name.
///
/// Stations without incident edges do not appear. `BTreeMap` keeps neighbour
/// iteration in name order so searches are reproducible.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    adjacency: BTreeMap<StationName, BTreeMap<StationName, f64>>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from every route record.
    ///
    /// Records are applied in order. For each direction of each edge the
    /// first record to supply a weight keeps it.
    pub fn from_routes<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Self {
        let mut graph = Self::new();
        for route in routes {
            graph.add_route(route);
        }
        graph
    }

    /// Add the edges contributed by one route record.
    ///
    /// Every record joins its endpoints at the full price. A record with
    /// intermediate stations also adds a chain through them, each hop priced
    /// at `price / (intermediates + 1)`.
    pub fn add_route(&mut self, route: &Route) {
        self.add_edge(&route.from, &route.to, route.price);

        if route.is_direct_route || route.intermediate_stations.is_empty() {
            return;
        }

        let hops = route.intermediate_stations.len() + 1;
        let segment_price = route.price / hops as f64;
        let stops = route.stops();
        for pair in stops.windows(2) {
            self.add_edge(pair[0], pair[1], segment_price);
        }
    }

    fn add_edge(&mut self, a: &StationName, b: &StationName, weight: f64) {
        if a == b || !weight.is_finite() || weight < 0.0 {
            return;
        }
        self.insert_if_absent(a, b, weight);
        self.insert_if_absent(b, a, weight);
    }

    fn insert_if_absent(&mut self, from: &StationName, to: &StationName, weight: f64) {
        self.adjacency
            .entry(from.clone())
            .or_default()
            .entry(to.clone())
            .or_insert(weight);
    }

    /// Weight of the edge from `a` to `b`, if any.
    pub fn weight(&self, a: &StationName, b: &StationName) -> Option<f64> {
        self.adjacency.get(a)?.get(b).copied()
    }

    /// Neighbours of `station` with edge weights, in name order.
    pub fn neighbors<'a>(
        &'a self,
        station: &StationName,
    ) -> impl Iterator<Item = (&'a StationName, f64)> + 'a {
        self.adjacency
            .get(station)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(name, &w)| (name, w)))
    }

    /// Whether `station` has at least one incident edge.
    pub fn contains(&self, station: &StationName) -> bool {
        self.adjacency.contains_key(station)
    }

    /// Number of stations with at least one incident edge.
    pub fn station_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges. Each undirected hop counts twice.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }
}
