//! Cheapest path search.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use crate::domain::{Leg, StationName};

use super::builder::RouteGraph;

/// Cheapest path between two stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    /// Stations in travel order, both endpoints included
    pub stations: Vec<StationName>,
    pub total_price: f64,
    /// One leg per hop, priced at the edge weight
    pub legs: Vec<Leg>,
}

/// Frontier entry. Ordered so that `BinaryHeap` pops the cheapest first,
/// breaking ties by station name.
#[derive(Debug)]
struct Frontier<'a> {
    cost: f64,
    station: &'a StationName,
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.station.cmp(self.station))
    }
}

impl RouteGraph {
    /// Dijkstra from `from` to `to`.
    ///
    /// Returns a zero-cost single-station path when the endpoints are equal,
    /// and `None` when `to` cannot be reached.
    pub fn shortest_path(&self, from: &StationName, to: &StationName) -> Option<PathResult> {
        if from == to {
            return Some(PathResult {
                stations: vec![from.clone()],
                total_price: 0.0,
                legs: Vec::new(),
            });
        }

        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        let mut dist: HashMap<&StationName, f64> = HashMap::new();
        let mut prev: HashMap<&StationName, &StationName> = HashMap::new();
        let mut visited: HashSet<&StationName> = HashSet::new();
        let mut heap = BinaryHeap::new();

        dist.insert(from, 0.0);
        heap.push(Frontier {
            cost: 0.0,
            station: from,
        });

        while let Some(Frontier { cost, station }) = heap.pop() {
            if !visited.insert(station) {
                continue;
            }
            if station == to {
                break;
            }

            for (neighbor, weight) in self.neighbors(station) {
                if visited.contains(neighbor) {
                    continue;
                }
                let next = cost + weight;
                let better = dist.get(neighbor).is_none_or(|&known| next < known);
                if better {
                    dist.insert(neighbor, next);
                    prev.insert(neighbor, station);
                    heap.push(Frontier {
                        cost: next,
                        station: neighbor,
                    });
                }
            }
        }

        let total_price = *dist.get(to)?;

        let mut stations = vec![to.clone()];
        let mut legs = Vec::new();
        let mut current = to;
        while current != from {
            let before = *prev.get(current)?;
            let price = self.weight(before, current)?;
            legs.push(Leg::new(before.clone(), current.clone(), price));
            stations.push(before.clone());
            current = before;
        }
        stations.reverse();
        legs.reverse();

        Some(PathResult {
            stations,
            total_price,
            legs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentId, Route, RouteDraft};

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn route(from: &str, to: &str, price: f64, via: &[&str]) -> Route {
        let draft = RouteDraft {
            from: from.into(),
            to: to.into(),
            price,
            is_direct_route: via.is_empty(),
            intermediate_stations: via.iter().map(|s| s.to_string()).collect(),
        };
        Route::from_spec(DocumentId::new(), draft.validate().unwrap())
    }

    fn path_names(path: &PathResult) -> Vec<&str> {
        path.stations.iter().map(StationName::base).collect()
    }

    #[test]
    fn same_station_is_free() {
        let graph = RouteGraph::new();
        let path = graph.shortest_path(&name("A"), &name("A")).unwrap();
        assert_eq!(path.total_price, 0.0);
        assert_eq!(path_names(&path), vec!["A"]);
        assert!(path.legs.is_empty());
    }

    #[test]
    fn picks_cheaper_two_hop_path() {
        let graph = RouteGraph::from_routes(&[
            route("A", "B", 10.0, &[]),
            route("B", "C", 10.0, &[]),
            route("A", "C", 50.0, &[]),
        ]);
        let path = graph.shortest_path(&name("A"), &name("C")).unwrap();
        assert_eq!(path_names(&path), vec!["A", "B", "C"]);
        assert_eq!(path.total_price, 20.0);
        assert_eq!(path.legs.len(), 2);
        assert_eq!(path.legs[0].from, name("A"));
        assert_eq!(path.legs[1].to, name("C"));
    }

    #[test]
    fn traverses_edges_backwards() {
        let graph = RouteGraph::from_routes(&[
            route("A", "B", 10.0, &[]),
            route("C", "B", 15.0, &[]),
        ]);
        let path = graph.shortest_path(&name("C"), &name("A")).unwrap();
        assert_eq!(path_names(&path), vec!["C", "B", "A"]);
        assert_eq!(path.total_price, 25.0);
    }

    #[test]
    fn uses_synthesized_intermediate_hops() {
        let graph = RouteGraph::from_routes(&[
            route("A", "D", 90.0, &["B", "C"]),
            route("C", "X", 5.0, &[]),
        ]);
        let path = graph.shortest_path(&name("A"), &name("X")).unwrap();
        assert_eq!(path_names(&path), vec!["A", "B", "C", "X"]);
        assert!((path.total_price - 65.0).abs() < 1e-9);
    }

    #[test]
    fn disconnected_components_have_no_path() {
        let graph = RouteGraph::from_routes(&[
            route("A", "B", 10.0, &[]),
            route("C", "D", 10.0, &[]),
        ]);
        assert!(graph.shortest_path(&name("A"), &name("D")).is_none());
    }

    #[test]
    fn unknown_station_has_no_path() {
        let graph = RouteGraph::from_routes(&[route("A", "B", 10.0, &[])]);
        assert!(graph.shortest_path(&name("A"), &name("Z")).is_none());
        assert!(graph.shortest_path(&name("Z"), &name("A")).is_none());
    }

    #[test]
    fn legs_sum_to_total() {
        let graph = RouteGraph::from_routes(&[
            route("A", "B", 12.5, &[]),
            route("B", "C", 7.25, &[]),
            route("C", "D", 30.0, &["E"]),
        ]);
        let path = graph.shortest_path(&name("A"), &name("D")).unwrap();
        let sum: f64 = path.legs.iter().map(|l| l.price).sum();
        assert!((sum - path.total_price).abs() < 1e-9);
        for pair in path.legs.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn equal_cost_paths_give_a_minimum() {
        let graph = RouteGraph::from_routes(&[
            route("A", "B", 10.0, &[]),
            route("B", "D", 10.0, &[]),
            route("A", "C", 10.0, &[]),
            route("C", "D", 10.0, &[]),
        ]);
        let path = graph.shortest_path(&name("A"), &name("D")).unwrap();
        assert_eq!(path.total_price, 20.0);
        assert_eq!(path.stations.len(), 3);
    }
}
