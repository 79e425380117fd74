//! Price graph over stations.
//!
//! Route records are flattened into an undirected weighted graph where the
//! weight of an edge is the fare for that hop. Multi-hop records contribute
//! one edge per hop, their price split evenly. The graph is searched with
//! Dijkstra when no single record joins two stations.

mod builder;
mod shortest_path;
mod source;

pub use builder::RouteGraph;
pub use shortest_path::PathResult;
pub use source::{GraphSource, OnDemandGraph};
