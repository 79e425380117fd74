//! Where the route graph comes from.

use std::future::Future;

use crate::store::{RouteStore, StoreError};

use super::builder::RouteGraph;

/// Supplies the route graph for a path search.
pub trait GraphSource: Send + Sync {
    fn route_graph(&self) -> impl Future<Output = Result<RouteGraph, StoreError>> + Send;
}

/// Rebuilds the graph from every stored route on each call.
#[derive(Debug)]
pub struct OnDemandGraph<'a, R> {
    routes: &'a R,
}

impl<'a, R: RouteStore> OnDemandGraph<'a, R> {
    pub fn new(routes: &'a R) -> Self {
        Self { routes }
    }
}

impl<R: RouteStore> GraphSource for OnDemandGraph<'_, R> {
    async fn route_graph(&self) -> Result<RouteGraph, StoreError> {
        let routes = self.routes.all_routes().await?;
        Ok(RouteGraph::from_routes(&routes))
    }
}
