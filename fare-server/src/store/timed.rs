//! Per-call deadlines for store access.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::domain::{DocumentId, Route, RouteSpec, Station, StationName, StationSpec};

use super::error::StoreError;
use super::query::RouteQuery;
use super::{RouteStore, StationStore};

/// Default deadline for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Store wrapper that fails any call taking longer than `deadline`.
///
/// A timed-out call surfaces as [`StoreError::Timeout`] instead of hanging
/// the request.
#[derive(Debug)]
pub struct TimedStore<S> {
    inner: S,
    deadline: Duration,
}

impl<S> TimedStore<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    /// Wrap a store with the default ten second deadline.
    pub fn with_default_deadline(inner: S) -> Self {
        Self::new(inner, DEFAULT_STORE_TIMEOUT)
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "store call timed out"
                );
                Err(StoreError::Timeout {
                    operation,
                    after: self.deadline,
                })
            }
        }
    }
}

impl<S: StationStore> StationStore for TimedStore<S> {
    async fn station_by_name(&self, name: &StationName) -> Result<Option<Station>, StoreError> {
        self.bounded("station_by_name", self.inner.station_by_name(name))
            .await
    }

    async fn all_stations(&self) -> Result<Vec<Station>, StoreError> {
        self.bounded("all_stations", self.inner.all_stations()).await
    }

    async fn nearest_station(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<(Station, f64)>, StoreError> {
        self.bounded(
            "nearest_station",
            self.inner.nearest_station(latitude, longitude),
        )
        .await
    }

    async fn station(&self, id: DocumentId) -> Result<Option<Station>, StoreError> {
        self.bounded("station", self.inner.station(id)).await
    }

    async fn insert_station(&self, spec: StationSpec) -> Result<Station, StoreError> {
        self.bounded("insert_station", self.inner.insert_station(spec))
            .await
    }

    async fn update_station(
        &self,
        id: DocumentId,
        spec: StationSpec,
    ) -> Result<Option<Station>, StoreError> {
        self.bounded("update_station", self.inner.update_station(id, spec))
            .await
    }

    async fn delete_station(&self, id: DocumentId) -> Result<bool, StoreError> {
        self.bounded("delete_station", self.inner.delete_station(id))
            .await
    }
}

impl<S: RouteStore> RouteStore for TimedStore<S> {
    async fn find_route(&self, query: &RouteQuery) -> Result<Option<Route>, StoreError> {
        self.bounded("find_route", self.inner.find_route(query)).await
    }

    async fn all_routes(&self) -> Result<Vec<Route>, StoreError> {
        self.bounded("all_routes", self.inner.all_routes()).await
    }

    async fn route(&self, id: DocumentId) -> Result<Option<Route>, StoreError> {
        self.bounded("route", self.inner.route(id)).await
    }

    async fn insert_route(&self, spec: RouteSpec) -> Result<Route, StoreError> {
        self.bounded("insert_route", self.inner.insert_route(spec))
            .await
    }

    async fn update_route(
        &self,
        id: DocumentId,
        spec: RouteSpec,
    ) -> Result<Option<Route>, StoreError> {
        self.bounded("update_route", self.inner.update_route(id, spec))
            .await
    }

    async fn delete_route(&self, id: DocumentId) -> Result<bool, StoreError> {
        self.bounded("delete_route", self.inner.delete_route(id))
            .await
    }

    async fn count_routes_referencing(&self, station: &StationName) -> Result<usize, StoreError> {
        self.bounded(
            "count_routes_referencing",
            self.inner.count_routes_referencing(station),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;

    /// A route store whose listing never finishes.
    struct StalledRoutes;

    impl RouteStore for StalledRoutes {
        async fn find_route(&self, _query: &RouteQuery) -> Result<Option<Route>, StoreError> {
            Ok(None)
        }

        async fn all_routes(&self) -> Result<Vec<Route>, StoreError> {
            std::future::pending().await
        }

        async fn route(&self, _id: DocumentId) -> Result<Option<Route>, StoreError> {
            Ok(None)
        }

        async fn insert_route(&self, _spec: RouteSpec) -> Result<Route, StoreError> {
            Err(StoreError::Conflict("read only".into()))
        }

        async fn update_route(
            &self,
            _id: DocumentId,
            _spec: RouteSpec,
        ) -> Result<Option<Route>, StoreError> {
            Ok(None)
        }

        async fn delete_route(&self, _id: DocumentId) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn count_routes_referencing(
            &self,
            _station: &StationName,
        ) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn slow_call_times_out() {
        let store = TimedStore::new(StalledRoutes, Duration::from_millis(20));
        let err = store.all_routes().await.unwrap_err();
        match err {
            StoreError::Timeout { operation, after } => {
                assert_eq!(operation, "all_routes");
                assert_eq!(after, Duration::from_millis(20));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let store = TimedStore::new(StalledRoutes, Duration::from_millis(20));
        let station = StationName::parse("A").unwrap();
        let count = store.count_routes_referencing(&station).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn wraps_document_store() {
        let store = TimedStore::with_default_deadline(DocumentStore::in_memory());
        assert!(store.all_stations().await.unwrap().is_empty());
        assert_eq!(store.deadline(), DEFAULT_STORE_TIMEOUT);
    }
}
