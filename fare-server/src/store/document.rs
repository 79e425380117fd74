//! JSON document store.
//!
//! Both collections live in memory behind one lock. When opened from a
//! file, every successful mutation rewrites the whole file, so the file
//! always holds the last committed state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{DocumentId, Route, RouteSpec, Station, StationName, StationSpec};
use crate::fare::haversine_km;

use super::error::StoreError;
use super::query::RouteQuery;
use super::{RouteStore, StationStore};

/// On-disk layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    stations: Vec<Station>,
    #[serde(default)]
    routes: Vec<Route>,
}

impl Collections {
    fn station_name_taken(&self, name: &StationName, except: Option<DocumentId>) -> bool {
        self.stations
            .iter()
            .any(|s| &s.name == name && Some(s.id) != except)
    }

    fn route_pair_taken(&self, spec: &RouteSpec, except: Option<DocumentId>) -> bool {
        self.routes
            .iter()
            .any(|r| r.connects(&spec.from, &spec.to) && Some(r.id) != except)
    }

    fn station_referenced(&self, name: &StationName) -> bool {
        self.routes.iter().any(|r| r.references(name))
    }
}

/// Station and route documents, optionally mirrored to a JSON file.
#[derive(Debug)]
pub struct DocumentStore {
    collections: RwLock<Collections>,
    path: Option<PathBuf>,
}

impl DocumentStore {
    /// An empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            path: None,
        }
    }

    /// A store preloaded with documents, never written to disk.
    pub fn with_documents(stations: Vec<Station>, routes: Vec<Route>) -> Self {
        Self {
            collections: RwLock::new(Collections { stations, routes }),
            path: None,
        }
    }

    /// Load a store from `path`, creating it empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no data file yet, starting empty");
                Collections::default()
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            stations = collections.stations.len(),
            routes = collections.routes.len(),
            "loaded document store"
        );

        Ok(Self {
            collections: RwLock::new(collections),
            path: Some(path),
        })
    }

    /// Write `next` to the backing file, if any.
    async fn persist(&self, next: &Collections) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(next)?;
        tokio::fs::write(path, bytes).await?;
        debug!(path = %path.display(), "persisted document store");
        Ok(())
    }

    /// Apply `change` to a copy of the collections, persist it, then commit.
    ///
    /// If `change` fails or the file cannot be written, nothing changes.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Collections) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.collections.write().await;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

impl StationStore for DocumentStore {
    async fn station_by_name(&self, name: &StationName) -> Result<Option<Station>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.stations.iter().find(|s| &s.name == name).cloned())
    }

    async fn all_stations(&self) -> Result<Vec<Station>, StoreError> {
        Ok(self.collections.read().await.stations.clone())
    }

    async fn nearest_station(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<(Station, f64)>, StoreError> {
        let collections = self.collections.read().await;
        let nearest = collections
            .stations
            .iter()
            .map(|s| {
                let metres = haversine_km((latitude, longitude), s.location.lat_lng()) * 1000.0;
                (s, metres)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, metres)| (s.clone(), metres));
        Ok(nearest)
    }

    async fn station(&self, id: DocumentId) -> Result<Option<Station>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.stations.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_station(&self, spec: StationSpec) -> Result<Station, StoreError> {
        self.mutate(|c| {
            if c.station_name_taken(&spec.name, None) {
                return Err(StoreError::Conflict("Station already exists".into()));
            }
            let station = Station::from_spec(DocumentId::new(), spec);
            c.stations.push(station.clone());
            Ok(station)
        })
        .await
    }

    async fn update_station(
        &self,
        id: DocumentId,
        spec: StationSpec,
    ) -> Result<Option<Station>, StoreError> {
        self.mutate(|c| {
            let Some(current) = c.stations.iter().find(|s| s.id == id) else {
                return Ok(None);
            };
            if current.name != spec.name && c.station_referenced(&current.name) {
                return Err(StoreError::Conflict(
                    "Cannot rename station: it is referenced by existing routes".into(),
                ));
            }
            if c.station_name_taken(&spec.name, Some(id)) {
                return Err(StoreError::Conflict("Station already exists".into()));
            }
            let updated = Station::from_spec(id, spec);
            if let Some(slot) = c.stations.iter_mut().find(|s| s.id == id) {
                *slot = updated.clone();
            }
            Ok(Some(updated))
        })
        .await
    }

    async fn delete_station(&self, id: DocumentId) -> Result<bool, StoreError> {
        self.mutate(|c| {
            let Some(station) = c.stations.iter().find(|s| s.id == id) else {
                return Ok(false);
            };
            if c.station_referenced(&station.name) {
                return Err(StoreError::Conflict(
                    "Cannot delete station: it is referenced by existing routes".into(),
                ));
            }
            c.stations.retain(|s| s.id != id);
            Ok(true)
        })
        .await
    }
}

impl RouteStore for DocumentStore {
    async fn find_route(&self, query: &RouteQuery) -> Result<Option<Route>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.routes.iter().find(|r| query.matches(r)).cloned())
    }

    async fn all_routes(&self) -> Result<Vec<Route>, StoreError> {
        Ok(self.collections.read().await.routes.clone())
    }

    async fn route(&self, id: DocumentId) -> Result<Option<Route>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.routes.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_route(&self, spec: RouteSpec) -> Result<Route, StoreError> {
        self.mutate(|c| {
            if c.route_pair_taken(&spec, None) {
                return Err(StoreError::Conflict("Route already exists".into()));
            }
            let route = Route::from_spec(DocumentId::new(), spec);
            c.routes.push(route.clone());
            Ok(route)
        })
        .await
    }

    async fn update_route(
        &self,
        id: DocumentId,
        spec: RouteSpec,
    ) -> Result<Option<Route>, StoreError> {
        self.mutate(|c| {
            if !c.routes.iter().any(|r| r.id == id) {
                return Ok(None);
            }
            if c.route_pair_taken(&spec, Some(id)) {
                return Err(StoreError::Conflict("Route already exists".into()));
            }
            let updated = Route::from_spec(id, spec);
            if let Some(slot) = c.routes.iter_mut().find(|r| r.id == id) {
                *slot = updated.clone();
            }
            Ok(Some(updated))
        })
        .await
    }

    async fn delete_route(&self, id: DocumentId) -> Result<bool, StoreError> {
        self.mutate(|c| {
            let before = c.routes.len();
            c.routes.retain(|r| r.id != id);
            Ok(c.routes.len() != before)
        })
        .await
    }

    async fn count_routes_referencing(&self, station: &StationName) -> Result<usize, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .routes
            .iter()
            .filter(|r| r.references(station))
            .count())
    }
}
