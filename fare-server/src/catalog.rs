//! Administrative changes to stations and routes.
//!
//! All validation of submitted documents happens here, before anything
//! reaches the store.

use tracing::info;

use crate::domain::{
    DocumentId, Route, RouteDraft, RouteValidationError, Station, StationDraft,
    StationValidationError,
};
use crate::store::{RouteStore, StationStore, StoreError};

/// Errors from administrative operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Submitted data failed validation
    #[error("{0}")]
    BadRequest(String),

    /// No document has the given id
    #[error("{0}")]
    NotFound(String),

    /// The change would break a uniqueness or reference rule
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => CatalogError::Conflict(message),
            other => CatalogError::Store(other),
        }
    }
}

impl From<RouteValidationError> for CatalogError {
    fn from(err: RouteValidationError) -> Self {
        CatalogError::BadRequest(err.to_string())
    }
}

impl From<StationValidationError> for CatalogError {
    fn from(err: StationValidationError) -> Self {
        CatalogError::BadRequest(err.to_string())
    }
}

fn parse_id(raw: &str) -> Result<DocumentId, CatalogError> {
    DocumentId::parse(raw).map_err(|_| CatalogError::BadRequest("Invalid ID format".into()))
}

/// Create, update and delete stations and routes.
pub struct Catalog<'a, S, R> {
    stations: &'a S,
    routes: &'a R,
}

impl<'a, S: StationStore, R: RouteStore> Catalog<'a, S, R> {
    pub fn new(stations: &'a S, routes: &'a R) -> Self {
        Self { stations, routes }
    }

    pub async fn station(&self, id: &str) -> Result<Station, CatalogError> {
        let id = parse_id(id)?;
        self.stations
            .station(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Station not found".into()))
    }

    pub async fn add_station(&self, draft: StationDraft) -> Result<Station, CatalogError> {
        let spec = draft.validate()?;
        let station = self.stations.insert_station(spec).await?;
        info!(id = %station.id, name = %station.name, "station added");
        Ok(station)
    }

    pub async fn update_station(
        &self,
        id: &str,
        draft: StationDraft,
    ) -> Result<Station, CatalogError> {
        let id = parse_id(id)?;
        let spec = draft.validate()?;
        let station = self
            .stations
            .update_station(id, spec)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Station not found".into()))?;
        info!(%id, name = %station.name, "station updated");
        Ok(station)
    }

    /// Delete a station that no route mentions.
    pub async fn delete_station(&self, id: &str) -> Result<(), CatalogError> {
        let id = parse_id(id)?;
        if !self.stations.delete_station(id).await? {
            return Err(CatalogError::NotFound("Station not found".into()));
        }
        info!(%id, "station deleted");
        Ok(())
    }

    pub async fn add_route(&self, draft: RouteDraft) -> Result<Route, CatalogError> {
        let spec = draft.validate()?;
        let route = self.routes.insert_route(spec).await?;
        info!(id = %route.id, from = %route.from, to = %route.to, "route added");
        Ok(route)
    }

    pub async fn update_route(&self, id: &str, draft: RouteDraft) -> Result<Route, CatalogError> {
        let id = parse_id(id)?;
        let spec = draft.validate()?;
        let route = self
            .routes
            .update_route(id, spec)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Route not found".into()))?;
        info!(%id, from = %route.from, to = %route.to, "route updated");
        Ok(route)
    }

    pub async fn delete_route(&self, id: &str) -> Result<(), CatalogError> {
        let id = parse_id(id)?;
        if !self.routes.delete_route(id).await? {
            return Err(CatalogError::NotFound("Route not found".into()));
        }
        info!(%id, "route deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use crate::store::DocumentStore;

    fn station_draft(name: &str) -> StationDraft {
        StationDraft {
            name: name.into(),
            image: None,
            location: Location::point(38.75, 9.0),
            connected_routes: Vec::new(),
        }
    }

    fn route_draft(from: &str, to: &str, price: f64, via: &[&str]) -> RouteDraft {
        RouteDraft {
            from: from.into(),
            to: to.into(),
            price,
            is_direct_route: via.is_empty(),
            intermediate_stations: via.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn add_station_canonicalizes_name() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let station = catalog.add_station(station_draft(" Bole ")).await.unwrap();
        assert_eq!(station.name.as_str(), "Bole Station");
    }

    #[tokio::test]
    async fn duplicate_station_is_conflict() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        catalog.add_station(station_draft("Bole")).await.unwrap();
        let err = catalog
            .add_station(station_draft("Bole Station"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn invalid_station_is_bad_request() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let err = catalog.add_station(station_draft("")).await.unwrap_err();
        assert!(matches!(err, CatalogError::BadRequest(_)));
    }

    #[tokio::test]
    async fn non_positive_price_is_bad_request() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let err = catalog
            .add_route(route_draft("A", "B", 0.0, &[]))
            .await
            .unwrap_err();
        match err {
            CatalogError::BadRequest(message) => assert_eq!(message, "Invalid route data"),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_route_is_conflict() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        catalog
            .add_route(route_draft("A", "B", 10.0, &[]))
            .await
            .unwrap();
        let err = catalog
            .add_route(route_draft("B Station", "A", 12.0, &[]))
            .await
            .unwrap_err();
        match err {
            CatalogError::Conflict(message) => assert_eq!(message, "Route already exists"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn referenced_station_cannot_be_deleted() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let b = catalog.add_station(station_draft("B")).await.unwrap();
        catalog
            .add_route(route_draft("A", "C", 30.0, &["B"]))
            .await
            .unwrap();

        let err = catalog
            .delete_station(&b.id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn referenced_station_cannot_be_renamed() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let bole = catalog.add_station(station_draft("Bole")).await.unwrap();
        catalog.add_station(station_draft("Piassa")).await.unwrap();
        catalog
            .add_route(route_draft("Bole", "Piassa", 20.0, &[]))
            .await
            .unwrap();

        let err = catalog
            .update_station(&bole.id.to_string(), station_draft("Bolee"))
            .await
            .unwrap_err();
        match err {
            CatalogError::Conflict(message) => assert_eq!(
                message,
                "Cannot rename station: it is referenced by existing routes"
            ),
            other => panic!("expected conflict, got {other:?}"),
        }

        let kept = catalog.station(&bole.id.to_string()).await.unwrap();
        assert_eq!(kept.name.as_str(), "Bole Station");
        assert!(matches!(
            catalog.delete_station(&bole.id.to_string()).await,
            Err(CatalogError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn referenced_station_keeps_name_on_update() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let bole = catalog.add_station(station_draft("Bole")).await.unwrap();
        catalog
            .add_route(route_draft("Bole", "Piassa", 20.0, &[]))
            .await
            .unwrap();

        let mut draft = station_draft("Bole Station");
        draft.location = Location::point(38.79, 8.99);
        let updated = catalog
            .update_station(&bole.id.to_string(), draft)
            .await
            .unwrap();
        assert_eq!(updated.location, Location::point(38.79, 8.99));
    }

    #[tokio::test]
    async fn unreferenced_station_can_be_renamed() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let bole = catalog.add_station(station_draft("Bole")).await.unwrap();
        let renamed = catalog
            .update_station(&bole.id.to_string(), station_draft("Bolee"))
            .await
            .unwrap();
        assert_eq!(renamed.name.as_str(), "Bolee Station");
    }

    #[tokio::test]
    async fn unreferenced_station_is_deleted() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let b = catalog.add_station(station_draft("B")).await.unwrap();
        catalog.delete_station(&b.id.to_string()).await.unwrap();

        let err = catalog.station(&b.id.to_string()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn station_deletable_once_its_route_is_gone() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let a = catalog.add_station(station_draft("A")).await.unwrap();
        let route = catalog
            .add_route(route_draft("A", "B", 10.0, &[]))
            .await
            .unwrap();

        assert!(catalog.delete_station(&a.id.to_string()).await.is_err());
        catalog.delete_route(&route.id.to_string()).await.unwrap();
        catalog.delete_station(&a.id.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let err = catalog.delete_route("not-an-id").await.unwrap_err();
        match err {
            CatalogError::BadRequest(message) => assert_eq!(message, "Invalid ID format"),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let id = DocumentId::new().to_string();

        assert!(matches!(
            catalog.delete_route(&id).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.update_route(&id, route_draft("A", "B", 5.0, &[])).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.update_station(&id, station_draft("A")).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_route_revalidates() {
        let store = DocumentStore::in_memory();
        let catalog = Catalog::new(&store, &store);
        let route = catalog
            .add_route(route_draft("A", "B", 10.0, &[]))
            .await
            .unwrap();

        let err = catalog
            .update_route(&route.id.to_string(), route_draft("A", "B", 20.0, &["A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::BadRequest(_)));

        let updated = catalog
            .update_route(&route.id.to_string(), route_draft("A", "B", 20.0, &[]))
            .await
            .unwrap();
        assert_eq!(updated.price, 20.0);
    }
}
