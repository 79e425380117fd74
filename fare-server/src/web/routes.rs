//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path as UrlPath, Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::contribution::{ContributionError, ContributionFormBuilder};
use crate::domain::{Journey, Location, RouteDraft, StationDraft};
use crate::graph::OnDemandGraph;
use crate::resolver::{FareLookup, FareQuote, JourneyResolver, ResolveError};
use crate::store::{RouteStore, StationStore, StoreError};

use super::dto::*;
use super::map::enrich;
use super::state::AppState;
use super::templates::*;

/// Contribution uploads may carry several photos.
const CONTRIBUTION_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Create the application router.
///
/// `static_dir` is served under `/static`; `allowed_origin` is the one
/// browser origin allowed to make credentialed cross-origin calls.
pub fn create_router(
    state: AppState,
    static_dir: impl AsRef<Path>,
    allowed_origin: &str,
) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/stations", get(list_stations).post(add_station))
        .route(
            "/stations/:id",
            get(get_station).put(update_station).delete(delete_station),
        )
        .route("/routes", get(list_routes).post(add_route))
        .route("/routes/:id", put(update_route).delete(delete_route))
        .route("/route", get(fare_quote))
        .route("/journey", get(journey))
        .route("/route-map", get(route_map))
        .route("/nearest-station", get(nearest_station))
        .route("/places", get(places))
        .route(
            "/contributions",
            post(submit_contribution).layer(DefaultBodyLimit::max(CONTRIBUTION_BODY_LIMIT)),
        )
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(cors(allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(allowed_origin: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            warn!(origin = allowed_origin, error = %e, "invalid CORS origin, allowing none");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Parse a JSON body, logging it on failure.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(body), "unparseable JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: "connected",
    })
}

/// Map page.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let stations = state.store.all_stations().await?;
    let template = IndexTemplate {
        places: stations.iter().map(PlaceView::from_station).collect(),
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

// ============================================================================
// Stations
// ============================================================================

async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<StationsResponse>, AppError> {
    let stations = state.store.all_stations().await?;
    Ok(Json(StationsResponse { stations }))
}

async fn get_station(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Response, AppError> {
    let catalog = Catalog::new(&*state.store, &*state.store);
    let station = catalog.station(&id).await?;
    Ok(Json(station).into_response())
}

async fn add_station(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let draft: StationDraft = parse_json(&body)?;
    let catalog = Catalog::new(&*state.store, &*state.store);
    let station = catalog.add_station(draft).await?;
    Ok((StatusCode::CREATED, Json(station)).into_response())
}

async fn update_station(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let draft: StationDraft = parse_json(&body)?;
    let catalog = Catalog::new(&*state.store, &*state.store);
    catalog.update_station(&id, draft).await?;
    Ok(Json(MessageResponse {
        message: "Station updated successfully",
    }))
}

async fn delete_station(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let catalog = Catalog::new(&*state.store, &*state.store);
    catalog.delete_station(&id).await?;
    Ok(Json(MessageResponse {
        message: "Station deleted successfully",
    }))
}

async fn nearest_station(
    State(state): State<AppState>,
    Query(req): Query<NearestStationQuery>,
) -> Result<Json<NearestStationResponse>, AppError> {
    let location = coordinates(req.lat.as_deref(), req.lng.as_deref()).ok_or_else(|| {
        AppError::BadRequest {
            message: "Invalid coordinates".into(),
        }
    })?;

    let (station, distance_meters) = state
        .store
        .nearest_station(location.latitude(), location.longitude())
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: "No stations found".into(),
        })?;

    Ok(Json(NearestStationResponse {
        station,
        distance_meters,
    }))
}

async fn places(State(state): State<AppState>) -> Result<Json<PlacesResponse>, AppError> {
    let stations = state.store.all_stations().await?;
    debug!(count = stations.len(), "listing places");
    Ok(Json(PlacesResponse::from_stations(stations)))
}

/// A valid point from optional latitude and longitude text.
fn coordinates(lat: Option<&str>, lng: Option<&str>) -> Option<Location> {
    let lat: f64 = lat?.trim().parse().ok()?;
    let lng: f64 = lng?.trim().parse().ok()?;
    let valid = lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng);
    valid.then(|| Location::point(lng, lat))
}

// ============================================================================
// Routes
// ============================================================================

async fn list_routes(State(state): State<AppState>) -> Result<Json<RoutesResponse>, AppError> {
    let routes = state.store.all_routes().await?;
    Ok(Json(RoutesResponse { routes }))
}

async fn add_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let draft: RouteDraft = parse_json(&body)?;
    let catalog = Catalog::new(&*state.store, &*state.store);
    let route = catalog.add_route(draft).await?;
    Ok((StatusCode::CREATED, Json(route)).into_response())
}

async fn update_route(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let draft: RouteDraft = parse_json(&body)?;
    let catalog = Catalog::new(&*state.store, &*state.store);
    catalog.update_route(&id, draft).await?;
    Ok(Json(MessageResponse {
        message: "Route updated successfully",
    }))
}

async fn delete_route(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let catalog = Catalog::new(&*state.store, &*state.store);
    catalog.delete_route(&id).await?;
    Ok(Json(MessageResponse {
        message: "Route deleted successfully",
    }))
}

// ============================================================================
// Fares and journeys
// ============================================================================

/// Fare between two places, with the evening surcharge when it applies.
async fn fare_quote(
    State(state): State<AppState>,
    Query(req): Query<FromToQuery>,
) -> Result<Json<FareQuote>, AppError> {
    let graph = OnDemandGraph::new(&*state.store);
    let lookup = FareLookup::new(&*state.store, &graph, state.night_policy);
    let quote = lookup
        .resolve_with_night_policy(&req.from, &req.to, state.local_time())
        .await?;
    Ok(Json(quote))
}

async fn journey(
    State(state): State<AppState>,
    Query(req): Query<FromToQuery>,
) -> Result<Json<Journey>, AppError> {
    let resolver = JourneyResolver::new(&*state.store, &*state.store);
    let journey = resolver.resolve(&req.from, &req.to).await?;
    Ok(Json(journey))
}

/// Journey plus driving directions for drawing it.
async fn route_map(
    State(state): State<AppState>,
    Query(req): Query<RouteMapQuery>,
) -> Result<Json<RouteMapResponse>, AppError> {
    let resolver = JourneyResolver::new(&*state.store, &*state.store);
    let journey = resolver.resolve(&req.from, &req.to).await?;

    let rider = coordinates(req.user_lat.as_deref(), req.user_lng.as_deref());
    let enrichment = enrich(&*state.directions, &journey.stations, rider).await;

    Ok(Json(RouteMapResponse {
        route: journey.stations,
        path: enrichment.path,
        total_price: journey.total_price,
        distance: enrichment.distance,
        duration: enrichment.duration,
        legs: journey.legs,
    }))
}

// ============================================================================
// Contributions
// ============================================================================

async fn submit_contribution(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let mut builder = ContributionFormBuilder::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ContributionError::Form(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ContributionError::Form(e.to_string()))?;
                builder.file(&name, file_name, content_type, bytes.to_vec());
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ContributionError::Form(e.to_string()))?;
                builder.text(&name, value);
            }
        }
    }

    let form = builder.finish()?;
    state.contributions.submit(&form).await?;
    Ok(Json(MessageResponse {
        message: "Contribution received successfully",
    }))
}

// ============================================================================
// Errors
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    /// A dependency timed out; the client may retry
    Unavailable { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let message = e.to_string();
        match e {
            StoreError::Conflict(_) => AppError::Conflict { message },
            e if e.is_retryable() => AppError::Unavailable { message },
            _ => AppError::Internal { message },
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::BadRequest(message) => AppError::BadRequest { message },
            ResolveError::NotFound(message) => AppError::NotFound { message },
            ResolveError::Store(e) => e.into(),
            e @ (ResolveError::Lookup(_) | ResolveError::InvalidState(_)) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::BadRequest(message) => AppError::BadRequest { message },
            CatalogError::NotFound(message) => AppError::NotFound { message },
            CatalogError::Conflict(message) => AppError::Conflict { message },
            CatalogError::Store(e) => e.into(),
        }
    }
}

impl From<ContributionError> for AppError {
    fn from(e: ContributionError) -> Self {
        let message = e.to_string();
        if e.is_client_error() {
            AppError::BadRequest { message }
        } else {
            AppError::Internal { message }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
