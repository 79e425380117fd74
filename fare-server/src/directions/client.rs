//! OSRM HTTP client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::Location;

use super::DirectionsService;
use super::error::DirectionsError;
use super::types::{DrivingRoute, OsrmRouteResponse};

/// Public OSRM demo server.
const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Set a custom base URL (for testing or a self-hosted server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OSRM route service client.
///
/// A semaphore caps concurrent requests so one map request fanning out over
/// many hops does not flood a shared server.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn route_url(&self, from: &Location, to: &Location) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url,
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude()
        )
    }

    /// Plan a driving route, returning the service's best candidate.
    pub async fn get_route(
        &self,
        from: &Location,
        to: &Location,
    ) -> Result<DrivingRoute, DirectionsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DirectionsError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.route_url(from, to);
        debug!(%url, "requesting driving route");

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // OSRM reports "no route" and bad queries as 400 with a JSON code.
        let parsed: Result<OsrmRouteResponse, _> = serde_json::from_str(&body);

        if !status.is_success() {
            let message = match parsed {
                Ok(r) => r.message.unwrap_or(r.code),
                Err(_) => body.chars().take(200).collect(),
            };
            return Err(DirectionsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.map_err(|e| DirectionsError::Json {
            message: e.to_string(),
        })?;

        if parsed.code != "Ok" {
            return Err(DirectionsError::NoRoute { code: parsed.code });
        }

        parsed
            .routes
            .into_iter()
            .next()
            .map(DrivingRoute::from)
            .ok_or(DirectionsError::NoRoute {
                code: "NoRoute".to_string(),
            })
    }
}

impl DirectionsService for OsrmClient {
    async fn driving_route(
        &self,
        from: &Location,
        to: &Location,
    ) -> Result<DrivingRoute, DirectionsError> {
        self.get_route(from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, extract::Path, http::StatusCode, routing::get};

    /// Serve a canned OSRM answer on an ephemeral port and return its base URL.
    async fn fake_osrm(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(
            "/route/v1/driving/:coords",
            get(move |Path(_coords): Path<String>| async move { (status, body) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> OsrmClient {
        OsrmClient::new(OsrmConfig::default().with_base_url(base_url).with_timeout(5)).unwrap()
    }

    fn bole() -> Location {
        Location::point(38.7578, 8.9806)
    }

    fn piassa() -> Location {
        Location::point(38.7525, 9.0349)
    }

    #[test]
    fn url_is_lng_lat_pairs() {
        let client = client("http://osrm.example/");
        assert_eq!(
            client.route_url(&bole(), &piassa()),
            "http://osrm.example/route/v1/driving/38.7578,8.9806;38.7525,9.0349"
        );
    }

    #[tokio::test]
    async fn returns_first_route() {
        let base = fake_osrm(
            StatusCode::OK,
            r#"{"code":"Ok","routes":[
                {"distance":6100.0,"duration":800.0,"geometry":{"type":"LineString","coordinates":[]}},
                {"distance":9000.0,"duration":1200.0,"geometry":null}
            ]}"#,
        )
        .await;

        let route = client(&base).get_route(&bole(), &piassa()).await.unwrap();
        assert_eq!(route.distance, 6100.0);
        assert_eq!(route.duration, 800.0);
        assert_eq!(route.geometry["type"], "LineString");
    }

    #[tokio::test]
    async fn non_ok_code_is_no_route() {
        let base = fake_osrm(StatusCode::OK, r#"{"code":"NoRoute","routes":[]}"#).await;
        let err = client(&base)
            .get_route(&bole(), &piassa())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectionsError::NoRoute { .. }));
    }

    #[tokio::test]
    async fn error_status_carries_message() {
        let base = fake_osrm(
            StatusCode::BAD_REQUEST,
            r#"{"code":"InvalidQuery","message":"Query string malformed"}"#,
        )
        .await;
        let err = client(&base)
            .get_route(&bole(), &piassa())
            .await
            .unwrap_err();
        match err {
            DirectionsError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Query string malformed");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_json_error() {
        let base = fake_osrm(StatusCode::OK, "<html>busy</html>").await;
        let err = client(&base)
            .get_route(&bole(), &piassa())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectionsError::Json { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        let err = client("http://127.0.0.1:9")
            .get_route(&bole(), &piassa())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectionsError::Http(_)));
    }
}
