use crate::app_config::Routing;
use crate::domain::{Coordinate, CoordinateError, RouteResult};
use crate::routing::RoutingService;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Road routing through an OSRM compatible server.
#[derive(Debug)]
pub struct OsrmRouter {
    client: Client,
    url: String,
    profile: String,
    timeout: Duration,
}

impl OsrmRouter {
    pub fn new(client: Client, config: &Routing) -> Self {
        OsrmRouter {
            client,
            url: config.url().trim_end_matches('/').to_string(),
            profile: config.profile().to_string(),
            timeout: config.request_timeout(),
        }
    }

    fn route_url(&self, from: &Coordinate, to: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.url,
            self.profile,
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude()
        )
    }

    async fn fetch_route(&self, from: &Coordinate, to: &Coordinate) -> Result<Vec<Coordinate>, RouteError> {
        let response = self
            .client
            .get(self.route_url(from, to))
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::Status(status));
        }

        let body = response.json::<OsrmResponse>().await?;
        let route = body.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
        if route.geometry.coordinates.is_empty() {
            return Err(RouteError::NoRoute);
        }

        route
            .geometry
            .coordinates
            .into_iter()
            .map(|[longitude, latitude]| Coordinate::new(latitude, longitude).map_err(RouteError::InvalidGeometry))
            .collect()
    }
}

#[async_trait]
impl RoutingService for OsrmRouter {
    #[instrument(skip(self))]
    async fn resolve_route(&self, from: Coordinate, to: Coordinate) -> RouteResult {
        info!("🛣️ Resolving route...");
        match self.fetch_route(&from, &to).await {
            Ok(path) => {
                info!("🛣️ Resolving route... OK, {} points", path.len());
                RouteResult::routed(path)
            }
            Err(e) => {
                warn!("⚠️ Resolving route... failed, {}. Using a straight line", e);
                RouteResult::fallback(from, to)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// `[longitude, latitude]` pairs.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("routing service responded with {0}")]
    Status(StatusCode),
    #[error("no route found")]
    NoRoute,
    #[error("route geometry contains an {0}")]
    InvalidGeometry(CoordinateError),
}
