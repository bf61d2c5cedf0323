//! HERE Map Service Clients
//!
//! One client implements all three map collaborators: geocoding (v1),
//! primary routing (v8, flexible polylines) and secondary routing
//! (v7 calculateroute, raw leg shapes).

use std::time::Duration;

use async_trait::async_trait;
use sales_assistant_core::Coordinate;
use serde::de::DeserializeOwned;

use crate::error::{GeoError, GeoResult};
use crate::geocoder::{GeocodeResponse, GeocodingService};
use crate::polyline::{RouteDocument, ShapeDocument};
use crate::routing::{PrimaryRouting, SecondaryRouting};

pub const GEOCODE_URL: &str = "https://geocode.search.hereapi.com/v1/geocode";
pub const ROUTING_V8_URL: &str = "https://router.hereapi.com/v8/routes";
pub const ROUTING_V7_URL: &str = "https://route.ls.hereapi.com/routing/7.2/calculateroute.json";

#[derive(Debug, Clone, PartialEq)]
pub struct HereConfig {
    pub api_key: Option<String>,
    pub geocode_url: String,
    pub primary_routing_url: String,
    pub secondary_routing_url: String,
    /// e.g. `car`, `truck`
    pub transport_mode: String,
    pub timeout: Duration,
}

impl Default for HereConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geocode_url: GEOCODE_URL.to_string(),
            primary_routing_url: ROUTING_V8_URL.to_string(),
            secondary_routing_url: ROUTING_V7_URL.to_string(),
            transport_mode: "car".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct HereClient {
    config: HereConfig,
    client: reqwest::Client,
}

impl HereClient {
    /// `client` should come from the shared factory, built with `config.timeout`.
    pub fn new(config: HereConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_key(&self) -> GeoResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| GeoError::Transport("HERE API key not configured".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> GeoResult<T> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(GeoError::Http { status, body });
        }
        serde_json::from_str(&body).map_err(|e| GeoError::parse(e.to_string()))
    }

    fn primary_params(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        key: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("transportMode", self.config.transport_mode.clone()),
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("return", "polyline".to_string()),
            ("apikey", key.to_string()),
        ]
    }

    fn secondary_params(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        key: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("waypoint0", format!("geo!{}", origin)),
            ("waypoint1", format!("geo!{}", destination)),
            ("mode", format!("fastest;{}", self.config.transport_mode)),
            ("legattributes", "shape".to_string()),
            ("apiKey", key.to_string()),
        ]
    }
}

#[async_trait]
impl GeocodingService for HereClient {
    async fn geocode(&self, address: &str) -> GeoResult<GeocodeResponse> {
        let params = [("q", address.to_string()), ("apiKey", self.api_key()?.to_string())];
        self.get_json(&self.config.geocode_url, &params).await
    }
}

#[async_trait]
impl PrimaryRouting for HereClient {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> GeoResult<RouteDocument> {
        let params = self.primary_params(origin, destination, self.api_key()?);
        tracing::debug!(%origin, %destination, "requesting primary route");
        self.get_json(&self.config.primary_routing_url, &params).await
    }
}

#[async_trait]
impl SecondaryRouting for HereClient {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> GeoResult<ShapeDocument> {
        let params = self.secondary_params(origin, destination, self.api_key()?);
        tracing::debug!(%origin, %destination, "requesting secondary route");
        self.get_json(&self.config.secondary_routing_url, &params).await
    }
}
