//! Geocoder Adapter
//!
//! Wraps the geocoding service so that "no results" is a value and
//! transport failures become notices instead of errors.

use std::sync::Arc;

use async_trait::async_trait;
use sales_assistant_core::notice::{Notice, NoticeSink};
use sales_assistant_core::Coordinate;
use serde::{Deserialize, Serialize};

use crate::error::GeoResult;

/// Geocoding answer: `{"items": [{"position": {"lat": .., "lng": ..}}]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub items: Option<Vec<GeocodeItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodeItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// The geocoding collaborator.
#[async_trait]
pub trait GeocodingService: Send + Sync {
    async fn geocode(&self, address: &str) -> GeoResult<GeocodeResponse>;
}

/// Result of geocoding one address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    Found(Coordinate),
    NotFound,
}

impl GeocodeOutcome {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            GeocodeOutcome::Found(c) => Some(*c),
            GeocodeOutcome::NotFound => None,
        }
    }
}

pub struct GeocoderAdapter {
    service: Arc<dyn GeocodingService>,
    notices: Arc<dyn NoticeSink>,
}

impl GeocoderAdapter {
    pub fn new(service: Arc<dyn GeocodingService>, notices: Arc<dyn NoticeSink>) -> Self {
        Self { service, notices }
    }

    /// Geocode `address`, taking the first candidate.
    ///
    /// An empty or absent item list is `NotFound`. A failed call is reported
    /// through the notice channel and also yields `NotFound`.
    pub async fn geocode(&self, address: &str) -> GeocodeOutcome {
        let response = match self.service.geocode(address).await {
            Ok(r) => r,
            Err(e) => {
                self.notices
                    .notify(Notice::transport("geocoding", e.to_string()));
                return GeocodeOutcome::NotFound;
            }
        };

        let Some(first) = response.items.as_deref().and_then(|items| items.first()) else {
            tracing::debug!(address, "geocoder returned no items");
            return GeocodeOutcome::NotFound;
        };

        let Some(position) = first.position else {
            self.notices.notify(Notice::transport(
                "geocoding",
                format!("first result for '{}' has no position", address),
            ));
            return GeocodeOutcome::NotFound;
        };

        match Coordinate::new(position.lat, position.lng) {
            Ok(c) => {
                tracing::debug!(address, lat = c.lat(), lon = c.lon(), "geocoded");
                GeocodeOutcome::Found(c)
            }
            Err(e) => {
                self.notices
                    .notify(Notice::transport("geocoding", e.to_string()));
                GeocodeOutcome::NotFound
            }
        }
    }
}
