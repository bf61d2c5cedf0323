//! Route Resolver
//!
//! Two-stage route lookup. The primary service returns a compact encoded
//! route; when the call fails or its answer does not decode to a usable
//! route, the secondary service is asked once for a raw shape list. A
//! secondary failure is final.

use std::sync::Arc;

use async_trait::async_trait;
use sales_assistant_core::Coordinate;

use crate::error::{GeoError, GeoResult};
use crate::polyline::{decode, EncodedRoute, RouteDocument, ShapeDocument};

/// Routing service answering with encoded polylines.
#[async_trait]
pub trait PrimaryRouting: Send + Sync {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> GeoResult<RouteDocument>;
}

/// Routing service answering with `"lat,lon"` shape lists.
#[async_trait]
pub trait SecondaryRouting: Send + Sync {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> GeoResult<ShapeDocument>;
}

/// Which stage produced a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStage {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResolution {
    pub stage: RouteStage,
    pub coordinates: Vec<Coordinate>,
}

pub struct RouteResolver {
    primary: Arc<dyn PrimaryRouting>,
    secondary: Arc<dyn SecondaryRouting>,
}

impl RouteResolver {
    pub fn new(primary: Arc<dyn PrimaryRouting>, secondary: Arc<dyn SecondaryRouting>) -> Self {
        Self { primary, secondary }
    }

    /// Resolve a route from `origin` to `destination`.
    pub async fn resolve_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> GeoResult<Vec<Coordinate>> {
        self.resolve(origin, destination)
            .await
            .map(|r| r.coordinates)
    }

    /// Like [`resolve_route`](Self::resolve_route), also reporting which stage answered.
    pub async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> GeoResult<RouteResolution> {
        match self.try_primary(origin, destination).await {
            Ok(coordinates) => {
                tracing::info!(points = coordinates.len(), "route resolved by primary service");
                return Ok(RouteResolution {
                    stage: RouteStage::Primary,
                    coordinates,
                });
            }
            Err(e) => tracing::warn!("primary routing failed, falling back: {}", e),
        }

        let doc = self.secondary.route(origin, destination).await?;
        let coordinates = decode(&EncodedRoute::RawShapeList(doc.shape_points()))?;
        tracing::info!(points = coordinates.len(), "route resolved by secondary service");
        Ok(RouteResolution {
            stage: RouteStage::Secondary,
            coordinates,
        })
    }

    /// An answer with no routes, or routes that decode to no points, counts
    /// as a failure of the primary stage.
    async fn try_primary(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> GeoResult<Vec<Coordinate>> {
        let doc = self.primary.route(origin, destination).await?;
        if doc.routes.is_empty() {
            return Err(GeoError::NoRoute("primary answer contains no routes".to_string()));
        }
        let coordinates = decode(&EncodedRoute::Structured(doc))?;
        if coordinates.is_empty() {
            return Err(GeoError::NoRoute("primary routes carry no polyline".to_string()));
        }
        Ok(coordinates)
    }
}
