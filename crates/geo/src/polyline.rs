//! Route Decoding
//!
//! Turns every route representation the routing services return into an
//! ordered coordinate sequence. The caller states which representation it
//! holds through `EncodedRoute`; nothing here inspects shapes at runtime.

use sales_assistant_core::Coordinate;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};
use crate::flexpolyline::decode_flexible;

/// Primary routing answer: `{"routes": [{"sections": [{"polyline": "..."}]}]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteDocument {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Route {
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}

/// Secondary routing answer:
/// `{"response": {"route": [{"leg": [{"shape": ["lat,lon", ...]}]}]}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapeDocument {
    #[serde(default)]
    pub response: ShapeResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapeResponse {
    #[serde(default)]
    pub route: Vec<ShapeRoute>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapeRoute {
    #[serde(default)]
    pub leg: Vec<ShapeLeg>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapeLeg {
    #[serde(default)]
    pub shape: Vec<String>,
}

impl ShapeDocument {
    /// All `"lat,lon"` points, route-major then leg then point.
    pub fn shape_points(&self) -> Vec<String> {
        self.response
            .route
            .iter()
            .flat_map(|r| r.leg.iter())
            .flat_map(|l| l.shape.iter().cloned())
            .collect()
    }
}

/// A route representation, tagged by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedRoute {
    /// Routes/sections document whose sections carry flexible polylines
    Structured(RouteDocument),
    /// `"lat,lon"` strings
    RawShapeList(Vec<String>),
    /// A single flexible-polyline string
    Encoded(String),
}

/// Decode a route into coordinates, preserving traversal order.
///
/// Never sorts or deduplicates.
pub fn decode(input: &EncodedRoute) -> GeoResult<Vec<Coordinate>> {
    match input {
        EncodedRoute::Structured(doc) => decode_route_document(doc),
        EncodedRoute::RawShapeList(points) => decode_shape_list(points),
        EncodedRoute::Encoded(encoded) => decode_flexible(encoded),
    }
}

/// Sections without a polyline (or with an empty one) contribute no points.
pub fn decode_route_document(doc: &RouteDocument) -> GeoResult<Vec<Coordinate>> {
    let mut coords = Vec::new();
    for route in &doc.routes {
        for section in &route.sections {
            match section.polyline.as_deref() {
                Some(poly) if !poly.is_empty() => coords.extend(decode_flexible(poly)?),
                _ => {}
            }
        }
    }
    Ok(coords)
}

/// Every point must split into two parseable halves; one bad point fails
/// the whole list rather than leaving a gap in the route.
pub fn decode_shape_list(points: &[String]) -> GeoResult<Vec<Coordinate>> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            parse_shape_point(point)
                .map_err(|e| GeoError::decode(format!("shape point {}: {}", i, e)))
        })
        .collect()
}

fn parse_shape_point(point: &str) -> Result<Coordinate, String> {
    let (lat, lon) = point
        .split_once(',')
        .ok_or_else(|| format!("{:?} is not \"lat,lon\"", point))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude in {:?}", point))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude in {:?}", point))?;
    Coordinate::new(lat, lon).map_err(|e| e.to_string())
}
