//! Coordinate Value Type

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A WGS84 position.
///
/// Latitude is always within `[-90, 90]` and longitude within `[-180, 180]`;
/// the only way to build one is [`Coordinate::new`], which enforces both.
/// Decoders and geocoders are the producers; everything else passes them along.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range components.
    pub fn new(lat: f64, lon: f64) -> CoreResult<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(CoreError::CoordinateOutOfRange { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Formats as `lat,lon`, the form routing query strings expect.
impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: RawCoordinate) -> CoreResult<Self> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            lat: c.lat,
            lon: c.lon,
        }
    }
}
