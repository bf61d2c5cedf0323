//! Sales Assistant Geo
//!
//! Map-side collaborators of the query router:
//! - `flexpolyline` - the flexible polyline decoding algorithm
//! - `polyline` - decoding of every route representation into coordinates
//! - `geocoder` - geocoding with "not found" as a value, not an error
//! - `routing` - the two-stage (primary, then secondary) route resolver
//! - `here` - HTTP clients for the geocoding and routing services

pub mod error;
pub mod flexpolyline;
pub mod geocoder;
pub mod here;
pub mod polyline;
pub mod routing;

pub use error::{GeoError, GeoResult};
pub use geocoder::{GeocodeOutcome, GeocoderAdapter, GeocodingService};
pub use here::{HereClient, HereConfig};
pub use polyline::{decode, EncodedRoute, RouteDocument, ShapeDocument};
pub use routing::{PrimaryRouting, RouteResolution, RouteResolver, RouteStage, SecondaryRouting};
