//! Great-circle distance between two coordinates, served over HTTP.

pub mod distance;
pub mod error;
pub mod logging;
pub mod server;
pub mod units;

pub use distance::{compute, compute_default, haversine_km, DistanceResult, GeographicLocation, EARTH_RADIUS_KM};
pub use units::{UnknownUnit, Unit};
