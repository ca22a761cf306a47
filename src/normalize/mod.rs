//! Free-text measurements to numbers: acreage, price, GPS coordinates, and
//! the distances between coordinates.

mod acres;
mod geo;
mod gps;
mod price;

pub use acres::SizeMeasures;
pub use geo::{nearest, LatLon};
pub use gps::extract_gps;
pub use price::parse_price;
