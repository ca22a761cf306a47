pub mod city;
pub mod filter;
pub mod listing;

pub use city::City;
pub use filter::{nearest_city_options, type_options, Bounds, Extents, FilterOutcome, SiteFilter, SiteView};
pub use listing::{Listing, Site, SiteRow, LISTING_COLUMNS};
