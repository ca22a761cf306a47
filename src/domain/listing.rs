use crate::domain::city::City;
use crate::normalize::{nearest, parse_price, LatLon, SizeMeasures};
use serde::{Deserialize, Serialize};

/// Column order of the scraped listings file.
pub const LISTING_COLUMNS: [&str; 8] = [
    "Name",
    "Price",
    "Type",
    "Size",
    "Latitude",
    "Longitude",
    "GPS_Text",
    "URL",
];

/// One woodland as scraped from its detail page. The URL identifies it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Type")]
    pub listing_type: String,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "GPS_Text")]
    pub gps_text: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl Listing {
    pub fn position(&self) -> Option<LatLon> {
        LatLon::from_parts(self.latitude, self.longitude)
    }
}

/// A row of the sites file as read back. Derived columns are optional, and
/// any numeric cell that does not parse is treated as empty.
#[derive(Debug, Deserialize)]
pub struct SiteRow {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Price", default)]
    price: String,
    #[serde(rename = "Type", default)]
    listing_type: String,
    #[serde(rename = "Size", default)]
    size: String,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(rename = "GPS_Text", default)]
    gps_text: String,
    #[serde(rename = "URL", default)]
    url: String,
    #[serde(rename = "SizeAcres", default, deserialize_with = "csv::invalid_option")]
    size_acres: Option<f64>,
    #[serde(rename = "Size_m2", default, deserialize_with = "csv::invalid_option")]
    size_m2: Option<f64>,
    #[serde(rename = "Size_m2_sqrt", default, deserialize_with = "csv::invalid_option")]
    size_m2_sqrt: Option<f64>,
    #[serde(rename = "NearestCity", default)]
    nearest_city: Option<String>,
}

/// A listing together with the numbers derived from its text fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub listing: Listing,
    pub price_value: Option<u64>,
    pub measures: SizeMeasures,
    pub nearest_city: Option<String>,
}

impl Site {
    pub fn from_listing(listing: Listing) -> Self {
        Self {
            price_value: parse_price(&listing.price),
            measures: SizeMeasures::from_size_text(&listing.size),
            nearest_city: None,
            listing,
        }
    }

    pub fn position(&self) -> Option<LatLon> {
        self.listing.position()
    }

    /// Sets `nearest_city` from `cities` unless the file already named one.
    pub fn fill_nearest_city(&mut self, cities: &[City]) {
        if self.nearest_city.is_some() {
            return;
        }
        if let Some(pos) = self.position() {
            self.nearest_city = nearest(pos, cities, City::position).map(|n| n.item.name.clone());
        }
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

impl From<SiteRow> for Site {
    fn from(row: SiteRow) -> Self {
        let listing = Listing {
            name: row.name,
            price: row.price,
            listing_type: row.listing_type,
            size: row.size,
            latitude: finite(row.latitude),
            longitude: finite(row.longitude),
            gps_text: row.gps_text,
            url: row.url,
        };

        let measures = match finite(row.size_acres) {
            Some(acres) => {
                let derived = SizeMeasures::from_acres(Some(acres));
                SizeMeasures {
                    acres: Some(acres),
                    square_metres: finite(row.size_m2).or(derived.square_metres),
                    side_metres: finite(row.size_m2_sqrt).or(derived.side_metres),
                }
            }
            None => SizeMeasures::from_size_text(&listing.size),
        };

        Site {
            price_value: parse_price(&listing.price),
            measures,
            nearest_city: row
                .nearest_city
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            listing,
        }
    }
}
