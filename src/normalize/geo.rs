/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.7613;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        Some(Self::new(lat?, lon?))
    }
}

/// Great-circle distance in miles (haversine).
pub fn haversine_miles(a: LatLon, b: LatLon) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

#[derive(Debug, Clone, Copy)]
pub struct Nearest<'a, T> {
    pub item: &'a T,
    pub miles: f64,
}

/// The reference point closest to `point`. References without a position are
/// skipped; an empty set has no nearest point.
pub fn nearest<'a, T, F>(point: LatLon, refs: &'a [T], position: F) -> Option<Nearest<'a, T>>
where
    F: Fn(&T) -> Option<LatLon>,
{
    refs.iter()
        .filter_map(|item| {
            position(item).map(|p| Nearest {
                item,
                miles: haversine_miles(point, p),
            })
        })
        .min_by(|a, b| a.miles.total_cmp(&b.miles))
}
