use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref COORD_PAIR_RE: Regex = Regex::new(r"(-?[0-9]+\.[0-9]+)\s*,\s*(-?[0-9]+\.[0-9]+)").unwrap();
}

const GPS_PREFIX: &str = "gps coordinates";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsReading {
    /// The "GPS coordinates: ..." fragment, empty when the page had none.
    pub text: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Looks for a fragment starting with "GPS coordinates" and reads the first
/// `lat, lon` pair out of it. Without such a fragment the whole page text is
/// searched instead. No pair means no coordinates; nothing is guessed.
pub fn extract_gps<'a, I>(fragments: I, page_text: &str) -> GpsReading
where
    I: IntoIterator<Item = &'a str>,
{
    let text = fragments
        .into_iter()
        .map(str::trim)
        .find(|t| t.to_lowercase().starts_with(GPS_PREFIX))
        .unwrap_or_default()
        .to_string();

    let search_space = if text.is_empty() { page_text } else { &text };

    let (latitude, longitude) = match COORD_PAIR_RE.captures(search_space) {
        Some(caps) => match (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            (Ok(lat), Ok(lon)) => (Some(lat), Some(lon)),
            _ => (None, None),
        },
        None => (None, None),
    };

    GpsReading {
        text,
        latitude,
        longitude,
    }
}
