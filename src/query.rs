use crate::domain::{Bounds, SiteFilter};
use crate::errors::ServerError;
use url::form_urlencoded;

/// Decoded query string, in order, repeats kept.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim())
    }

    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn number(&self, key: &str) -> Result<Option<f64>, ServerError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| ServerError::BadRequest(format!("invalid number for {key}: {raw:?}"))),
        }
    }

    fn bounds(&self, prefix: &str) -> Result<Bounds, ServerError> {
        Ok(Bounds::new(
            self.number(&format!("{prefix}_min"))?,
            self.number(&format!("{prefix}_max"))?,
        ))
    }

    /// Dashboard filters. `near` switches on the distance filter with
    /// `max_miles` or `default_max_miles`.
    pub fn site_filter(&self, default_max_miles: f64) -> Result<SiteFilter, ServerError> {
        let max_miles = if self.has("near") {
            Some(self.number("max_miles")?.unwrap_or(default_max_miles))
        } else {
            None
        };

        Ok(SiteFilter {
            types: self.all("type"),
            price: self.bounds("price")?,
            acres: self.bounds("acres")?,
            square_metres: self.bounds("m2")?,
            side_metres: self.bounds("side")?,
            nearest_cities: self.all("city"),
            population: self.bounds("pop")?,
            max_miles,
            show_cities: !self.has("hide_cities"),
        })
    }

    /// The pairs other than `skip`, for carrying filters into another form.
    pub fn without(&self, skip: &str) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter(|(k, _)| k != skip)
            .cloned()
            .collect()
    }
}
