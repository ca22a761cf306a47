use crate::normalize::LatLon;

/// Reference location used for the city overlay and distance filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub population: Option<u64>,
}

impl City {
    #[cfg(test)]
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            population: None,
        }
    }

    #[cfg(test)]
    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn position(&self) -> Option<LatLon> {
        LatLon::from_parts(self.latitude, self.longitude)
    }
}
