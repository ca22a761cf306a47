// domain/filter.rs
//
// Dashboard filtering. Missing numbers never exclude a woodland from a range
// filter; only missing coordinates do, because it cannot be placed on the map.

use crate::domain::city::City;
use crate::domain::listing::Site;
use crate::normalize::nearest;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Absent values are admitted.
    pub fn admits(&self, value: Option<f64>) -> bool {
        match value {
            None => true,
            Some(v) => self.min.map_or(true, |m| v >= m) && self.max.map_or(true, |m| v <= m),
        }
    }

    /// Smallest and largest of the present values.
    pub fn extent<I>(values: I) -> Option<(f64, f64)>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values.into_iter().flatten().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteFilter {
    /// Empty means every type.
    pub types: Vec<String>,
    pub price: Bounds,
    pub acres: Bounds,
    pub square_metres: Bounds,
    pub side_metres: Bounds,
    /// Empty means every nearest city.
    pub nearest_cities: Vec<String>,
    pub population: Bounds,
    /// Some when the distance filter is switched on.
    pub max_miles: Option<f64>,
    pub show_cities: bool,
}

impl Default for SiteFilter {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            price: Bounds::default(),
            acres: Bounds::default(),
            square_metres: Bounds::default(),
            side_metres: Bounds::default(),
            nearest_cities: Vec::new(),
            population: Bounds::default(),
            max_miles: None,
            show_cities: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteView {
    pub site: Site,
    pub min_city_miles: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub sites: Vec<SiteView>,
    pub cities: Vec<City>,
    pub notice: Option<String>,
}

impl SiteFilter {
    /// Cities shown on the map and used for distances.
    pub fn filter_cities(&self, cities: &[City]) -> Vec<City> {
        if !self.show_cities {
            return Vec::new();
        }
        cities
            .iter()
            .filter(|c| c.position().is_some())
            .filter(|c| self.population.admits(c.population.map(|p| p as f64)))
            .cloned()
            .collect()
    }

    fn admits(&self, site: &Site) -> bool {
        let m = &site.measures;
        (self.types.is_empty()
            || self
                .types
                .iter()
                .any(|t| t.trim() == site.listing.listing_type.trim()))
            && self.price.admits(site.price_value.map(|p| p as f64))
            && self.acres.admits(m.acres)
            && self.square_metres.admits(m.square_metres)
            && self.side_metres.admits(m.side_metres)
            && (self.nearest_cities.is_empty()
                || site
                    .nearest_city
                    .as_ref()
                    .is_some_and(|c| self.nearest_cities.contains(c)))
            && site.position().is_some()
    }

    pub fn apply(&self, sites: &[Site], cities: &[City]) -> FilterOutcome {
        let cities = self.filter_cities(cities);

        let mut views: Vec<SiteView> = sites
            .iter()
            .filter(|s| self.admits(s))
            .map(|s| SiteView {
                min_city_miles: s
                    .position()
                    .and_then(|p| nearest(p, &cities, City::position))
                    .map(|n| n.miles),
                site: s.clone(),
            })
            .collect();

        let mut notice = None;
        if let Some(limit) = self.max_miles {
            if cities.is_empty() {
                notice = Some(
                    "No (filtered) cities available; the distance filter is disabled.".to_string(),
                );
            } else {
                let before = views.len();
                views.retain(|v| v.min_city_miles.is_some_and(|d| d <= limit));
                notice = Some(format!(
                    "Filtered by distance: kept {} of {} woodlands (≤ {} miles).",
                    views.len(),
                    before,
                    limit.round() as i64
                ));
            }
        }

        FilterOutcome {
            sites: views,
            cities,
            notice,
        }
    }
}

/// Distinct non-empty listing types, sorted.
pub fn type_options(sites: &[Site]) -> Vec<String> {
    sites
        .iter()
        .map(|s| s.listing.listing_type.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct nearest-city names, sorted.
pub fn nearest_city_options(sites: &[Site]) -> Vec<String> {
    sites
        .iter()
        .filter_map(|s| s.nearest_city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Value ranges across the unfiltered data, shown as hints on the filter
/// inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extents {
    pub price: Option<(f64, f64)>,
    pub acres: Option<(f64, f64)>,
    pub square_metres: Option<(f64, f64)>,
    pub side_metres: Option<(f64, f64)>,
    pub population: Option<(f64, f64)>,
}

impl Extents {
    pub fn of(sites: &[Site], cities: &[City]) -> Self {
        Self {
            price: Bounds::extent(sites.iter().map(|s| s.price_value.map(|p| p as f64))),
            acres: Bounds::extent(sites.iter().map(|s| s.measures.acres)),
            square_metres: Bounds::extent(sites.iter().map(|s| s.measures.square_metres)),
            side_metres: Bounds::extent(sites.iter().map(|s| s.measures.side_metres)),
            population: Bounds::extent(cities.iter().map(|c| c.population.map(|p| p as f64))),
        }
    }
}
