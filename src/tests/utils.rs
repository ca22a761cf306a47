use crate::config::{Config, PathsConfig, ScrapeConfig, ServerConfig};
use crate::domain::Listing;
use crate::scraper::{Fetcher, Page, ScraperError};
use crate::store::write_listings;
use astra::Response;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Scrape settings pointing at a fake host, with no politeness delay.
pub fn test_scrape_config() -> ScrapeConfig {
    ScrapeConfig {
        base_url: "https://woods.test".to_string(),
        search_template: "https://woods.test/search?page={page}".to_string(),
        request_delay: Duration::ZERO,
        bulk_delay: Duration::ZERO,
        ..ScrapeConfig::default()
    }
}

/// Full configuration with every file under `dir`.
pub fn test_config(dir: &Path) -> Config {
    Config {
        scrape: test_scrape_config(),
        paths: PathsConfig::in_dir(dir),
        server: ServerConfig::default(),
    }
}

/// In-memory [`Fetcher`]. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Page>,
    downloads: HashMap<String, Vec<u8>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, body: impl Into<String>) -> Self {
        self.status(url, 200, body)
    }

    pub fn status(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.pages.insert(
            url.to_string(),
            Page {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub fn bytes(mut self, url: &str, data: &[u8]) -> Self {
        self.downloads.insert(url.to_string(), data.to_vec());
        self
    }

    /// How many times `url` was requested.
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn record(&self, url: &str) {
        *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
    }
}

impl Fetcher for FakeFetcher {
    fn get_page(&self, url: &str) -> Result<Page, ScraperError> {
        self.record(url);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::Network(format!("no route to {url}")))
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        self.record(url);
        self.downloads
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::Network(format!("no route to {url}")))
    }
}

pub fn listing(name: &str, kind: &str, price: &str, size: &str, pos: Option<(f64, f64)>) -> Listing {
    Listing {
        name: name.to_string(),
        price: price.to_string(),
        listing_type: kind.to_string(),
        size: size.to_string(),
        latitude: pos.map(|p| p.0),
        longitude: pos.map(|p| p.1),
        gps_text: pos
            .map(|p| format!("GPS coordinates: {}, {}", p.0, p.1))
            .unwrap_or_default(),
        url: format!(
            "https://woods.test/buy/{}",
            name.to_lowercase().replace(' ', "-")
        ),
    }
}

/// Two placed woodlands (near Oxford and near Bristol), one unplaced, and a
/// cities file for both cities.
pub fn seed_data_dir(dir: &Path) {
    let listings = [
        listing("Oak Wood", "Freehold", "£40,000", "3 acres", Some((51.76, -1.26))),
        listing("Ash Copse", "Leasehold", "£90,000", "about 10 ½ acres", Some((51.46, -2.6))),
        listing("Lost Wood", "Freehold", "£10,000", "1 acre", None),
    ];
    write_listings(&dir.join("woodlands_sites.csv"), &listings).unwrap();

    std::fs::write(
        dir.join("gb.csv"),
        "city,lat,lng,population\n\
         Oxford,51.752,-1.2577,152450\n\
         Bristol,51.4545,-2.5879,467099\n",
    )
    .unwrap();
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut out = Vec::new();
    resp.into_body().reader().read_to_end(&mut out).unwrap();
    out
}

pub fn body_string(resp: Response) -> String {
    String::from_utf8(body_bytes(resp)).unwrap()
}

pub fn header<'a>(resp: &'a Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
