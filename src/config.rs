use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub paths: PathsConfig,
    pub server: ServerConfig,
}

/// Everything the crawler needs to talk to the listings site.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    /// Search results URL with a `{page}` placeholder.
    pub search_template: String,
    pub user_agent: String,
    pub accept_language: String,
    pub request_delay: Duration,
    pub bulk_delay: Duration,
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub sites_csv: PathBuf,
    pub cities_csv: PathBuf,
    pub pdf_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub map_center: (f64, f64),
    pub map_zoom: u8,
    pub default_max_miles: f64,
}

impl ScrapeConfig {
    pub fn search_url(&self, page: u32) -> String {
        self.search_template.replace("{page}", &page.to_string())
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.woodlands.co.uk".to_string(),
            search_template:
                "https://www.woodlands.co.uk/buying-a-wood/search?location=HP11SW&page={page}"
                    .to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-GB,en;q=0.9".to_string(),
            request_delay: Duration::from_secs(1),
            bulk_delay: Duration::from_millis(200),
            max_pages: None,
        }
    }
}

impl PathsConfig {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            sites_csv: dir.join("woodlands_sites.csv"),
            cities_csv: dir.join("gb.csv"),
            pdf_dir: dir.join("PDFs"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            map_center: (54.5, -3.0),
            map_zoom: 5,
            default_max_miles: 50.0,
        }
    }
}

impl Config {
    /// Reads `WOODLANDS_*` variables, falling back to defaults for anything
    /// unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ScrapeConfig::default();

        let scrape = ScrapeConfig {
            base_url: env::var("WOODLANDS_BASE_URL").unwrap_or(defaults.base_url),
            search_template: env::var("WOODLANDS_SEARCH_TEMPLATE")
                .unwrap_or(defaults.search_template),
            user_agent: env::var("WOODLANDS_USER_AGENT").unwrap_or(defaults.user_agent),
            accept_language: env::var("WOODLANDS_ACCEPT_LANGUAGE")
                .unwrap_or(defaults.accept_language),
            request_delay: parse_millis("WOODLANDS_REQUEST_DELAY_MS")?
                .unwrap_or(defaults.request_delay),
            bulk_delay: parse_millis("WOODLANDS_BULK_DELAY_MS")?.unwrap_or(defaults.bulk_delay),
            max_pages: parse_var::<u32>("WOODLANDS_MAX_PAGES")?,
        };

        let data_dir = env::var("WOODLANDS_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let mut paths = PathsConfig::in_dir(data_dir);
        if let Ok(p) = env::var("WOODLANDS_SITES_CSV") {
            paths.sites_csv = p.into();
        }
        if let Ok(p) = env::var("WOODLANDS_CITIES_CSV") {
            paths.cities_csv = p.into();
        }
        if let Ok(p) = env::var("WOODLANDS_PDF_DIR") {
            paths.pdf_dir = p.into();
        }

        let mut server = ServerConfig::default();
        if let Ok(addr) = env::var("WOODLANDS_BIND_ADDR") {
            server.bind_addr = addr;
        }

        Ok(Self {
            scrape,
            paths,
            server,
        })
    }
}

fn parse_var<T>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

fn parse_millis(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    Ok(parse_var::<u64>(var)?.map(Duration::from_millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_fills_page() {
        let cfg = ScrapeConfig::default();
        assert_eq!(
            cfg.search_url(3),
            "https://www.woodlands.co.uk/buying-a-wood/search?location=HP11SW&page=3"
        );
    }

    #[test]
    fn paths_live_under_data_dir() {
        let paths = PathsConfig::in_dir("/tmp/woods");
        assert_eq!(paths.sites_csv, PathBuf::from("/tmp/woods/woodlands_sites.csv"));
        assert_eq!(paths.cities_csv, PathBuf::from("/tmp/woods/gb.csv"));
        assert_eq!(paths.pdf_dir, PathBuf::from("/tmp/woods/PDFs"));
    }
}
