// scraper/fetch.rs
use crate::config::ScrapeConfig;
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use scraper::Html;
use std::time::Duration;
use tracing::info;

const PAGE_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// A fetched HTML page. Error statuses are still pages: the search results
/// end with a 404 that the crawler has to look at.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

pub trait Fetcher {
    fn get_page(&self, url: &str) -> Result<Page, ScraperError>;

    /// Raw bytes of a download; a non-success status is an error.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError>;
}

/// Fetches `url` and parses it, treating a non-success status as an error.
pub fn fetch_document<F: Fetcher + ?Sized>(fetcher: &F, url: &str) -> Result<Html, ScraperError> {
    let page = fetcher.get_page(url)?;
    if !page.is_success() {
        return Err(ScraperError::Status {
            status: page.status,
            url: url.to_string(),
        });
    }
    Ok(page.document())
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| ScraperError::Network(e.to_string()))?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(PAGE_TIMEOUT)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get_page(&self, url: &str) -> Result<Page, ScraperError> {
        info!("GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Page { status, body })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        info!("DOWNLOAD {url}");

        let resp = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp
            .bytes()
            .map_err(|e| ScraperError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
