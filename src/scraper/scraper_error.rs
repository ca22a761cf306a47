use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Invalid URL {url}: {reason}")]
    Url { url: String, reason: String },
    #[error("HTML selector error: {0}")]
    Selector(String),
    #[error("h1 not found for name/price/type")]
    MissingHeading,
    #[error("No PDF link found on detail page")]
    MissingBrochureLink,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
