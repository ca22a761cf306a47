mod fetch;
pub mod parse;
mod scraper;
mod scraper_error;

pub use fetch::{fetch_document, Fetcher, HttpFetcher};
#[cfg(test)]
pub use fetch::Page;
pub use self::scraper::Crawler;
pub use scraper_error::ScraperError;
