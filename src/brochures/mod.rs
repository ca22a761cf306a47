mod bundle;
mod download;
mod store;

pub use download::{download_into, file_name_for};
pub use store::{BrochureStore, BULK_LIMIT};

use crate::scraper::ScraperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrochureError {
    #[error("bad listing URL {url}: {reason}")]
    BadUrl { url: String, reason: String },

    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("no brochures could be collected")]
    NothingToBundle,
}
