use crate::scraper::{Fetcher, ScraperError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

const FALLBACK_NAME: &str = "details.pdf";

/// Final path segment of a download URL, used as the local file name.
pub fn file_name_for(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Saves `url` under `dir`. A file of the same name already there counts as
/// downloaded and is left alone.
pub fn download_into<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    dir: &Path,
) -> Result<PathBuf, ScraperError> {
    fs::create_dir_all(dir)?;

    let dest = dir.join(file_name_for(url));
    if dest.exists() {
        info!("Already exists: {}", dest.display());
        return Ok(dest);
    }

    let bytes = fetcher.get_bytes(url)?;
    fs::write(&dest, &bytes)?;
    info!("Saved {} ({} bytes)", dest.display(), bytes.len());

    Ok(dest)
}
