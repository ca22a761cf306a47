use crate::brochures::bundle::zip_files;
use crate::brochures::download::download_into;
use crate::brochures::BrochureError;
use crate::domain::Listing;
use crate::scraper::parse::brochure_link;
use crate::scraper::{fetch_document, Fetcher};
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Most brochures bundled in one archive.
pub const BULK_LIMIT: usize = 30;

/// A zip of brochures plus how many listings could not be served.
#[derive(Debug)]
pub struct Bundle {
    pub archive: Vec<u8>,
    pub files: usize,
    pub errors: usize,
}

/// Brochure PDFs kept in one directory.
#[derive(Debug, Clone)]
pub struct BrochureStore {
    dir: PathBuf,
    bulk_delay: Duration,
}

fn slug_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path().trim_matches('/');
    path.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// "Pottere Wood (North)" → "pottere-wood-north".
fn name_key(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            key.push(c);
        } else if !key.ends_with('-') {
            key.push('-');
        }
    }
    key.trim_matches('-').to_string()
}

impl BrochureStore {
    pub fn new(dir: impl Into<PathBuf>, bulk_delay: Duration) -> Self {
        Self {
            dir: dir.into(),
            bulk_delay,
        }
    }

    fn local_pdfs(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "pdf"))
            .collect()
    }

    /// A PDF already in the directory for this listing: first by the URL's
    /// last segment, then by the listing name. Shortest file name wins.
    pub fn find_local(&self, listing: &Listing) -> Option<PathBuf> {
        let pdfs = self.local_pdfs();
        let stem_contains = |p: &PathBuf, needle: &str| {
            p.file_stem()
                .map(|s| s.to_string_lossy().to_lowercase().contains(needle))
                .unwrap_or(false)
        };

        let mut candidates: Vec<PathBuf> = match slug_from_url(&listing.url) {
            Some(slug) => pdfs.iter().filter(|p| stem_contains(p, &slug)).cloned().collect(),
            None => Vec::new(),
        };

        if candidates.is_empty() {
            let key = name_key(&listing.name);
            if !key.is_empty() {
                candidates = pdfs.into_iter().filter(|p| stem_contains(p, &key)).collect();
            }
        }

        candidates.sort_by_key(|p| p.file_name().map(|n| n.len()).unwrap_or(usize::MAX));
        candidates.into_iter().next()
    }

    /// Visits the detail page, follows its brochure link and saves the PDF.
    pub fn fetch<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        detail_url: &str,
    ) -> Result<PathBuf, BrochureError> {
        let base = Url::parse(detail_url).map_err(|e| BrochureError::BadUrl {
            url: detail_url.to_string(),
            reason: e.to_string(),
        })?;

        let doc = fetch_document(fetcher, detail_url)?;
        let pdf_url = brochure_link(&doc, &base)?;
        info!("PDF {pdf_url}");

        Ok(download_into(fetcher, &pdf_url, &self.dir)?)
    }

    pub fn locate_or_fetch<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        listing: &Listing,
    ) -> Result<PathBuf, BrochureError> {
        if let Some(local) = self.find_local(listing) {
            return Ok(local);
        }
        self.fetch(fetcher, &listing.url)
    }

    /// Brochures for the first `requested` listings (never more than
    /// [`BULK_LIMIT`]) in one zip. Listings whose brochure cannot be found or
    /// fetched are counted in `errors`.
    pub fn bundle<'l, F, I>(
        &self,
        fetcher: &F,
        listings: I,
        requested: usize,
    ) -> Result<Bundle, BrochureError>
    where
        F: Fetcher + ?Sized,
        I: IntoIterator<Item = &'l Listing>,
    {
        let n = requested.min(BULK_LIMIT);
        let mut paths = Vec::new();
        let mut errors = 0;

        for (idx, listing) in listings.into_iter().take(n).enumerate() {
            info!("Processing {}/{}: {}", idx + 1, n, listing.name);
            match self.locate_or_fetch(fetcher, listing) {
                Ok(path) => paths.push(path),
                Err(e) => {
                    warn!("Failed on {}: {e}", listing.name);
                    errors += 1;
                }
            }
            thread::sleep(self.bulk_delay);
        }

        if paths.is_empty() {
            return Err(BrochureError::NothingToBundle);
        }

        let archive = zip_files(&paths)?;
        Ok(Bundle {
            archive,
            files: paths.len(),
            errors,
        })
    }
}
