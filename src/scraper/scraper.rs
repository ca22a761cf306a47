// scraper.rs
use crate::brochures::download_into;
use crate::config::ScrapeConfig;
use crate::domain::Listing;
use crate::scraper::fetch::{fetch_document, Fetcher};
use crate::scraper::parse::{brochure_link, card_links, is_not_found, parse_detail};
use crate::scraper::ScraperError;
use scraper::Html;
use std::collections::HashSet;
use std::path::Path;
use std::thread;
use tracing::{error, info, warn};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlSummary {
    pub pages: u32,
    pub visited: usize,
    pub failed: usize,
}

/// Walks the paginated search results one page at a time and visits every
/// detail page once.
pub struct Crawler<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a ScrapeConfig,
    base: Url,
}

impl<'a, F: Fetcher + ?Sized> Crawler<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ScrapeConfig) -> Result<Self, ScraperError> {
        let base = Url::parse(&config.base_url).map_err(|e| ScraperError::Url {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            fetcher,
            config,
            base,
        })
    }

    /// Calls `visit` for each unique detail page until the results run out.
    ///
    /// Pagination stops at the "not found" page, at a page without cards, when
    /// a search page cannot be fetched, or after `max_pages`. A failing detail
    /// page is logged and skipped.
    pub fn for_each_detail_page<V>(&self, mut visit: V) -> CrawlSummary
    where
        V: FnMut(&str, &Html) -> Result<(), ScraperError>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut summary = CrawlSummary::default();
        let mut page: u32 = 1;

        loop {
            if self.config.max_pages.is_some_and(|max| page > max) {
                info!("Reached page limit, finishing");
                break;
            }

            let search_url = self.config.search_url(page);
            let resp = match self.fetcher.get_page(&search_url) {
                Ok(resp) => resp,
                Err(e) => {
                    error!("Search page {page} failed: {e}");
                    break;
                }
            };

            let doc = resp.document();
            if is_not_found(&doc, resp.status) {
                info!("Page {page} is 404 / end of results");
                break;
            }

            let links = match card_links(&doc, &self.base) {
                Ok(links) => links,
                Err(e) => {
                    warn!("Could not parse links on page {page}: {e}");
                    break;
                }
            };
            if links.is_empty() {
                info!("No woodland cards on page {page}");
                break;
            }
            summary.pages += 1;

            let total = links.len();
            for (i, link) in links.iter().enumerate() {
                if !seen.insert(link.clone()) {
                    info!("Already processed: {link}");
                    continue;
                }

                info!("Page {page}, woodland {}/{total}", i + 1);
                let result = fetch_document(self.fetcher, link).and_then(|doc| visit(link, &doc));
                match result {
                    Ok(()) => summary.visited += 1,
                    Err(e) => {
                        error!("Failed on {link}: {e}");
                        summary.failed += 1;
                    }
                }

                thread::sleep(self.config.request_delay);
            }

            page += 1;
            info!("Moving to page {page}");
            thread::sleep(self.config.request_delay);
        }

        summary
    }

    /// One listing per unique detail page.
    pub fn scrape_listings(&self) -> (Vec<Listing>, CrawlSummary) {
        let mut listings = Vec::new();

        let summary = self.for_each_detail_page(|url, doc| {
            let listing = parse_detail(doc, url)?;
            info!(
                "OK {} | {} | {} | {}",
                listing.name, listing.price, listing.listing_type, listing.size
            );
            listings.push(listing);
            Ok(())
        });

        (listings, summary)
    }

    /// Downloads every listing's brochure into `dir`; returns how many were
    /// saved or already present.
    pub fn download_brochures(&self, dir: &Path) -> (usize, CrawlSummary) {
        let mut downloads = 0;

        let summary = self.for_each_detail_page(|url, doc| {
            let base = Url::parse(url).unwrap_or_else(|_| self.base.clone());
            let pdf_url = brochure_link(doc, &base)?;
            info!("PDF {pdf_url}");
            download_into(self.fetcher, &pdf_url, dir)?;
            downloads += 1;
            Ok(())
        });

        (downloads, summary)
    }
}
