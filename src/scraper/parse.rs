// scraper/parse.rs
//
// Extraction from woodlands.co.uk search and detail pages.
//
// Detail page hero:
//
//   <section class="section section--short section--bg-yellow">
//     <div class="hero">
//       <h1>
//         Pottere Wood
//         <span class="hero__extra">£59,000</span>
//         <span class="hero__extra">Freehold</span>
//       </h1>
//     </div>
//   </section>

use crate::domain::Listing;
use crate::normalize::extract_gps;
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};
use url::Url;

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector(format!("{css}: {e}")))
}

/// Trimmed, non-empty text nodes joined with `sep`.
fn text_of(el: ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn join_url(base: &Url, href: &str) -> Result<String, ScraperError> {
    base.join(href)
        .map(String::from)
        .map_err(|e| ScraperError::Url {
            url: href.to_string(),
            reason: e.to_string(),
        })
}

/// End of results: either a real 404 or the site's "Error 404" page.
pub fn is_not_found(doc: &Html, status: u16) -> bool {
    if status == 404 {
        return true;
    }
    let Ok(h1) = selector("h1") else {
        return false;
    };
    doc.select(&h1)
        .next()
        .map(|el| text_of(el, "").to_lowercase().contains("error 404"))
        .unwrap_or(false)
}

pub fn card_links(doc: &Html, base: &Url) -> Result<Vec<String>, ScraperError> {
    let sel = selector("a.card__link[href]")?;

    let mut links = Vec::new();
    for a in doc.select(&sel) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        match join_url(base, href) {
            Ok(link) => links.push(link),
            Err(e) => warn!("Skipping card link: {e}"),
        }
    }

    info!("Found {} woodland links on this page", links.len());
    Ok(links)
}

/// Name, price and tenure type from the hero heading.
pub fn name_price_type(doc: &Html) -> Result<(String, String, String), ScraperError> {
    let hero = selector("section.section--bg-yellow h1")?;
    let any_h1 = selector("h1")?;
    let extra = selector("span.hero__extra")?;

    let h1 = doc
        .select(&hero)
        .next()
        .or_else(|| doc.select(&any_h1).next())
        .ok_or(ScraperError::MissingHeading)?;

    let mut extras = h1.select(&extra).map(|span| text_of(span, ""));
    let price = extras.next().unwrap_or_default();
    let listing_type = extras.next().unwrap_or_default();

    // The name is whatever text sits in the heading outside its spans.
    let h1_node = *h1;
    let name = h1
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let in_span = node
                .ancestors()
                .take_while(|a| *a != h1_node)
                .any(|a| a.value().as_element().is_some_and(|e| e.name() == "span"));
            (!in_span).then(|| text.trim())
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Ok((name, price, listing_type))
}

/// The size line, e.g. "about 2 ½ acres". Usually the second item of the
/// header details list; otherwise any list item mentioning acres.
pub fn size_text(doc: &Html) -> Result<String, ScraperError> {
    let ul_sel = selector("section ul")?;
    let li_sel = selector("li")?;

    for ul in doc.select(&ul_sel) {
        let items: Vec<ElementRef<'_>> = ul.select(&li_sel).collect();
        if let Some(second) = items.get(1) {
            let text = text_of(*second, " ");
            if text.to_lowercase().contains("acres") {
                return Ok(text);
            }
        }
    }

    Ok(doc
        .select(&li_sel)
        .map(|li| text_of(li, " "))
        .find(|t| t.to_lowercase().contains("acres"))
        .unwrap_or_default())
}

pub fn list_item_texts(doc: &Html) -> Result<Vec<String>, ScraperError> {
    let li_sel = selector("li")?;
    Ok(doc.select(&li_sel).map(|li| text_of(li, " ")).collect())
}

const HIDDEN_TEXT_TAGS: [&str; 3] = ["script", "style", "template"];

/// Visible page text. Script, style and template content is left out so
/// numbers inside them are never read as coordinates.
pub fn page_text(doc: &Html) -> String {
    doc.root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_TEXT_TAGS.contains(&e.name()))
            });
            (!hidden).then(|| text.trim())
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The "Download PDF details" link, or failing that any link to a PDF.
pub fn brochure_link(doc: &Html, base: &Url) -> Result<String, ScraperError> {
    let any_link = selector("a[href]")?;
    let pdf_link = selector(r#"a[href$=".pdf"]"#)?;

    let href = doc
        .select(&any_link)
        .find(|a| text_of(*a, " ").to_lowercase().contains("download pdf details"))
        .or_else(|| doc.select(&pdf_link).next())
        .and_then(|a| a.value().attr("href"))
        .ok_or(ScraperError::MissingBrochureLink)?;

    join_url(base, href)
}

pub fn parse_detail(doc: &Html, url: &str) -> Result<Listing, ScraperError> {
    let (name, price, listing_type) = name_price_type(doc)?;
    info!("Name: {name} | Price: {price} | Type: {listing_type}");

    let size = size_text(doc)?;
    info!("Size: {size}");

    let items = list_item_texts(doc)?;
    let gps = extract_gps(items.iter().map(String::as_str), &page_text(doc));
    info!(
        "GPS: {} -> lat={:?}, lon={:?}",
        gps.text, gps.latitude, gps.longitude
    );

    Ok(Listing {
        name,
        price,
        listing_type,
        size,
        latitude: gps.latitude,
        longitude: gps.longitude,
        gps_text: gps.text,
        url: url.to_string(),
    })
}
