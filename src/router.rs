use crate::brochures::{file_name_for, BrochureStore, BULK_LIMIT};
use crate::config::Config;
use crate::domain::{nearest_city_options, type_options, City, Extents, Site, SiteFilter};
use crate::errors::ServerError;
use crate::query::QueryParams;
use crate::responses::{html_response, pdf_response, zip_response, ResultResp};
use crate::scraper::Fetcher;
use crate::spreadsheets::export_sites_xlsx;
use crate::store::{read_cities, read_sites, StoreError};
use crate::templates::pages::{dashboard_page, DashboardVm};
use astra::Request;
use chrono::Local;
use std::fs;
use tracing::{info, warn};

/// Everything a request handler may touch. Immutable once the server runs.
pub struct AppState {
    pub config: Config,
    pub fetcher: Box<dyn Fetcher + Send + Sync>,
}

impl AppState {
    pub fn new(config: Config, fetcher: Box<dyn Fetcher + Send + Sync>) -> Self {
        Self { config, fetcher }
    }

    fn brochures(&self) -> BrochureStore {
        BrochureStore::new(&self.config.paths.pdf_dir, self.config.scrape.bulk_delay)
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let query = QueryParams::parse(req.uri().query());

    match (method, path) {
        ("GET", "/") => dashboard(state, &query, req.uri().query()),
        ("GET", "/export.xlsx") => export(state, &query),
        ("GET", "/brochure") => brochure(state, &query),
        ("GET", "/brochures.zip") => bulk_brochures(state, &query),
        _ => Err(ServerError::NotFound),
    }
}

/// Sites and cities as they are on disk right now.
struct Dataset {
    sites: Vec<Site>,
    cities: Vec<City>,
}

/// A missing or malformed cities file only switches the city layer off.
fn load_cities(state: &AppState) -> Vec<City> {
    match read_cities(&state.config.paths.cities_csv) {
        Ok(cities) => cities,
        Err(StoreError::NotFound(path)) => {
            info!("No cities file at {}", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("Ignoring cities file: {e}");
            Vec::new()
        }
    }
}

fn load(state: &AppState) -> Result<Dataset, ServerError> {
    let mut sites = read_sites(&state.config.paths.sites_csv)?;
    let cities = load_cities(state);

    for site in &mut sites {
        site.fill_nearest_city(&cities);
    }

    Ok(Dataset { sites, cities })
}

fn filter_from(state: &AppState, query: &QueryParams) -> Result<SiteFilter, ServerError> {
    query.site_filter(state.config.server.default_max_miles)
}

fn dashboard(state: &AppState, query: &QueryParams, raw_query: Option<&str>) -> ResultResp {
    let data = load(state)?;
    let filter = filter_from(state, query)?;
    let outcome = filter.apply(&data.sites, &data.cities);

    let types = type_options(&data.sites);
    let nearest = nearest_city_options(&data.sites);
    let export_href = match raw_query {
        Some(q) if !q.is_empty() => format!("/export.xlsx?{q}"),
        _ => "/export.xlsx".to_string(),
    };

    let vm = DashboardVm {
        filter: &filter,
        outcome: &outcome,
        type_options: &types,
        city_options: &nearest,
        extents: Extents::of(&data.sites, &data.cities),
        carried: query.without("n"),
        export_href,
        map_center: state.config.server.map_center,
        map_zoom: state.config.server.map_zoom,
        default_max_miles: state.config.server.default_max_miles,
    };

    html_response(dashboard_page(&vm))
}

fn export(state: &AppState, query: &QueryParams) -> ResultResp {
    let data = load(state)?;
    let outcome = filter_from(state, query)?.apply(&data.sites, &data.cities);

    export_sites_xlsx(&outcome.sites, "woodlands.xlsx")
}

fn brochure(state: &AppState, query: &QueryParams) -> ResultResp {
    let url = query
        .get("url")
        .ok_or_else(|| ServerError::BadRequest("missing url".to_string()))?;

    let data = load(state)?;
    let site = data
        .sites
        .iter()
        .find(|s| s.listing.url == url)
        .ok_or(ServerError::NotFound)?;

    let path = state
        .brochures()
        .locate_or_fetch(state.fetcher.as_ref(), &site.listing)?;
    let bytes = fs::read(&path).map_err(|e| ServerError::Brochure(e.into()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name_for(url));

    pdf_response(bytes, &name)
}

fn bulk_brochures(state: &AppState, query: &QueryParams) -> ResultResp {
    let requested = match query.get("n") {
        None => BULK_LIMIT,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ServerError::BadRequest(format!("invalid count: {raw:?}")))?,
    };

    let data = load(state)?;
    let outcome = filter_from(state, query)?.apply(&data.sites, &data.cities);

    let bundle = state.brochures().bundle(
        state.fetcher.as_ref(),
        outcome.sites.iter().map(|v| &v.site.listing),
        requested,
    )?;
    info!("Bundled {} PDFs ({} errors)", bundle.files, bundle.errors);

    let name = format!("woodland_pdfs_{}.zip", Local::now().format("%Y%m%d_%H%M%S"));
    zip_response(bundle.archive, &name)
}
