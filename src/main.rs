use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::responses::error_response;
use crate::router::{handle, AppState};
use crate::scraper::{Crawler, HttpFetcher};
use crate::store::{normalize_file, write_listings};
use anyhow::{bail, Context};
use astra::Server;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod brochures;
mod cli;
mod config;
mod domain;
mod errors;
mod normalize;
mod query;
mod responses;
mod router;
mod scraper;
mod spreadsheets;
mod store;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("invalid configuration")?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Command::Scrape => scrape(&config),
        Command::Normalize { csv } => normalize(&config, csv),
        Command::Brochures => brochures(&config),
        Command::Serve { .. } => serve(config),
    }
}

fn scrape(config: &Config) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(&config.scrape)?;
    let crawler = Crawler::new(&fetcher, &config.scrape)?;

    let (listings, summary) = crawler.scrape_listings();
    write_listings(&config.paths.sites_csv, &listings)
        .with_context(|| format!("writing {}", config.paths.sites_csv.display()))?;

    info!(
        "Done: {} pages, {} woodlands, {} failed",
        summary.pages, summary.visited, summary.failed
    );
    Ok(())
}

fn normalize(config: &Config, csv: Option<PathBuf>) -> anyhow::Result<()> {
    let path = csv.unwrap_or_else(|| config.paths.sites_csv.clone());
    let summary = normalize_file(&path).with_context(|| format!("normalizing {}", path.display()))?;

    info!(
        "Normalized {} rows ({} with acres), backup at {}",
        summary.rows,
        summary.with_acres,
        summary.backup.display()
    );
    Ok(())
}

fn brochures(config: &Config) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(&config.scrape)?;
    let crawler = Crawler::new(&fetcher, &config.scrape)?;

    let (saved, summary) = crawler.download_brochures(&config.paths.pdf_dir);
    info!(
        "Done: {saved} brochures in {} ({} failed)",
        config.paths.pdf_dir.display(),
        summary.failed
    );
    Ok(())
}

fn serve(config: Config) -> anyhow::Result<()> {
    if !config.paths.sites_csv.exists() {
        bail!("file not found: {}", config.paths.sites_csv.display());
    }

    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {:?}", config.server.bind_addr))?;
    let fetcher = HttpFetcher::new(&config.scrape)?;
    let state = AppState::new(config, Box::new(fetcher));

    info!("Starting server at http://{addr}");
    Server::bind(&addr)
        .max_workers(8)
        .serve(move |req, _info| match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => error_response(err),
        })
        .context("server ended with error")?;

    info!("Server shut down cleanly.");
    Ok(())
}
