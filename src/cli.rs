use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "woodland_finder")]
#[command(about = "Scrape woodlands for sale, normalize their sizes and map them")]
#[command(version)]
pub struct Cli {
    /// Listings CSV (overrides WOODLANDS_SITES_CSV)
    #[arg(long, global = true)]
    pub sites: Option<PathBuf>,

    /// Reference cities CSV (overrides WOODLANDS_CITIES_CSV)
    #[arg(long, global = true)]
    pub cities: Option<PathBuf>,

    /// Brochure directory (overrides WOODLANDS_PDF_DIR)
    #[arg(long, global = true)]
    pub pdf_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Crawl the search results and write the listings CSV
    Scrape,

    /// Back up the listings CSV and add SizeAcres, Size_m2 and Size_m2_sqrt
    Normalize {
        /// CSV to rewrite (defaults to the listings CSV)
        csv: Option<PathBuf>,
    },

    /// Crawl the search results and download every brochure PDF
    Brochures,

    /// Serve the map dashboard
    Serve {
        /// Address to bind (overrides WOODLANDS_BIND_ADDR)
        #[arg(long)]
        addr: Option<String>,
    },
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(p) = &self.sites {
            config.paths.sites_csv = p.clone();
        }
        if let Some(p) = &self.cities {
            config.paths.cities_csv = p.clone();
        }
        if let Some(p) = &self.pdf_dir {
            config.paths.pdf_dir = p.clone();
        }
        if let Command::Serve { addr: Some(addr) } = &self.command {
            config.server.bind_addr = addr.clone();
        }
    }
}
