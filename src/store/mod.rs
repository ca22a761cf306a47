pub mod cities;
pub mod listings;
pub mod normalize;

pub use cities::read_cities;
pub use listings::{read_sites, write_listings};
pub use normalize::normalize_file;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Whole file as text with any leading BOM removed.
fn read_csv_text(path: &Path) -> Result<String, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    Ok(match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Creates the parent directory and opens `path` for writing with a BOM
/// already in place.
fn create_with_bom(path: &Path) -> Result<fs::File, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    io::Write::write_all(&mut file, BOM.as_bytes())?;
    Ok(file)
}
