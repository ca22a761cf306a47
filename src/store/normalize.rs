use crate::normalize::SizeMeasures;
use crate::store::{create_with_bom, read_csv_text, StoreError};
use chrono::{DateTime, Local};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SIZE_COLUMN: &str = "Size";
const DERIVED_COLUMNS: [&str; 3] = ["SizeAcres", "Size_m2", "Size_m2_sqrt"];

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeSummary {
    pub backup: PathBuf,
    pub rows: usize,
    pub with_acres: usize,
}

fn backup_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    path.with_file_name(format!(
        "{stem}.backup_{}{ext}",
        now.format("%Y%m%d_%H%M%S")
    ))
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn normalize_file(path: &Path) -> Result<NormalizeSummary, StoreError> {
    normalize_file_at(path, Local::now())
}

/// Backs up `path`, then rewrites it in place with the size columns derived
/// from `Size`. Existing derived columns are overwritten, other columns are
/// kept as they are.
pub fn normalize_file_at(
    path: &Path,
    now: DateTime<Local>,
) -> Result<NormalizeSummary, StoreError> {
    let text = read_csv_text(path)?;
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut header = reader.headers()?.clone();
    let size_idx = header
        .iter()
        .position(|h| h.trim() == SIZE_COLUMN)
        .ok_or(StoreError::MissingColumn(SIZE_COLUMN))?;

    let derived_idx: Vec<usize> = DERIVED_COLUMNS
        .iter()
        .map(|name| match header.iter().position(|h| h.trim() == *name) {
            Some(idx) => idx,
            None => {
                header.push_field(name);
                header.len() - 1
            }
        })
        .collect();

    let mut rows = Vec::new();
    let mut with_acres = 0;
    for record in reader.records() {
        let record = record?;
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        fields.resize(header.len(), String::new());

        let measures = SizeMeasures::from_size_text(&fields[size_idx]);
        if measures.acres.is_some() {
            with_acres += 1;
        }
        let values = [measures.acres, measures.square_metres, measures.side_metres];
        for (idx, value) in derived_idx.iter().zip(values) {
            fields[*idx] = cell(value);
        }
        rows.push(StringRecord::from(fields));
    }

    let backup = backup_path(path, now);
    fs::copy(path, &backup)?;
    info!("Backup written to {}", backup.display());

    let file = create_with_bom(path)?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        "Updated {}: {} rows, {} with acres",
        path.display(),
        rows.len(),
        with_acres
    );

    Ok(NormalizeSummary {
        backup,
        rows: rows.len(),
        with_acres,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 17, 9, 3, 7).unwrap()
    }

    #[test]
    fn backup_name_carries_timestamp() {
        let path = Path::new("/data/woodlands_sites.csv");
        assert_eq!(
            backup_path(path, fixed_time()),
            PathBuf::from("/data/woodlands_sites.backup_20240517_090307.csv")
        );
    }

    #[test]
    fn adds_derived_columns_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("woodlands_sites.csv");
        let original = "\u{feff}Name,Size,URL\nOak,1 acre,https://woods.test/oak\nAsh,POA,https://woods.test/ash\n";
        fs::write(&path, original).unwrap();

        let summary = normalize_file_at(&path, fixed_time()).unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.with_acres, 1);
        assert_eq!(
            summary.backup,
            dir.path().join("woodlands_sites.backup_20240517_090307.csv")
        );
        assert_eq!(fs::read_to_string(&summary.backup).unwrap(), original);

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("\u{feff}Name,Size,URL,SizeAcres,Size_m2,Size_m2_sqrt")
        );
        let oak: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(&oak[..4], ["Oak", "1 acre", "https://woods.test/oak", "1"]);
        assert_eq!(oak[4], "4046.8564224");
        let side: f64 = oak[5].parse().unwrap();
        assert!((side - 63.6149).abs() < 1e-3);
        assert_eq!(lines.next(), Some("Ash,POA,https://woods.test/ash,,,"));
    }

    #[test]
    fn existing_derived_columns_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        fs::write(&path, "Size,SizeAcres,Size_m2,Size_m2_sqrt,Name\n2 acres,9,9,9,Oak\n").unwrap();

        normalize_file_at(&path, fixed_time()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("2 acres,2,8093.7128448,"), "{row}");
        assert!(row.ends_with(",Oak"));
    }

    #[test]
    fn missing_size_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        fs::write(&path, "Name,URL\nOak,https://woods.test/oak\n").unwrap();

        let err = normalize_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "column 'Size' not found");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = normalize_file(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
