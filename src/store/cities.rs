use crate::domain::City;
use crate::store::{read_csv_text, StoreError};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

/// Index of the first header matching one of `names`, ignoring case.
fn column(header: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

fn number(record: &StringRecord, idx: usize) -> Option<f64> {
    record
        .get(idx)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Reads a reference cities file. Accepts `City`/`Name`, `Latitude`/`Lat`,
/// `Longitude`/`Lng` and an optional `Population`/`Pop` column.
pub fn read_cities(path: &Path) -> Result<Vec<City>, StoreError> {
    let text = read_csv_text(path)?;
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let header = reader.headers()?.clone();

    let name_idx = column(&header, &["city", "name"]).ok_or(StoreError::MissingColumn("City"))?;
    let lat_idx =
        column(&header, &["latitude", "lat"]).ok_or(StoreError::MissingColumn("Latitude"))?;
    let lon_idx =
        column(&header, &["longitude", "lng"]).ok_or(StoreError::MissingColumn("Longitude"))?;
    let pop_idx = column(&header, &["population", "pop"]);

    let mut cities = Vec::new();
    for record in reader.records() {
        let record = record?;
        cities.push(City {
            name: record.get(name_idx).unwrap_or_default().trim().to_string(),
            latitude: number(&record, lat_idx),
            longitude: number(&record, lon_idx),
            population: pop_idx
                .and_then(|idx| number(&record, idx))
                .filter(|p| *p >= 0.0)
                .map(|p| p.round() as u64),
        });
    }
    Ok(cities)
}
