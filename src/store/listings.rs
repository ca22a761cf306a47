use crate::domain::{Listing, Site, SiteRow, LISTING_COLUMNS};
use crate::store::{create_with_bom, read_csv_text, StoreError};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;
use tracing::info;

/// Writes the scraped listings with a BOM and the fixed header, even when
/// there are no rows.
pub fn write_listings(path: &Path, listings: &[Listing]) -> Result<(), StoreError> {
    let file = create_with_bom(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(LISTING_COLUMNS)?;
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;

    info!("Saved {} rows to {}", listings.len(), path.display());
    Ok(())
}

pub fn read_sites(path: &Path) -> Result<Vec<Site>, StoreError> {
    let text = read_csv_text(path)?;
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut sites = Vec::new();
    for row in reader.deserialize::<SiteRow>() {
        sites.push(Site::from(row?));
    }
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn listing(name: &str, lat: Option<f64>) -> Listing {
        Listing {
            name: name.to_string(),
            price: "£59,000".to_string(),
            listing_type: "Freehold".to_string(),
            size: "about 2 ½ acres".to_string(),
            latitude: lat,
            longitude: lat.map(|_| -0.240244),
            gps_text: "GPS coordinates: 51.7061, -0.240244".to_string(),
            url: format!("https://woods.test/buy/{}", name.to_lowercase()),
        }
    }

    #[test]
    fn written_file_has_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sites.csv");

        write_listings(&path, &[]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "\u{feff}Name,Price,Type,Size,Latitude,Longitude,GPS_Text,URL\n"
        );
    }

    #[test]
    fn absent_coordinates_are_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");

        write_listings(&path, &[listing("Oak", None)]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("Freehold,about 2 ½ acres,,,"), "{row}");
    }

    #[test]
    fn sites_read_back_with_derived_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        write_listings(&path, &[listing("Oak", Some(51.7061)), listing("Ash", None)]).unwrap();

        let sites = read_sites(&path).unwrap();

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].listing.name, "Oak");
        assert_eq!(sites[0].listing.latitude, Some(51.7061));
        assert_eq!(sites[0].price_value, Some(59000));
        assert_eq!(sites[0].measures.acres, Some(2.5));
        assert_eq!(sites[1].position(), None);
    }

    #[test]
    fn stored_derived_columns_win_and_junk_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        fs::write(
            &path,
            "\u{feff}Name,Price,Type,Size,Latitude,Longitude,GPS_Text,URL,SizeAcres,Size_m2,Size_m2_sqrt,NearestCity\n\
             Oak,POA,Freehold,2 acres,abc,-1.0,,https://woods.test/oak,7,100,10,Oxford\n\
             Ash,£5,Freehold,3 acres,52.0,-1.0,,https://woods.test/ash,,,,\n",
        )
        .unwrap();

        let sites = read_sites(&path).unwrap();

        assert_eq!(sites[0].measures.acres, Some(7.0));
        assert_eq!(sites[0].measures.square_metres, Some(100.0));
        assert_eq!(sites[0].measures.side_metres, Some(10.0));
        assert_eq!(sites[0].listing.latitude, None);
        assert_eq!(sites[0].price_value, None);
        assert_eq!(sites[0].nearest_city.as_deref(), Some("Oxford"));

        assert_eq!(sites[1].measures.acres, Some(3.0));
        assert_eq!(sites[1].nearest_city, None);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_sites(Path::new("/no/such/sites.csv")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(err.to_string(), "file not found: /no/such/sites.csv");
    }
}
