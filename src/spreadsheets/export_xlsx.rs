use crate::domain::SiteView;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const HEADERS: [&str; 12] = [
    "Name",
    "Price",
    "Type",
    "Size",
    "SizeAcres",
    "Size_m2",
    "Size_m2_sqrt",
    "Latitude",
    "Longitude",
    "NearestCity",
    "MinCityMiles",
    "URL",
];

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::Xlsx(format!("Failed to write {what}: {e}"))
}

/// Numbers go in as numbers; a missing one leaves the cell blank.
fn write_opt(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    what: &str,
) -> Result<(), ServerError> {
    if let Some(v) = value {
        sheet.write_number(row, col, v).map_err(xlsx_err(what))?;
    }
    Ok(())
}

/// The filtered woodlands table as workbook bytes.
pub fn sites_workbook(sites: &[SiteView]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Woodlands").map_err(xlsx_err("sheet name"))?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err(header))?;
    }

    for (i, view) in sites.iter().enumerate() {
        let r = (i + 1) as u32;
        let l = &view.site.listing;
        let m = &view.site.measures;

        sheet.write_string(r, 0, &l.name).map_err(xlsx_err("name"))?;
        sheet.write_string(r, 1, &l.price).map_err(xlsx_err("price"))?;
        sheet.write_string(r, 2, &l.listing_type).map_err(xlsx_err("type"))?;
        sheet.write_string(r, 3, &l.size).map_err(xlsx_err("size"))?;
        write_opt(sheet, r, 4, m.acres, "acres")?;
        write_opt(sheet, r, 5, m.square_metres, "square metres")?;
        write_opt(sheet, r, 6, m.side_metres, "side length")?;
        write_opt(sheet, r, 7, l.latitude, "latitude")?;
        write_opt(sheet, r, 8, l.longitude, "longitude")?;
        if let Some(city) = &view.site.nearest_city {
            sheet.write_string(r, 9, city).map_err(xlsx_err("nearest city"))?;
        }
        write_opt(sheet, r, 10, view.min_city_miles, "distance")?;
        sheet.write_string(r, 11, &l.url).map_err(xlsx_err("url"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::Xlsx(format!("Failed to save workbook: {e}")))
}

pub fn export_sites_xlsx(sites: &[SiteView], filename: &str) -> ResultResp {
    xlsx_response(sites_workbook(sites)?, filename)
}
