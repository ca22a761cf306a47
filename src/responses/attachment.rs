use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// A download the browser saves as `filename`.
pub fn attachment_response(bytes: Vec<u8>, filename: &str, content_type: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(bytes))
        .map_err(|_| ServerError::Internal)
}

pub fn xlsx_response(buffer: Vec<u8>, filename: &str) -> ResultResp {
    attachment_response(buffer, filename, XLSX_CONTENT_TYPE)
}

pub fn pdf_response(bytes: Vec<u8>, filename: &str) -> ResultResp {
    attachment_response(bytes, filename, mime::APPLICATION_PDF.as_ref())
}

pub fn zip_response(bytes: Vec<u8>, filename: &str) -> ResultResp {
    attachment_response(bytes, filename, ZIP_CONTENT_TYPE)
}
