use crate::brochures::BrochureError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors from request handling, either the dashboard's own (routing, bad
/// query values) or from the layers it calls into.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Data Error: {0}")]
    Store(#[from] StoreError),

    #[error("Brochure Error: {0}")]
    Brochure(#[from] BrochureError),

    #[error("Spreadsheet Error: {0}")]
    Xlsx(String),

    #[error("Internal Server Error")]
    Internal,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Brochure(BrochureError::NothingToBundle) => 404,
            ServerError::Brochure(BrochureError::Scraper(_)) => 502,
            ServerError::Store(_)
            | ServerError::Brochure(_)
            | ServerError::Xlsx(_)
            | ServerError::Internal => 500,
        }
    }
}
