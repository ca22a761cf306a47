pub mod attachment;
pub mod errors;
pub mod html;

pub use attachment::{pdf_response, xlsx_response, zip_response};
pub use errors::{error_response, ResultResp};
pub use html::html_response;
