use folio_render_lopdf::RenderError;
use folio_traits::CaptureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Invalid page configuration: {0}")]
    Configuration(String),

    #[error("PDF assembly failed: {0}")]
    Serialization(#[from] RenderError),
}
