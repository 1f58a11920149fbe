use folio_resource::ResourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Fonts could not be loaded: {0}")]
    Resource(#[from] ResourceError),
    #[error("Page geometry leaves no room for content: {0}")]
    Geometry(String),
    #[error("Render task failed: {0}")]
    Task(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}
