use folio_raster::RasterError;
use folio_render_lopdf::RenderError;
use folio_traits::{CaptureError, DeliveryError, ResourceError};
use folio_types::OptionsError;
use std::io;
use thiserror::Error;

/// Every way an export can fail.
///
/// Malformed report data is never an error; it is normalized to defaults
/// long before anything here can happen.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Font loading failed: {0}")]
    ResourceLoad(#[from] ResourceError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Invalid export configuration: {0}")]
    Configuration(String),

    #[error("PDF serialization failed: {0}")]
    Serialization(String),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] io::Error),
}

impl From<OptionsError> for ExportError {
    fn from(e: OptionsError) -> Self {
        ExportError::Configuration(e.to_string())
    }
}

impl From<RenderError> for ExportError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Resource(e) => ExportError::ResourceLoad(e),
            RenderError::Geometry(msg) => ExportError::Configuration(msg),
            other => ExportError::Serialization(other.to_string()),
        }
    }
}

impl From<RasterError> for ExportError {
    fn from(e: RasterError) -> Self {
        match e {
            RasterError::Capture(e) => ExportError::Capture(e),
            RasterError::Configuration(msg) => ExportError::Configuration(msg),
            RasterError::Serialization(e) => e.into(),
        }
    }
}

impl From<DeliveryError> for ExportError {
    fn from(e: DeliveryError) -> Self {
        let kind = match e {
            DeliveryError::InvalidFilename(_) => io::ErrorKind::InvalidInput,
            DeliveryError::Failed { .. } => io::ErrorKind::Other,
        };
        ExportError::Delivery(io::Error::new(kind, e))
    }
}

impl From<config::ConfigError> for ExportError {
    fn from(e: config::ConfigError) -> Self {
        ExportError::Configuration(e.to_string())
    }
}
