pub mod raster;
pub mod resource;
pub mod sink;

pub use raster::{CaptureError, RasterImage, RasterSurface};
pub use resource::{FontFetcher, InMemoryFontFetcher, ResourceError, SharedResourceData};
pub use sink::{DeliveryError, DownloadSink, MemorySink};
