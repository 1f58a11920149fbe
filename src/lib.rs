//! Folio turns loosely-typed business report data and already-rendered
//! visuals into paginated PDF documents.
//!
//! Two pipelines share one [`Exporter`]:
//!
//! - **Report export**: a JSON report bundle is normalized, assembled into
//!   summary and table sections and rendered with an embedded font
//!   ([`Exporter::export_report_bundle`]).
//! - **Visual export**: a node on a [`RasterSurface`] is captured once and
//!   tiled across pages ([`Exporter::export_visual_node`]).
//!
//! ```no_run
//! use folio::{DirectorySink, Exporter, PartialExportOptions, ReportMeta};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), folio::ExportError> {
//! let exporter = Exporter::builder()
//!     .with_sink(Arc::new(DirectorySink::new("exports")))
//!     .build()?;
//! let bundle = serde_json::json!({ "sales": { "summary": { "totalSales": 1250 } } });
//! exporter
//!     .export_report_bundle(
//!         &bundle,
//!         &ReportMeta::new("Monthly Sales"),
//!         PartialExportOptions::new().with_filename("sales.pdf"),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod sink;

pub use config::EngineConfig;
pub use error::ExportError;
pub use export::{Exporter, ExporterBuilder};
pub use sink::DirectorySink;

pub use folio_normalize::{DefaultFormatter, Formatter};
pub use folio_raster::{BitmapSurface, ImageNode, Rasterizer};
pub use folio_render_lopdf::ReportMeta;
pub use folio_resource::{
    FilesystemFontFetcher, FontFamilySources, FontFetcher, FontRegistry, HttpFontFetcher,
    InMemoryFontFetcher,
};
pub use folio_sections::ReportKind;
pub use folio_traits::{
    CaptureError, DeliveryError, DownloadSink, MemorySink, RasterImage, RasterSurface,
    ResourceError,
};
pub use folio_types::{
    Color, ExportOptions, Orientation, PageFormat, PartialExportOptions, Unit,
};
