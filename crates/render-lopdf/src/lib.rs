//! PDF output for the folio export engine, built on lopdf.
//!
//! [`ReportRenderer`] lays report sections out as a flowing, paginated
//! document with embedded TrueType fonts. [`PdfWriter`] is the shared
//! lopdf document assembler, also used by the rasterizer.

mod encoding;
mod error;
mod font;
mod meta;
mod renderer;
mod writer;

pub use encoding::to_win_ansi;
pub use error::RenderError;
pub use font::EmbeddedFont;
pub use meta::ReportMeta;
pub use renderer::{ReportRenderer, render_report_document};
pub use writer::{PdfWriter, flate_compress};
