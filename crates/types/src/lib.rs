//! Foundation types shared by every folio crate.
//!
//! - [`ExportOptions`] / [`PartialExportOptions`]: caller-facing options and their resolution
//! - [`PageGeometry`]: a resolved page size in points with margins
//! - [`Color`]: RGB colors parsed from `#RGB` / `#RRGGBB`

pub mod color;
pub mod geometry;
pub mod options;

pub use color::Color;
pub use geometry::{Orientation, PageFormat, PageGeometry, Rect, Size, Unit};
pub use options::{ExportOptions, OptionsError, PartialExportOptions};
