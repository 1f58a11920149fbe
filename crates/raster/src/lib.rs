//! Rasterization export.
//!
//! A visual node is captured once through a [`RasterSurface`], the image is
//! planned into vertical slices by [`plan_tiles`], and every slice becomes a
//! page showing the same embedded image at a different offset.

mod error;
mod pdf;
mod rasterizer;
mod surface;
mod tiling;

pub use error::RasterError;
pub use pdf::write_tiled_pdf;
pub use rasterizer::Rasterizer;
pub use surface::{BitmapSurface, ImageNode};
pub use tiling::{PageSlice, TilePlan, plan_tiles};

pub use folio_traits::{CaptureError, RasterImage, RasterSurface};
