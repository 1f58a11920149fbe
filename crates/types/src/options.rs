//! Caller-facing export options.
//!
//! Callers hand in a [`PartialExportOptions`]; it is resolved against
//! [`ExportOptions::default`] field by field, so nothing downstream ever
//! sees an unset value.
use crate::color::Color;
use crate::geometry::{Orientation, PageFormat, PageGeometry, Unit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FILENAME: &str = "document.pdf";
pub const DEFAULT_MARGIN: f32 = 10.0;
pub const DEFAULT_RASTER_SCALE: f32 = 2.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("Filename must not be empty")]
    EmptyFilename,

    #[error("Margin must be a finite, non-negative length, got {0}")]
    InvalidMargin(f32),

    #[error("Raster scale must be a finite, positive number, got {0}")]
    InvalidRasterScale(f32),

    #[error("Page dimensions must be finite and positive, got {width}x{height}")]
    InvalidPageSize { width: f32, height: f32 },
}

/// Fully resolved options for one export call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub filename: String,
    pub orientation: Orientation,
    pub unit: Unit,
    pub page_format: PageFormat,
    /// Uniform margin, in `unit`.
    pub margin: f32,
    /// Multiplier applied to the captured raster resolution.
    pub raster_scale: f32,
    pub background_color: Color,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            orientation: Orientation::Portrait,
            unit: Unit::Mm,
            page_format: PageFormat::A4,
            margin: DEFAULT_MARGIN,
            raster_scale: DEFAULT_RASTER_SCALE,
            background_color: Color::WHITE,
        }
    }
}

impl ExportOptions {
    /// The page size and margin in points.
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::from_format(self.page_format, self.orientation, self.unit, self.margin)
    }

    /// Rejects values no export can work with. Margins that leave no
    /// printable area are checked by the pipeline that needs the area.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.filename.trim().is_empty() {
            return Err(OptionsError::EmptyFilename);
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(OptionsError::InvalidMargin(self.margin));
        }
        if !self.raster_scale.is_finite() || self.raster_scale <= 0.0 {
            return Err(OptionsError::InvalidRasterScale(self.raster_scale));
        }
        let size = self.page_format.size_pt(self.unit);
        let usable = |side: f32| side.is_finite() && side > 0.0;
        if !(usable(size.width) && usable(size.height)) {
            return Err(OptionsError::InvalidPageSize {
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }
}

/// Caller overrides; every unset field falls back to the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialExportOptions {
    pub filename: Option<String>,
    pub orientation: Option<Orientation>,
    pub unit: Option<Unit>,
    pub page_format: Option<PageFormat>,
    pub margin: Option<f32>,
    pub raster_scale: Option<f32>,
    pub background_color: Option<Color>,
}

impl PartialExportOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_page_format(mut self, format: PageFormat) -> Self {
        self.page_format = Some(format);
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_raster_scale(mut self, scale: f32) -> Self {
        self.raster_scale = Some(scale);
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Layers `overrides` on top of `self`; fields set in `overrides` win.
    pub fn merged_with(self, overrides: PartialExportOptions) -> Self {
        Self {
            filename: overrides.filename.or(self.filename),
            orientation: overrides.orientation.or(self.orientation),
            unit: overrides.unit.or(self.unit),
            page_format: overrides.page_format.or(self.page_format),
            margin: overrides.margin.or(self.margin),
            raster_scale: overrides.raster_scale.or(self.raster_scale),
            background_color: overrides.background_color.or(self.background_color),
        }
    }

    pub fn resolve(self) -> ExportOptions {
        self.resolve_against(ExportOptions::default())
    }

    pub fn resolve_against(self, defaults: ExportOptions) -> ExportOptions {
        ExportOptions {
            filename: self.filename.unwrap_or(defaults.filename),
            orientation: self.orientation.unwrap_or(defaults.orientation),
            unit: self.unit.unwrap_or(defaults.unit),
            page_format: self.page_format.unwrap_or(defaults.page_format),
            margin: self.margin.unwrap_or(defaults.margin),
            raster_scale: self.raster_scale.unwrap_or(defaults.raster_scale),
            background_color: self.background_color.unwrap_or(defaults.background_color),
        }
    }
}
