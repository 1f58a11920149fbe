//! Engine configuration from an optional TOML file layered under `FOLIO_*`
//! environment variables.
//!
//! ```toml
//! [fonts]
//! family = "Roboto"
//! regular = "fonts/Roboto-Regular.ttf"
//! bold = "fonts/Roboto-Bold.ttf"
//! base_dir = "/usr/share/folio"
//! fetch_timeout_ms = 5000
//!
//! [export]
//! page_format = "letter"
//! margin = 12
//!
//! [output]
//! dir = "exports"
//! ```
//!
//! Environment variables use `__` between sections, e.g.
//! `FOLIO_EXPORT__RASTER_SCALE=3` or `FOLIO_OUTPUT__DIR=/tmp`.

use crate::error::ExportError;
use folio_render_lopdf::ReportMeta;
use folio_resource::{FontFamilySources, FontRegistryConfig};
use folio_types::{Color, Orientation, PageFormat, PartialExportOptions, Unit};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "FOLIO";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fonts: FontConfig,
    pub export: ExportDefaults,
    pub output: OutputConfig,
    pub company: CompanyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub regular: String,
    pub bold: String,
    /// Fonts are read from this directory instead of being downloaded.
    pub base_dir: Option<PathBuf>,
    pub fetch_timeout_ms: Option<u64>,
}

impl Default for FontConfig {
    fn default() -> Self {
        let sources = FontFamilySources::default();
        Self {
            family: sources.family,
            regular: sources.regular,
            bold: sources.bold,
            base_dir: None,
            fetch_timeout_ms: None,
        }
    }
}

/// Export option defaults. Unset fields fall through to the built-in
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    pub filename: Option<String>,
    pub orientation: Option<Orientation>,
    pub unit: Option<Unit>,
    pub page_format: Option<PageFormat>,
    pub margin: Option<f32>,
    pub raster_scale: Option<f32>,
    pub background_color: Option<Color>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Header details printed on every report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl EngineConfig {
    /// Loads `path` (if given) and layers `FOLIO_*` environment variables
    /// on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ExportError> {
        Self::load_layered(path, Self::environment())
    }

    fn load_layered(path: Option<&Path>, environment: config::Environment) -> Result<Self, ExportError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(environment);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Parses a TOML document, without consulting the environment.
    pub fn from_toml_str(source: &str) -> Result<Self, ExportError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn font_sources(&self) -> FontFamilySources {
        FontFamilySources::new(&self.fonts.family, &self.fonts.regular, &self.fonts.bold)
    }

    pub fn registry_config(&self) -> FontRegistryConfig {
        FontRegistryConfig {
            fetch_timeout: self.fonts.fetch_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn default_options(&self) -> PartialExportOptions {
        let export = &self.export;
        PartialExportOptions {
            filename: export.filename.clone(),
            orientation: export.orientation,
            unit: export.unit,
            page_format: export.page_format,
            margin: export.margin,
            raster_scale: export.raster_scale,
            background_color: export.background_color,
        }
    }

    /// Applies the configured company details to `meta`, keeping any that
    /// `meta` already carries.
    pub fn apply_company(&self, mut meta: ReportMeta) -> ReportMeta {
        let company = &self.company;
        meta.company_name = meta.company_name.or_else(|| company.name.clone());
        meta.company_address = meta.company_address.or_else(|| company.address.clone());
        meta.company_phone = meta.company_phone.or_else(|| company.phone.clone());
        meta.company_email = meta.company_email.or_else(|| company.email.clone());
        meta
    }
}
