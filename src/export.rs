//! The two export pipelines behind one entry point.

use crate::config::EngineConfig;
use crate::error::ExportError;
use folio_normalize::{DefaultFormatter, Formatter};
use folio_raster::{BitmapSurface, Rasterizer};
use folio_render_lopdf::{ReportMeta, render_report_document};
use folio_resource::{
    FilesystemFontFetcher, FontFamily, FontFamilySources, FontFetcher, FontRegistry,
    FontRegistryConfig, HttpFontFetcher,
};
use folio_sections::build_sections_from_value;
use folio_traits::{DownloadSink, RasterSurface};
use folio_types::{ExportOptions, PartialExportOptions};
use log::{debug, info};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Runs exports and hands the finished documents to a [`DownloadSink`].
///
/// One `Exporter` is one session: the font registry it holds is shared by
/// every report export it runs, so fonts are fetched at most once.
pub struct Exporter<S: RasterSurface = BitmapSurface> {
    registry: Arc<FontRegistry>,
    surface: Arc<S>,
    sink: Arc<dyn DownloadSink>,
    formatter: Arc<dyn Formatter>,
    defaults: PartialExportOptions,
    rasterizer: Rasterizer,
}

impl<S: RasterSurface> fmt::Debug for Exporter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("registry", &self.registry)
            .field("sink", &self.sink.name())
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl Exporter<BitmapSurface> {
    pub fn builder() -> ExporterBuilder<BitmapSurface> {
        ExporterBuilder::new()
    }
}

impl<S: RasterSurface> Exporter<S> {
    pub fn registry(&self) -> &Arc<FontRegistry> {
        &self.registry
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Fills in unset fields from the configured defaults and rejects
    /// unusable values.
    pub fn resolve_options(&self, options: PartialExportOptions) -> Result<ExportOptions, ExportError> {
        let resolved = self.defaults.clone().merged_with(options).resolve();
        resolved.validate()?;
        Ok(resolved)
    }

    /// Captures `node` once, tiles it over as many pages as needed and
    /// delivers the result.
    pub async fn export_visual_node(
        &self,
        node: &S::Node,
        options: PartialExportOptions,
    ) -> Result<(), ExportError> {
        let options = self.resolve_options(options)?;
        let bytes = self.rasterizer.export(self.surface.as_ref(), node, &options).await?;
        self.deliver(&options.filename, bytes).await
    }

    /// Exports several nodes stacked into one document with a single capture.
    pub async fn export_visual_nodes(
        &self,
        nodes: Vec<S::Node>,
        options: PartialExportOptions,
    ) -> Result<(), ExportError> {
        let options = self.resolve_options(options)?;
        let bytes = self
            .rasterizer
            .export_many(self.surface.as_ref(), nodes, &options)
            .await?;
        self.deliver(&options.filename, bytes).await
    }

    /// Builds the report document for `bundle` and delivers it.
    pub async fn export_report_bundle(
        &self,
        bundle: &Value,
        meta: &ReportMeta,
        options: PartialExportOptions,
    ) -> Result<(), ExportError> {
        let options = self.resolve_options(options)?;
        let bytes = self.render_report(bundle, meta, &options).await?;
        self.deliver(&options.filename, bytes).await
    }

    /// Builds the report document for `bundle` without delivering it.
    pub async fn build_report(
        &self,
        bundle: &Value,
        meta: &ReportMeta,
        options: PartialExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let options = self.resolve_options(options)?;
        self.render_report(bundle, meta, &options).await
    }

    /// Registers the report fonts ahead of the first export.
    pub async fn preload_fonts(&self) -> Result<Arc<FontFamily>, ExportError> {
        Ok(self.registry.ensure_fonts_registered().await?)
    }

    async fn render_report(
        &self,
        bundle: &Value,
        meta: &ReportMeta,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let sections = build_sections_from_value(bundle, self.formatter.as_ref());
        debug!(
            "Built {} sections for kinds {:?}",
            sections.len(),
            sections.kinds()
        );
        let bytes = render_report_document(
            &self.registry,
            Arc::new(sections),
            meta.clone(),
            options.geometry(),
        )
        .await?;
        Ok(bytes)
    }

    async fn deliver(&self, filename: &str, bytes: Vec<u8>) -> Result<(), ExportError> {
        let size = bytes.len();
        self.sink.deliver(filename, bytes).await?;
        info!("Exported '{}' ({} bytes) via {}", filename, size, self.sink.name());
        Ok(())
    }
}

/// Builder for an [`Exporter`].
///
/// Only the sink is required. Fonts default to the built-in family loaded
/// over HTTP and captures go to a [`BitmapSurface`].
pub struct ExporterBuilder<S: RasterSurface = BitmapSurface> {
    surface: Arc<S>,
    sink: Option<Arc<dyn DownloadSink>>,
    fetcher: Option<Arc<dyn FontFetcher>>,
    sources: FontFamilySources,
    registry_config: FontRegistryConfig,
    registry: Option<Arc<FontRegistry>>,
    formatter: Arc<dyn Formatter>,
    defaults: PartialExportOptions,
}

impl Default for ExporterBuilder<BitmapSurface> {
    fn default() -> Self {
        Self {
            surface: Arc::new(BitmapSurface::new()),
            sink: None,
            fetcher: None,
            sources: FontFamilySources::default(),
            registry_config: FontRegistryConfig::default(),
            registry: None,
            formatter: Arc::new(DefaultFormatter::default()),
            defaults: PartialExportOptions::default(),
        }
    }
}

impl ExporterBuilder<BitmapSurface> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts from a loaded [`EngineConfig`]: font sources, fetch timeout,
    /// option defaults, and a filesystem fetcher when `fonts.base_dir` is set.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut builder = Self::new()
            .with_font_sources(config.font_sources())
            .with_default_options(config.default_options());
        builder.registry_config = config.registry_config();
        if let Some(dir) = &config.fonts.base_dir {
            builder = builder.with_font_fetcher(Arc::new(FilesystemFontFetcher::new(dir)));
        }
        builder
    }
}

impl<S: RasterSurface> ExporterBuilder<S> {
    /// Swaps the capture surface, e.g. for a platform-specific one.
    pub fn with_surface<T: RasterSurface>(self, surface: Arc<T>) -> ExporterBuilder<T> {
        ExporterBuilder {
            surface,
            sink: self.sink,
            fetcher: self.fetcher,
            sources: self.sources,
            registry_config: self.registry_config,
            registry: self.registry,
            formatter: self.formatter,
            defaults: self.defaults,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DownloadSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_font_fetcher(mut self, fetcher: Arc<dyn FontFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_font_sources(mut self, sources: FontFamilySources) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.registry_config.fetch_timeout = Some(timeout);
        self
    }

    /// Shares an existing registry (and its cache) instead of creating one.
    /// Fetcher, sources and timeout settings are then ignored.
    pub fn with_font_registry(mut self, registry: Arc<FontRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Defaults applied under every call's own options.
    pub fn with_default_options(mut self, defaults: PartialExportOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn build(self) -> Result<Exporter<S>, ExportError> {
        let sink = self.sink.ok_or_else(|| {
            ExportError::Configuration(
                "No download sink has been configured. Use `with_sink`.".to_string(),
            )
        })?;
        // Surface defaults early so a broken config fails here, not mid-export
        self.defaults.clone().resolve().validate()?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => {
                let fetcher = self
                    .fetcher
                    .unwrap_or_else(|| Arc::new(HttpFontFetcher::new()));
                debug!(
                    "Creating font registry for '{}' using {}",
                    self.sources.family,
                    fetcher.name()
                );
                Arc::new(FontRegistry::with_config(
                    fetcher,
                    self.sources,
                    self.registry_config,
                ))
            }
        };

        Ok(Exporter {
            registry,
            surface: self.surface,
            sink,
            formatter: self.formatter,
            defaults: self.defaults,
            rasterizer: Rasterizer::new(),
        })
    }
}
