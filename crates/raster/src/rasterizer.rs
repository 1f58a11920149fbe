use crate::error::RasterError;
use crate::pdf::write_tiled_pdf;
use crate::tiling::{TilePlan, plan_tiles};
use folio_render_lopdf::RenderError;
use folio_traits::RasterSurface;
use folio_types::ExportOptions;
use log::{debug, info};

/// Captures visual nodes and tiles them into PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Captures `node` once and tiles it over as many pages as it needs.
    ///
    /// The page configuration is checked before anything is captured, and
    /// capture only starts after the surface has settled.
    pub async fn export<S>(
        &self,
        surface: &S,
        node: &S::Node,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, RasterError>
    where
        S: RasterSurface + ?Sized,
    {
        let geometry = options.geometry();
        TilePlan::for_content(geometry.content_width(), 0.0, &geometry)?;

        surface.settle().await?;
        let image = surface.capture(node, options.raster_scale).await?;
        let plan = plan_tiles(image.width(), image.height(), &geometry)?;
        debug!(
            "Captured {}x{} px at scale {}; content is {:.1}x{:.1}pt",
            image.width(),
            image.height(),
            options.raster_scale,
            plan.content_width,
            plan.content_height
        );

        let pages = plan.page_count();
        let background = options.background_color;
        let bytes = tokio::task::spawn_blocking(move || {
            write_tiled_pdf(&image, &plan, &geometry, background)
        })
        .await
        .map_err(|e| RasterError::Serialization(RenderError::Task(e.to_string())))??;

        info!("Rasterized export: {} pages, {} bytes", pages, bytes.len());
        Ok(bytes)
    }

    /// Mounts `nodes` into one container and exports it as a single capture.
    pub async fn export_many<S>(
        &self,
        surface: &S,
        nodes: Vec<S::Node>,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, RasterError>
    where
        S: RasterSurface + ?Sized,
    {
        let count = nodes.len();
        let container = surface.mount(nodes).await?;
        debug!("Mounted {} nodes for bulk capture", count);
        self.export(surface, &container, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{BitmapSurface, ImageNode};
    use async_trait::async_trait;
    use folio_traits::{CaptureError, RasterImage};
    use folio_types::{PageFormat, Unit};
    use lopdf::Document;
    use std::sync::Mutex;

    /// Records the order of surface calls and returns a fixed image.
    struct RecordingSurface {
        width: u32,
        height: u32,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RasterSurface for RecordingSurface {
        type Node = ();

        async fn settle(&self) -> Result<(), CaptureError> {
            self.calls.lock().unwrap().push("settle".into());
            Ok(())
        }

        async fn capture(&self, _node: &(), scale: f32) -> Result<RasterImage, CaptureError> {
            self.calls.lock().unwrap().push(format!("capture@{}", scale));
            let pixels = vec![255; (self.width * self.height * 4) as usize];
            RasterImage::from_rgba(self.width, self.height, pixels)
        }

        async fn mount(&self, nodes: Vec<()>) -> Result<(), CaptureError> {
            self.calls.lock().unwrap().push(format!("mount:{}", nodes.len()));
            Ok(())
        }
    }

    fn pt_options(width: f32, height: f32, margin: f32) -> ExportOptions {
        ExportOptions {
            unit: Unit::Pt,
            page_format: PageFormat::Custom { width, height },
            margin,
            ..ExportOptions::default()
        }
    }

    #[tokio::test]
    async fn test_single_capture_for_multi_page_output() {
        // 980pt wide content; 100x255 px becomes 2499pt tall
        let surface = RecordingSurface::new(100, 255);
        let options = pt_options(1000.0, 1000.0, 10.0);
        let bytes = Rasterizer::new().export(&surface, &(), &options).await.unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert_eq!(surface.calls(), vec!["settle", "capture@2"]);
    }

    #[tokio::test]
    async fn test_configuration_error_before_capture() {
        let surface = RecordingSurface::new(10, 10);
        let options = pt_options(200.0, 300.0, 150.0);
        let err = Rasterizer::new().export(&surface, &(), &options).await.unwrap_err();
        assert!(matches!(err, RasterError::Configuration(_)));
        assert!(surface.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_export_mounts_then_settles() {
        let surface = RecordingSurface::new(10, 10);
        let options = pt_options(200.0, 300.0, 10.0);
        Rasterizer::new()
            .export_many(&surface, vec![(), (), ()], &options)
            .await
            .unwrap();
        assert_eq!(surface.calls(), vec!["mount:3", "settle", "capture@2"]);
    }

    #[tokio::test]
    async fn test_bulk_export_with_bitmap_surface() {
        let surface = BitmapSurface::new();
        let receipt = |shade: u8| {
            ImageNode::bitmap(
                format!("receipt {}", shade),
                RasterImage::from_rgba(40, 60, [shade, shade, shade, 255].repeat(40 * 60)).unwrap(),
            )
        };
        let options = ExportOptions {
            raster_scale: 1.0,
            ..pt_options(200.0, 150.0, 10.0)
        };
        let bytes = Rasterizer::new()
            .export_many(&surface, vec![receipt(10), receipt(120), receipt(240)], &options)
            .await
            .unwrap();

        // 40x180 px at 180pt wide is 810pt tall over 130pt pages
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 7);
    }

    #[tokio::test]
    async fn test_detached_node_fails_without_output() {
        let surface = BitmapSurface::new();
        let node = ImageNode::bitmap("x", RasterImage::from_rgba(1, 1, vec![0; 4]).unwrap()).detached();
        let err = Rasterizer::new()
            .export(&surface, &node, &ExportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RasterError::Capture(CaptureError::Detached(_))));
    }
}
