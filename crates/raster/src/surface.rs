//! A rendering surface over plain bitmaps.
//!
//! Nodes are images: encoded files (PNG, JPEG, GIF) or RGBA buffers. Mounting
//! stacks nodes top to bottom in one container; the surface refuses to
//! capture until it has settled after the latest mount.

use async_trait::async_trait;
use folio_traits::{CaptureError, RasterImage, RasterSurface};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
enum NodeContent {
    Encoded(Arc<Vec<u8>>),
    Bitmap(Arc<RasterImage>),
    Stack(Vec<ImageNode>),
}

/// A visual node a [`BitmapSurface`] can capture.
#[derive(Debug, Clone)]
pub struct ImageNode {
    label: String,
    content: NodeContent,
    attached: bool,
    /// Mount generation of a stacked container; 0 for plain nodes.
    generation: u64,
}

impl ImageNode {
    /// A node backed by an encoded image file.
    pub fn encoded(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(label, NodeContent::Encoded(Arc::new(bytes)))
    }

    pub fn bitmap(label: impl Into<String>, image: RasterImage) -> Self {
        Self::new(label, NodeContent::Bitmap(Arc::new(image)))
    }

    /// Reads an image file into a node.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CaptureError::Detached(format!("{}: {}", path.display(), e)))?;
        Ok(Self::encoded(path.display().to_string(), bytes))
    }

    fn new(label: impl Into<String>, content: NodeContent) -> Self {
        Self {
            label: label.into(),
            content,
            attached: true,
            generation: 0,
        }
    }

    /// The same node, removed from its surface.
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn decode(&self) -> Result<RgbaImage, CaptureError> {
        if !self.attached {
            return Err(CaptureError::Detached(self.label.clone()));
        }
        match &self.content {
            NodeContent::Encoded(bytes) => image::load_from_memory(bytes)
                .map(|img| img.to_rgba8())
                .map_err(|e| CaptureError::Decode(format!("{}: {}", self.label, e))),
            NodeContent::Bitmap(bitmap) => {
                RgbaImage::from_raw(bitmap.width(), bitmap.height(), bitmap.pixels().to_vec())
                    .ok_or_else(|| CaptureError::Decode(self.label.clone()))
            }
            NodeContent::Stack(children) => {
                let layers = children
                    .iter()
                    .map(ImageNode::decode)
                    .collect::<Result<Vec<_>, _>>()?;
                let width = layers.iter().map(|l| l.width()).max().unwrap_or(0);
                let height = layers.iter().map(|l| l.height()).sum();
                let mut canvas = RgbaImage::new(width, height);
                let mut top = 0i64;
                for layer in &layers {
                    imageops::overlay(&mut canvas, layer, 0, top);
                    top += layer.height() as i64;
                }
                Ok(canvas)
            }
        }
    }
}

/// Upper bound on the pixels of one capture, 512 MiB of RGBA.
const MAX_CAPTURE_PIXELS: u64 = 1 << 27;

fn scaled_dimensions(width: u32, height: u32, scale: f32) -> Result<(u32, u32), CaptureError> {
    let target_w = (width as f64 * scale as f64).round().max(1.0);
    let target_h = (height as f64 * scale as f64).round().max(1.0);
    if target_w > u32::MAX as f64
        || target_h > u32::MAX as f64
        || target_w * target_h > MAX_CAPTURE_PIXELS as f64
    {
        return Err(CaptureError::TooLarge {
            width: target_w as u64,
            height: target_h as u64,
            limit: MAX_CAPTURE_PIXELS,
        });
    }
    Ok((target_w as u32, target_h as u32))
}

/// Captures [`ImageNode`]s with the `image` crate.
#[derive(Debug, Default)]
pub struct BitmapSurface {
    mounted: AtomicU64,
    settled: AtomicU64,
}

impl BitmapSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RasterSurface for BitmapSurface {
    type Node = ImageNode;

    async fn settle(&self) -> Result<(), CaptureError> {
        // Give whatever else is scheduled a turn before declaring layout done
        tokio::task::yield_now().await;
        let mounted = self.mounted.load(Ordering::SeqCst);
        self.settled.fetch_max(mounted, Ordering::SeqCst);
        Ok(())
    }

    async fn capture(&self, node: &ImageNode, scale: f32) -> Result<RasterImage, CaptureError> {
        if node.generation > self.settled.load(Ordering::SeqCst) {
            return Err(CaptureError::Other(format!(
                "'{}' was captured before the surface settled",
                node.label
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CaptureError::Other(format!("invalid capture scale {}", scale)));
        }

        let decoded = node.decode()?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptureError::ZeroSize { width, height });
        }

        let scaled = if (scale - 1.0).abs() < f32::EPSILON {
            decoded
        } else {
            let (target_w, target_h) = scaled_dimensions(width, height, scale)?;
            DynamicImage::ImageRgba8(decoded)
                .resize_exact(target_w, target_h, FilterType::Triangle)
                .to_rgba8()
        };
        debug!(
            "Captured '{}' at {}x ({}x{})",
            node.label,
            scale,
            scaled.width(),
            scaled.height()
        );
        RasterImage::from_rgba(scaled.width(), scaled.height(), scaled.into_raw())
    }

    async fn mount(&self, nodes: Vec<ImageNode>) -> Result<ImageNode, CaptureError> {
        if nodes.is_empty() {
            return Err(CaptureError::NothingToCapture);
        }
        let generation = self.mounted.fetch_add(1, Ordering::SeqCst) + 1;
        let label = format!("container of {} nodes", nodes.len());
        let mut container = ImageNode::new(label, NodeContent::Stack(nodes));
        container.generation = generation;
        Ok(container)
    }
}
