//! The capture capability the rasterization pipeline is written against.
//!
//! A surface owns already-rendered visual nodes; the engine only asks it to
//! settle pending layout and to capture a node as pixels.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Node is not attached to a rendering surface: {0}")]
    Detached(String),

    #[error("Node has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("Failed to decode node content: {0}")]
    Decode(String),

    #[error("Capture of {width}x{height} pixels exceeds the {limit} pixel limit")]
    TooLarge { width: u64, height: u64, limit: u64 },

    #[error("Cannot capture an empty node list")]
    NothingToCapture,

    #[error("Capture failed: {0}")]
    Other(String),
}

/// One screenshot of a visual node, as straight (non-premultiplied) RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wraps an RGBA8 buffer. The buffer must hold exactly
    /// `width * height * 4` bytes and both dimensions must be non-zero.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(CaptureError::Decode(format!(
                "expected {} bytes of RGBA data for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// A rendering surface the rasterizer can capture from.
#[async_trait]
pub trait RasterSurface: Send + Sync {
    type Node: Send + Sync;

    /// Resolves once a full layout/paint cycle has completed after the last
    /// mutation of the surface. Capture never starts before this returns.
    async fn settle(&self) -> Result<(), CaptureError>;

    /// Captures `node` at `scale` times its natural resolution.
    async fn capture(&self, node: &Self::Node, scale: f32) -> Result<RasterImage, CaptureError>;

    /// Mounts `nodes` one below the other in a single offscreen container
    /// and returns the container.
    async fn mount(&self, nodes: Vec<Self::Node>) -> Result<Self::Node, CaptureError>;
}
