//! Where font binaries come from.
//!
//! The font registry only knows how to ask a fetcher for the bytes behind a
//! source string (a URL, a relative path, a key); fetchers decide how.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Font source not found: {0}")]
    NotFound(String),

    #[error("Failed to load '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Not a usable font: {0}")]
    InvalidFormat(String),

    #[error("Timed out loading '{0}'")]
    TimedOut(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(e: std::io::Error) -> Self {
        ResourceError::Io(e.to_string())
    }
}

/// Font bytes, shared between the cache and every document embedding them.
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads the binary behind a font source.
///
/// # Implementations
///
/// - `HttpFontFetcher`: remote URLs (folio-resource)
/// - `FilesystemFontFetcher`: paths below a base directory (folio-resource)
/// - [`InMemoryFontFetcher`]: pre-populated memory (always available)
#[async_trait]
pub trait FontFetcher: Send + Sync + Debug {
    async fn fetch(&self, source: &str) -> Result<SharedResourceData, ResourceError>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}

/// Serves fonts registered up front from memory.
///
/// Every call to [`FontFetcher::fetch`] is counted, hit or miss, which
/// makes this the fetcher of choice for checking how often a registry
/// actually goes to its source.
#[derive(Debug, Default)]
pub struct InMemoryFontFetcher {
    fonts: RwLock<HashMap<String, SharedResourceData>>,
    fetches: AtomicUsize,
}

impl InMemoryFontFetcher {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers `data` under `source`, replacing what was there.
    pub fn add(&self, source: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let source = source.into();
        let mut fonts = self.fonts.write().map_err(|_| poisoned(&source))?;
        fonts.insert(source, Arc::new(data));
        Ok(())
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn poisoned(source: &str) -> ResourceError {
    ResourceError::LoadFailed {
        path: source.to_string(),
        message: "in-memory font store lock poisoned".to_string(),
    }
}

#[async_trait]
impl FontFetcher for InMemoryFontFetcher {
    async fn fetch(&self, source: &str) -> Result<SharedResourceData, ResourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let fonts = self.fonts.read().map_err(|_| poisoned(source))?;
        fonts
            .get(source)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(source.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryFontFetcher"
    }
}
