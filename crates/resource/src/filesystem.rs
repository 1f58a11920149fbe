//! Filesystem-based font fetcher for native platforms.
//!
//! Font sources are resolved relative to a base directory. Resolved paths
//! must stay inside that directory (no `../../etc/passwd`).

use async_trait::async_trait;
use folio_traits::{FontFetcher, ResourceError, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemFontFetcher {
    base_path: PathBuf,
    /// Canonicalized base path for security checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemFontFetcher {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Returns `None` if the path would escape the base directory.
    fn resolve_path_safe(&self, source: &str) -> Option<PathBuf> {
        let relative = source.strip_prefix("file://").unwrap_or(source);
        if Path::new(relative).is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(relative);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        // File doesn't exist (yet): fall back to a component check
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        Some(full_path)
    }
}

#[async_trait]
impl FontFetcher for FilesystemFontFetcher {
    async fn fetch(&self, source: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self.resolve_path_safe(source).ok_or_else(|| {
            ResourceError::NotFound(format!("{} (path traversal blocked)", source))
        })?;

        tokio::fs::read(&full_path).await.map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(source.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: source.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn name(&self) -> &'static str {
        "FilesystemFontFetcher"
    }
}
