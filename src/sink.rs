//! Filesystem delivery.

use async_trait::async_trait;
use folio_traits::{DeliveryError, DownloadSink};
use log::debug;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes documents into a directory.
///
/// Each document is written to a temporary file in the target directory and
/// renamed into place, so readers never observe a partial PDF. The temporary
/// file is removed if anything fails.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves `filename` inside the sink directory. Only bare file names
    /// are accepted.
    pub fn target_path(&self, filename: &str) -> Result<PathBuf, DeliveryError> {
        let trimmed = filename.trim();
        let bare = Path::new(trimmed)
            .file_name()
            .is_some_and(|name| name == trimmed);
        if trimmed.is_empty() || !bare || trimmed.contains(['/', '\\']) {
            return Err(DeliveryError::InvalidFilename(filename.to_string()));
        }
        Ok(self.dir.join(trimmed))
    }
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, filename: &str, bytes: Vec<u8>) -> Result<(), DeliveryError> {
        let target = self.target_path(filename)?;
        let dir = self.dir.clone();
        let failed = |message: String| DeliveryError::Failed {
            filename: filename.to_string(),
            message,
        };

        let written = target.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &written, &bytes))
            .await
            .map_err(|e| failed(e.to_string()))?
            .map_err(|e| failed(e.to_string()))?;

        debug!("Delivered {}", target.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "DirectorySink"
    }
}
