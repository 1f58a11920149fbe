//! Where finished documents go.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("Invalid download filename: {0}")]
    InvalidFilename(String),

    #[error("Failed to deliver '{filename}': {message}")]
    Failed { filename: String, message: String },
}

/// Receives a finished document under its resolved filename.
///
/// A sink either delivers the whole document or nothing: implementations
/// must not leave a partially written file behind on failure.
#[async_trait]
pub trait DownloadSink: Send + Sync + Debug {
    async fn deliver(&self, filename: &str, bytes: Vec<u8>) -> Result<(), DeliveryError>;

    /// Returns a human-readable name for this sink (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Collects delivered documents in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Default::default()
    }

    /// Drains and returns everything delivered so far, oldest first.
    pub fn take(&self) -> Vec<(String, Vec<u8>)> {
        self.delivered
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.delivered.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DownloadSink for MemorySink {
    async fn deliver(&self, filename: &str, bytes: Vec<u8>) -> Result<(), DeliveryError> {
        let mut delivered = self.delivered.lock().map_err(|_| DeliveryError::Failed {
            filename: filename.to_string(),
            message: "memory sink lock poisoned".to_string(),
        })?;
        delivered.push((filename.to_string(), bytes));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MemorySink"
    }
}
