//! Remote fonts over HTTP(S).

use async_trait::async_trait;
use folio_traits::{FontFetcher, ResourceError, SharedResourceData};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct HttpFontFetcher {
    client: reqwest::Client,
}

impl HttpFontFetcher {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FontFetcher for HttpFontFetcher {
    async fn fetch(&self, source: &str) -> Result<SharedResourceData, ResourceError> {
        let load_failed = |message: String| ResourceError::LoadFailed {
            path: source.to_string(),
            message,
        };

        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| load_failed(e.to_string()))?;

        if let Some(err) = status_error(source, response.status()) {
            return Err(err);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| load_failed(e.to_string()))?;
        Ok(Arc::new(bytes.to_vec()))
    }

    fn name(&self) -> &'static str {
        "HttpFontFetcher"
    }
}

/// The error a non-2xx response maps to; `None` for success.
fn status_error(source: &str, status: StatusCode) -> Option<ResourceError> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        Some(ResourceError::NotFound(source.to_string()))
    } else {
        Some(ResourceError::LoadFailed {
            path: source.to_string(),
            message: format!("HTTP status {}", status),
        })
    }
}
