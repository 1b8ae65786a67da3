//! Taxonomy sources
//!
//! A source produces one block of taxonomy text. The store fetches its
//! sources in order and concatenates the blocks.

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use crate::error::LoadError;

/// Anything that can produce a block of taxonomy CSV text.
///
/// Implementations must be Send + Sync for use in async contexts.
#[async_trait]
pub trait TaxonomySource: Send + Sync {
    /// Short description for logs and errors (a URL, a path, a label)
    fn describe(&self) -> String;

    /// Fetch the full text of this source
    async fn fetch(&self) -> Result<String, LoadError>;
}

/// Taxonomy text served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl TaxonomySource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        debug!(url = %self.url, "Fetching taxonomy source");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| LoadError::Fetch {
                origin: self.describe(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                origin: self.describe(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| LoadError::Fetch {
            origin: self.describe(),
            reason: e.to_string(),
        })
    }
}

/// Taxonomy text on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TaxonomySource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        debug!(path = %self.path.display(), "Reading taxonomy source");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| LoadError::Io {
                path: self.path.clone(),
                error,
            })
    }
}

/// Taxonomy text already in memory
#[derive(Debug, Clone)]
pub struct InlineSource {
    label: String,
    text: String,
}

impl InlineSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl TaxonomySource for InlineSource {
    fn describe(&self) -> String {
        format!("inline:{}", self.label)
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        Ok(self.text.clone())
    }
}
