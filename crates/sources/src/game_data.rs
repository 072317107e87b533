//! Raw game datasets: templates, locales, globals, credits and handbook.
//!
//! Every dataset is one JSON document named `{dataset}.json`, fetched
//! either over HTTP from a base URL or from a local directory.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use stash_core::globals::Globals;
use stash_core::handbook::Handbook;
use stash_core::locale::Locales;
use stash_core::template::TemplateCatalog;
use stash_core::types::Credits;

use crate::error::LoadError;

pub const TEMPLATES: &str = "items";
pub const LOCALES: &str = "locales";
pub const GLOBALS: &str = "globals";
pub const CREDITS: &str = "credits";
pub const HANDBOOK: &str = "handbook";

pub(crate) fn decode<T: DeserializeOwned>(dataset: &str, bytes: &[u8]) -> Result<T, LoadError> {
    serde_json::from_slice(bytes).map_err(|e| LoadError::decode(dataset, e))
}

/// Read access to the raw game datasets.
///
/// Implementors only provide [`fetch`](GameDataSource::fetch); the typed
/// accessors decode on top of it.
#[async_trait]
pub trait GameDataSource: Send + Sync {
    /// Raw bytes of one dataset.
    async fn fetch(&self, dataset: &str) -> Result<Vec<u8>, LoadError>;

    async fn templates(&self) -> Result<TemplateCatalog, LoadError> {
        decode(TEMPLATES, &self.fetch(TEMPLATES).await?)
    }

    async fn locales(&self) -> Result<Locales, LoadError> {
        decode(LOCALES, &self.fetch(LOCALES).await?)
    }

    async fn globals(&self) -> Result<Globals, LoadError> {
        decode(GLOBALS, &self.fetch(GLOBALS).await?)
    }

    async fn credits(&self) -> Result<Credits, LoadError> {
        decode(CREDITS, &self.fetch(CREDITS).await?)
    }

    async fn handbook(&self) -> Result<Handbook, LoadError> {
        decode(HANDBOOK, &self.fetch(HANDBOOK).await?)
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Fetches `GET {base_url}/{dataset}.json`.
pub struct HttpGameDataSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGameDataSource {
    /// Build a client with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dataset_url(&self, dataset: &str) -> String {
        format!("{}/{dataset}.json", self.base_url)
    }
}

#[async_trait]
impl GameDataSource for HttpGameDataSource {
    async fn fetch(&self, dataset: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.dataset_url(dataset);
        tracing::debug!(dataset, %url, "Fetching game data");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LoadError::HttpStatus {
                dataset: dataset.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Reads `{dir}/{dataset}.json`.
pub struct DirectoryGameDataSource {
    dir: PathBuf,
}

impl DirectoryGameDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl GameDataSource for DirectoryGameDataSource {
    async fn fetch(&self, dataset: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.dir.join(format!("{dataset}.json"));
        tokio::fs::read(&path)
            .await
            .map_err(|source| LoadError::Io { path, source })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
