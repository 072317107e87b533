//! Pull-through access to the presets job output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use stash_core::preset::PresetsCache;

use crate::error::LoadError;
use crate::game_data::decode;

/// File name of the presets job output inside the cache directory.
pub const PRESETS_FILE: &str = "presets.json";

/// Runs the upstream presets job to completion.
#[async_trait]
pub trait PresetJobTrigger: Send + Sync {
    async fn trigger(&self) -> Result<(), LoadError>;
}

/// Triggers the job with a `POST` to its run endpoint and waits for the
/// response.
pub struct HttpPresetJobTrigger {
    client: reqwest::Client,
    url: String,
}

impl HttpPresetJobTrigger {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PresetJobTrigger for HttpPresetJobTrigger {
    async fn trigger(&self) -> Result<(), LoadError> {
        tracing::info!(url = %self.url, "Triggering presets job");
        let response = self.client.post(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::PresetJob(format!("job endpoint returned HTTP {status}")));
        }
        Ok(())
    }
}

/// Used when no job endpoint is configured; a cache miss then stays a miss.
pub struct NoopPresetJobTrigger;

#[async_trait]
impl PresetJobTrigger for NoopPresetJobTrigger {
    async fn trigger(&self) -> Result<(), LoadError> {
        tracing::warn!("No presets job configured, cannot rebuild presets");
        Ok(())
    }
}

/// Reads `{cache_dir}/presets.json`, rebuilding it once on a miss.
pub struct PresetStore {
    path: PathBuf,
    trigger: Box<dyn PresetJobTrigger>,
}

impl PresetStore {
    pub fn new(cache_dir: impl AsRef<Path>, trigger: Box<dyn PresetJobTrigger>) -> Self {
        Self {
            path: cache_dir.as_ref().join(PRESETS_FILE),
            trigger,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached presets, running the presets job first if the cache is
    /// absent or unreadable.
    pub async fn load(&self) -> Result<PresetsCache, LoadError> {
        match self.read().await {
            Ok(cache) => return Ok(cache),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Presets cache miss, running presets job");
            }
        }
        self.trigger.trigger().await?;
        self.read().await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Presets cache still unreadable");
            LoadError::PresetsUnavailable
        })
    }

    async fn read(&self) -> Result<PresetsCache, LoadError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        decode("presets", &bytes)
    }
}
