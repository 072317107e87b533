//! Snapshot publication: local dump first, then one full-replace write.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use stash_core::snapshot::CatalogSnapshot;

use crate::dump::write_dump;
use crate::error::PublishError;
use crate::kv::KvStore;

/// Key the snapshot is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "item_data";

/// What happened to one snapshot.
#[derive(Debug)]
pub struct PublishReport {
    pub dump_path: PathBuf,
    pub bytes: usize,
    /// `None` when the remote write succeeded.
    pub remote_error: Option<PublishError>,
}

impl PublishReport {
    pub fn published(&self) -> bool {
        self.remote_error.is_none()
    }
}

pub struct SnapshotPublisher {
    kv: Arc<dyn KvStore>,
    key: String,
    dump_dir: PathBuf,
}

impl SnapshotPublisher {
    pub fn new(kv: Arc<dyn KvStore>, key: impl Into<String>, dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            kv,
            key: key.into(),
            dump_dir: dump_dir.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Dump the snapshot locally, then replace the remote value.
    ///
    /// Only serialization and dump failures are errors; a failed remote
    /// write is logged in full and returned in the report.
    pub async fn publish(&self, snapshot: &CatalogSnapshot) -> Result<PublishReport, PublishError> {
        let report = self.publish_value(&self.key, snapshot).await?;
        if report.published() {
            tracing::info!(key = %self.key, items = snapshot.data.len(), "Catalog snapshot live");
        }
        Ok(report)
    }

    /// Same dump-then-put sequence for any value under any key. The dump
    /// holds exactly the bytes sent to the store.
    pub async fn publish_value<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<PublishReport, PublishError> {
        let body = serde_json::to_vec(value)?;
        let dump_path = write_dump(&self.dump_dir, key, &body).await?;
        let bytes = body.len();

        let remote = match self.kv.put(key, body).await {
            Ok(response) => response.into_result(),
            Err(e) => Err(e),
        };
        let remote_error = match remote {
            Ok(()) => {
                tracing::info!(key, bytes, "Value published");
                None
            }
            Err(e) => {
                log_failure(key, &e);
                Some(e)
            }
        };

        Ok(PublishReport {
            dump_path,
            bytes,
            remote_error,
        })
    }
}

fn log_failure(key: &str, error: &PublishError) {
    match error {
        PublishError::Rejected { errors, messages } => {
            for e in errors {
                tracing::error!(key, error = %e, "KV store error");
            }
            for m in messages {
                tracing::error!(key, message = %m, "KV store message");
            }
            tracing::error!(key, "Snapshot publish was rejected");
        }
        other => tracing::error!(key, error = %other, "Snapshot publish failed"),
    }
}
