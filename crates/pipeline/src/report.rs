//! Outcome of one build.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    /// Snapshot dumped and accepted by the remote store.
    Published,
    /// Snapshot dumped locally, remote write failed; the previous snapshot stays live.
    ComputedButUnpublished,
    /// Nothing was published.
    Failed,
}

/// Wall-clock milliseconds per phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildTimings {
    pub load_ms: u64,
    pub assemble_ms: u64,
    pub publish_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub build_id: Uuid,
    pub status: BuildStatus,
    pub item_count: usize,
    pub warnings: usize,
    pub timings: BuildTimings,
    /// Why the build failed or the publish did not go through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BuildReport {
    pub(crate) fn started(build_id: Uuid) -> Self {
        Self {
            build_id,
            status: BuildStatus::Failed,
            item_count: 0,
            warnings: 0,
            timings: BuildTimings::default(),
            error: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == BuildStatus::Published
    }
}
