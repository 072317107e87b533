//! Persisted item overrides accessor.

use async_trait::async_trait;
use sqlx::PgPool;
use stash_core::overrides::{ItemOverride, OverrideMap};
use stash_db::repositories::ItemDataRepo;

use crate::error::LoadError;

/// Ordered id -> override map for the whole catalog.
#[async_trait]
pub trait OverrideSource: Send + Sync {
    async fn get_all(&self) -> Result<OverrideMap, LoadError>;
}

/// Backed by the `item_data` table.
pub struct PgOverrideSource {
    pool: PgPool,
}

impl PgOverrideSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OverrideSource for PgOverrideSource {
    async fn get_all(&self) -> Result<OverrideMap, LoadError> {
        let rows = ItemDataRepo::list_all(&self.pool).await?;
        tracing::debug!(count = rows.len(), "Loaded item overrides");
        Ok(rows
            .into_iter()
            .map(|row| {
                let o = ItemOverride::from(row);
                (o.id.clone(), o)
            })
            .collect())
    }
}

/// Fixed set of overrides, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOverrideSource {
    overrides: OverrideMap,
}

impl InMemoryOverrideSource {
    pub fn new(overrides: impl IntoIterator<Item = ItemOverride>) -> Self {
        Self {
            overrides: overrides.into_iter().map(|o| (o.id.clone(), o)).collect(),
        }
    }
}

#[async_trait]
impl OverrideSource for InMemoryOverrideSource {
    async fn get_all(&self) -> Result<OverrideMap, LoadError> {
        Ok(self.overrides.clone())
    }
}
