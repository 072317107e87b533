//! Build input loading.
//!
//! [`load_inputs`] fetches every dataset a build needs concurrently and
//! fails fast on the first error.

pub mod error;
pub mod game_data;
pub mod overrides;
pub mod presets;

use stash_core::globals::Globals;
use stash_core::handbook::Handbook;
use stash_core::locale::Locales;
use stash_core::overrides::{live_ids, OverrideMap};
use stash_core::preset::PresetsCache;
use stash_core::template::TemplateCatalog;
use stash_core::types::Credits;

pub use error::LoadError;
pub use game_data::{DirectoryGameDataSource, GameDataSource, HttpGameDataSource};
pub use overrides::{InMemoryOverrideSource, OverrideSource, PgOverrideSource};
pub use presets::{HttpPresetJobTrigger, NoopPresetJobTrigger, PresetJobTrigger, PresetStore};

/// Everything one build reads, owned for the duration of the build.
#[derive(Debug, Clone, Default)]
pub struct BuildInputs {
    pub templates: TemplateCatalog,
    pub locales: Locales,
    pub globals: Globals,
    pub credits: Credits,
    pub handbook: Handbook,
    /// Only presets that have a live override.
    pub presets: PresetsCache,
    pub overrides: OverrideMap,
}

/// Fetch all inputs concurrently.
pub async fn load_inputs(
    game: &dyn GameDataSource,
    presets: &PresetStore,
    overrides: &dyn OverrideSource,
) -> Result<BuildInputs, LoadError> {
    let (templates, locales, globals, credits, handbook, mut presets, overrides) = tokio::try_join!(
        game.templates(),
        game.locales(),
        game.globals(),
        game.credits(),
        game.handbook(),
        presets.load(),
        overrides.get_all(),
    )?;

    let live = live_ids(&overrides);
    let before = presets.presets.len();
    presets.retain(|id| live.contains(id));
    if presets.presets.len() < before {
        tracing::debug!(dropped = before - presets.presets.len(), "Dropped presets without a live override");
    }

    tracing::info!(
        templates = templates.len(),
        languages = locales.codes().len(),
        presets = presets.presets.len(),
        overrides = overrides.len(),
        "Build inputs loaded"
    );

    Ok(BuildInputs {
        templates,
        locales,
        globals,
        credits,
        handbook,
        presets,
        overrides,
    })
}
