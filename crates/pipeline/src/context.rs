//! Per-build state.
//!
//! Everything a build reads or mutates lives in one [`BuildContext`] that is
//! created when the inputs are loaded and dropped when the build ends.
//! Nothing is shared between builds.

use std::str::FromStr;

use stash_core::category::CategoryTree;
use stash_core::error::CoreError;
use stash_sources::BuildInputs;
use uuid::Uuid;

/// Default base of the per-item `link` field.
pub const DEFAULT_ITEM_LINK_BASE: &str = "https://tarkov.dev/item";

/// What a per-item assembly error does to the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemErrorPolicy {
    /// Log the error, leave the item out and keep going.
    #[default]
    SkipItem,
    /// Abort the whole build on the first item error.
    FailBuild,
}

impl FromStr for ItemErrorPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::SkipItem),
            "fail" => Ok(Self::FailBuild),
            other => Err(CoreError::Validation(format!(
                "unknown item error policy '{other}' (expected 'skip' or 'fail')"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Entries link to `{item_link_base}/{normalizedName}`.
    pub item_link_base: String,
    pub error_policy: ItemErrorPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            item_link_base: DEFAULT_ITEM_LINK_BASE.to_string(),
            error_policy: ItemErrorPolicy::default(),
        }
    }
}

/// Inputs, options and the two category trees of one build.
#[derive(Debug)]
pub struct BuildContext {
    pub build_id: Uuid,
    pub options: BuildOptions,
    pub inputs: BuildInputs,
    /// Engine taxonomy, grown while items are assembled.
    pub categories: CategoryTree,
    /// Handbook taxonomy, grown while items are assembled.
    pub handbook_categories: CategoryTree,
    pub(crate) warnings: usize,
}

impl BuildContext {
    pub fn new(build_id: Uuid, inputs: BuildInputs, options: BuildOptions) -> Self {
        Self {
            build_id,
            options,
            inputs,
            categories: CategoryTree::new(),
            handbook_categories: CategoryTree::new(),
            warnings: 0,
        }
    }

    /// Data-quality warnings raised so far.
    pub fn warnings(&self) -> usize {
        self.warnings
    }
}
