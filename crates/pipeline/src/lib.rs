//! Build orchestration for the item catalog.
//!
//! A build loads every input through `stash-sources`, assembles the
//! snapshot in a single pass over a per-build [`BuildContext`], and hands it
//! to `stash-publish`. [`CatalogBuilder::run`] drives one build and reports
//! its outcome as a [`BuildReport`].

pub mod assembler;
pub mod build;
pub mod context;
pub mod error;
pub mod report;

pub use assembler::assemble;
pub use build::{BuildSources, CatalogBuilder, SCHEMA_KEY};
pub use context::{BuildContext, BuildOptions, ItemErrorPolicy, DEFAULT_ITEM_LINK_BASE};
pub use error::BuildError;
pub use report::{BuildReport, BuildStatus, BuildTimings};
