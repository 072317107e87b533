//! Pure domain layer of the item catalog engine.
//!
//! Everything here is synchronous and free of I/O: the raw game data
//! models, the two category trees, the ordered property deriver, the
//! preset aggregation calculator, trader pricing, and the snapshot types
//! that the pipeline assembles and publishes.

pub mod category;
pub mod error;
pub mod globals;
pub mod handbook;
pub mod locale;
pub mod naming;
pub mod overrides;
pub mod preset;
pub mod properties;
pub mod snapshot;
pub mod taxonomy;
pub mod template;
pub mod traders;
pub mod types;
