//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod item_data_repo;

pub use item_data_repo::ItemDataRepo;
