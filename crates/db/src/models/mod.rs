//! Row structs for the tables this crate reads.

pub mod item_data;
