//! Snapshot output: remote key-value store, local dump and operator alerts.

pub mod alert;
pub mod dump;
pub mod error;
pub mod kv;
pub mod publisher;

pub use alert::WebhookAlerter;
pub use error::{AlertError, PublishError};
pub use kv::{CloudflareKv, InMemoryKv, KvResponse, KvStore};
pub use publisher::{PublishReport, SnapshotPublisher, DEFAULT_KEY};
