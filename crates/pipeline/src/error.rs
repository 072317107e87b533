use stash_core::error::CoreError;
use stash_core::types::ItemId;
use stash_publish::PublishError;
use stash_sources::LoadError;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load build inputs: {0}")]
    Load(#[from] LoadError),

    #[error("Item {id} could not be assembled: {source}")]
    Item {
        id: ItemId,
        #[source]
        source: CoreError,
    },

    #[error("Failed to write snapshot: {0}")]
    Dump(#[source] PublishError),
}
