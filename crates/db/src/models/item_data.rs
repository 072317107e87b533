//! Operator-curated item override rows.

use serde::Serialize;
use sqlx::FromRow;
use stash_core::overrides::ItemOverride;
use stash_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `item_data` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemDataRow {
    pub id: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub normalized_name: Option<String>,
    pub wiki_link: Option<String>,
    pub types: Vec<String>,
    pub icon_link: Option<String>,
    pub grid_image_link: Option<String>,
    pub base_image_link: Option<String>,
    pub image_link: Option<String>,
    pub image_512_link: Option<String>,
    pub image_8x_link: Option<String>,
    pub match_index: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ItemDataRow> for ItemOverride {
    fn from(row: ItemDataRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            short_name: row.short_name,
            normalized_name: row.normalized_name,
            wiki_link: row.wiki_link,
            types: row.types,
            icon_link: row.icon_link,
            grid_image_link: row.grid_image_link,
            base_image_link: row.base_image_link,
            image_link: row.image_link,
            image_512_link: row.image_512_link,
            image_8x_link: row.image_8x_link,
            match_index: row.match_index,
        }
    }
}
