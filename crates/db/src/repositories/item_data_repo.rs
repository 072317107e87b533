//! Repository for the `item_data` table.

use sqlx::PgPool;
use stash_core::overrides::ItemOverride;

use crate::models::item_data::ItemDataRow;

/// Column list for `item_data` queries.
const COLUMNS: &str = "\
    id, name, short_name, normalized_name, wiki_link, types, \
    icon_link, grid_image_link, base_image_link, image_link, \
    image_512_link, image_8x_link, match_index, created_at, updated_at";

/// Provides data access for item overrides.
pub struct ItemDataRepo;

impl ItemDataRepo {
    /// Every override row, ordered by id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ItemDataRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_data ORDER BY id");
        sqlx::query_as::<_, ItemDataRow>(&query).fetch_all(pool).await
    }

    /// Find a single override by item id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ItemDataRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_data WHERE id = $1");
        sqlx::query_as::<_, ItemDataRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the override for `o.id`.
    pub async fn upsert(pool: &PgPool, o: &ItemOverride) -> Result<ItemDataRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_data \
                 (id, name, short_name, normalized_name, wiki_link, types, icon_link, \
                  grid_image_link, base_image_link, image_link, image_512_link, \
                  image_8x_link, match_index) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 short_name = EXCLUDED.short_name, \
                 normalized_name = EXCLUDED.normalized_name, \
                 wiki_link = EXCLUDED.wiki_link, \
                 types = EXCLUDED.types, \
                 icon_link = EXCLUDED.icon_link, \
                 grid_image_link = EXCLUDED.grid_image_link, \
                 base_image_link = EXCLUDED.base_image_link, \
                 image_link = EXCLUDED.image_link, \
                 image_512_link = EXCLUDED.image_512_link, \
                 image_8x_link = EXCLUDED.image_8x_link, \
                 match_index = EXCLUDED.match_index, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemDataRow>(&query)
            .bind(&o.id)
            .bind(&o.name)
            .bind(&o.short_name)
            .bind(&o.normalized_name)
            .bind(&o.wiki_link)
            .bind(&o.types)
            .bind(&o.icon_link)
            .bind(&o.grid_image_link)
            .bind(&o.base_image_link)
            .bind(&o.image_link)
            .bind(&o.image_512_link)
            .bind(&o.image_8x_link)
            .bind(o.match_index)
            .fetch_one(pool)
            .await
    }
}
