//! The published catalog snapshot and its per-item entries.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::category::CategoryTree;
use crate::globals::{ArmorMaterial, FleaMarketConfig, PlayerLevel};
use crate::locale::ItemLocale;
use crate::overrides::ImageLinks;
use crate::properties::ItemProperties;
use crate::traders::TraderPriceQuote;
use crate::types::{ItemId, LangCode, Timestamp};

/// Type tag every item implicitly carries in the published tag list.
pub const ANY_TYPE: &str = "any";

/// Discard limit published when the template declares none.
pub const NO_DISCARD_LIMIT: i64 = -1;

/* --------------------------------------------------------------------------
   Entries
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContainedItem {
    pub item: ItemId,
    pub count: i64,
}

/// One published item.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: ItemId,
    pub name: String,
    pub short_name: String,
    pub normalized_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub wiki_link: Option<String>,
    pub link: String,
    pub types: Vec<String>,
    #[serde(flatten)]
    pub images: ImageLinks,
    pub width: i64,
    pub height: i64,
    pub weight: f64,
    pub base_price: i64,
    pub background_color: String,
    pub bsg_category_id: Option<ItemId>,
    pub discard_limit: i64,
    pub contains_items: Vec<ContainedItem>,
    pub categories: Vec<ItemId>,
    pub handbook_categories: Vec<ItemId>,
    pub properties: Option<ItemProperties>,
    pub trader_prices: Vec<TraderPriceQuote>,
    pub locale: BTreeMap<LangCode, ItemLocale>,
    /// Raw `ConflictingItems` ids, bucketed once every entry is known.
    #[serde(skip)]
    pub raw_conflicts: Vec<String>,
    pub conflicting_items: Vec<ItemId>,
    pub conflicting_slot_ids: Vec<String>,
    pub conflicting_categories: Vec<ItemId>,
}

impl CatalogEntry {
    pub fn is_preset(&self) -> bool {
        matches!(self.properties, Some(ItemProperties::Preset(_)))
    }
}

/// Conflict ids sorted into the three published buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictSets {
    pub items: Vec<ItemId>,
    pub slot_ids: Vec<String>,
    pub categories: Vec<ItemId>,
}

impl ConflictSets {
    /// Each id lands in the first bucket it resolves to: a catalog item, an
    /// equipment slot id, or a category. Ids resolving to none are dropped.
    pub fn bucket<'a>(
        raw: impl IntoIterator<Item = &'a str>,
        item_ids: &HashSet<&str>,
        slot_ids: &HashSet<String>,
        categories: &CategoryTree,
    ) -> Self {
        let mut sets = Self::default();
        for id in raw {
            if item_ids.contains(id) {
                sets.items.push(id.to_string());
            } else if slot_ids.contains(id) {
                sets.slot_ids.push(id.to_string());
            } else if categories.contains(id) {
                sets.categories.push(id.to_string());
            } else {
                tracing::debug!(conflict_id = id, "Unresolved conflicting id");
            }
        }
        sets
    }
}

/* --------------------------------------------------------------------------
   Snapshot
   -------------------------------------------------------------------------- */

/// The single publishable unit; always replaced as a whole.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub updated_at: Timestamp,
    pub data: BTreeMap<ItemId, CatalogEntry>,
    pub categories: CategoryTree,
    pub handbook_categories: CategoryTree,
    pub item_types: Vec<String>,
    pub flea_market: FleaMarketConfig,
    pub armor_mats: BTreeMap<String, ArmorMaterial>,
    pub player_levels: Vec<PlayerLevel>,
    pub language_codes: Vec<LangCode>,
}

/// `any` followed by every distinct type tag, sorted.
pub fn item_types<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> Vec<String> {
    let distinct: BTreeSet<&str> = entries
        .into_iter()
        .flat_map(|e| e.types.iter().map(String::as_str))
        .collect();
    std::iter::once(ANY_TYPE)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

/* --------------------------------------------------------------------------
   Schema summary
   -------------------------------------------------------------------------- */

/// Newline-joined enum listings that downstream schema generation reads
/// from its own key.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchemaSummary {
    pub updated: Timestamp,
    #[serde(rename = "ItemType")]
    pub item_type: String,
    #[serde(rename = "ItemCategory")]
    pub item_category: String,
    #[serde(rename = "HandbookCategory")]
    pub handbook_category: String,
    #[serde(rename = "LanguageCode")]
    pub language_code: String,
}

impl SchemaSummary {
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        Self {
            updated: snapshot.updated_at,
            item_type: snapshot.item_types.join("\n "),
            item_category: snapshot.categories.enum_names().join("\n  "),
            handbook_category: snapshot.handbook_categories.enum_names().join("\n  "),
            language_code: snapshot.language_codes.join("\n "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryInfo, CategorySource};
    use crate::overrides::ItemOverride;
    use serde_json::json;

    fn entry(id: &str, types: &[&str]) -> CatalogEntry {
        CatalogEntry {
            id: id.into(),
            name: id.into(),
            short_name: id.into(),
            normalized_name: id.into(),
            description: None,
            wiki_link: None,
            link: format!("https://example.test/item/{id}"),
            types: types.iter().map(|t| t.to_string()).collect(),
            images: ItemOverride::default().image_links(),
            width: 1,
            height: 1,
            weight: 0.1,
            base_price: 10,
            background_color: "default".into(),
            bsg_category_id: None,
            discard_limit: NO_DISCARD_LIMIT,
            contains_items: Vec::new(),
            categories: Vec::new(),
            handbook_categories: Vec::new(),
            properties: None,
            trader_prices: Vec::new(),
            locale: BTreeMap::new(),
            raw_conflicts: vec!["x".into()],
            conflicting_items: Vec::new(),
            conflicting_slot_ids: Vec::new(),
            conflicting_categories: Vec::new(),
        }
    }

    struct OneCategory;

    impl CategorySource for OneCategory {
        fn describe(&self, id: &str) -> Option<CategoryInfo> {
            (id == "cat").then(|| CategoryInfo {
                parent_id: None,
                names: BTreeMap::from([("en".to_string(), "Cat".to_string())]),
            })
        }
    }

    // --- type tags ---

    #[test]
    fn item_types_start_with_any_and_are_sorted() {
        let entries = [entry("a", &["gun", "wearable"]), entry("b", &["ammo", "gun"])];
        assert_eq!(item_types(&entries), vec!["any", "ammo", "gun", "wearable"]);
        assert_eq!(item_types(Vec::<CatalogEntry>::new().iter()), vec!["any"]);
    }

    // --- conflicts ---

    #[test]
    fn conflicts_bucket_in_priority_order() {
        let mut tree = CategoryTree::new();
        tree.ensure("cat", &OneCategory);
        let items: HashSet<&str> = ["item", "both"].into_iter().collect();
        let slots: HashSet<String> = ["slot".to_string(), "both".to_string()].into_iter().collect();

        let sets = ConflictSets::bucket(["item", "slot", "cat", "both", "ghost"], &items, &slots, &tree);
        assert_eq!(sets.items, vec!["item", "both"]);
        assert_eq!(sets.slot_ids, vec!["slot"]);
        assert_eq!(sets.categories, vec!["cat"]);
    }

    // --- serialization ---

    #[test]
    fn entry_serializes_flat_images_and_null_properties() {
        let json = serde_json::to_value(entry("a", &[])).unwrap();
        assert_eq!(json["properties"], json!(null));
        assert_eq!(json["iconLink"], crate::overrides::FALLBACK_ICON);
        assert_eq!(json["discardLimit"], -1);
        assert!(json.get("rawConflicts").is_none());
        assert!(json.get("description").is_none());
        assert_eq!(json["conflictingSlotIds"], json!([]));
    }

    // --- schema summary ---

    #[test]
    fn schema_summary_joins_sorted_listings() {
        let mut categories = CategoryTree::new();
        categories.ensure("cat", &OneCategory);
        let snapshot = CatalogSnapshot {
            updated_at: chrono::Utc::now(),
            data: BTreeMap::new(),
            categories,
            handbook_categories: CategoryTree::new(),
            item_types: vec!["any".into(), "gun".into()],
            flea_market: crate::globals::FleaMarketConfig::from_globals(
                &crate::globals::Globals::default(),
                &crate::locale::Locales::default(),
            ),
            armor_mats: BTreeMap::new(),
            player_levels: Vec::new(),
            language_codes: vec!["de".into(), "en".into()],
        };

        let json = serde_json::to_value(SchemaSummary::from_snapshot(&snapshot)).unwrap();
        assert_eq!(json["ItemType"], "any\n gun");
        assert_eq!(json["ItemCategory"], "Cat");
        assert_eq!(json["HandbookCategory"], "");
        assert_eq!(json["LanguageCode"], "de\n en");
    }
}
