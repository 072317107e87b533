//! Operator-curated item overrides and image link resolution.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::ItemId;

/* --------------------------------------------------------------------------
   Type tags
   -------------------------------------------------------------------------- */

pub const TAG_DISABLED: &str = "disabled";
pub const TAG_QUEST: &str = "quest";
pub const TAG_PRESET: &str = "preset";
pub const TAG_GUN: &str = "gun";
pub const TAG_NO_FLEA: &str = "no-flea";
pub const TAG_ONLY_FLEA: &str = "only-flea";

/* --------------------------------------------------------------------------
   Image fallbacks
   -------------------------------------------------------------------------- */

pub const FALLBACK_ICON: &str = "https://assets.tarkov.dev/unknown-item-icon.jpg";
pub const FALLBACK_GRID_IMAGE: &str = "https://assets.tarkov.dev/unknown-item-grid-image.jpg";
pub const FALLBACK_BASE_IMAGE: &str = "https://assets.tarkov.dev/unknown-item-base-image.png";
pub const FALLBACK_INSPECT_IMAGE: &str = "https://assets.tarkov.dev/unknown-item-inspect.webp";
pub const FALLBACK_512_IMAGE: &str = "https://assets.tarkov.dev/unknown-item-512.webp";
pub const FALLBACK_8X_IMAGE: &str = "https://assets.tarkov.dev/unknown-item-512.webp";

/// A persisted override row for one item id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemOverride {
    pub id: ItemId,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub normalized_name: Option<String>,
    pub wiki_link: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub icon_link: Option<String>,
    pub grid_image_link: Option<String>,
    pub base_image_link: Option<String>,
    /// Inspect image.
    pub image_link: Option<String>,
    pub image_512_link: Option<String>,
    pub image_8x_link: Option<String>,
    pub match_index: Option<i32>,
}

impl ItemOverride {
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// Disabled and quest items never reach the snapshot.
    pub fn is_excluded(&self) -> bool {
        self.has_type(TAG_DISABLED) || self.has_type(TAG_QUEST)
    }

    pub fn image_links(&self) -> ImageLinks {
        fn pick(link: &Option<String>, fallback: &str) -> String {
            link.as_deref()
                .filter(|l| !l.is_empty())
                .unwrap_or(fallback)
                .to_string()
        }
        ImageLinks {
            icon_link: pick(&self.icon_link, FALLBACK_ICON),
            grid_image_link: pick(&self.grid_image_link, FALLBACK_GRID_IMAGE),
            base_image_link: pick(&self.base_image_link, FALLBACK_BASE_IMAGE),
            inspect_image_link: pick(&self.image_link, FALLBACK_INSPECT_IMAGE),
            image_512px_link: pick(&self.image_512_link, FALLBACK_512_IMAGE),
            image_8x_link: pick(&self.image_8x_link, FALLBACK_8X_IMAGE),
        }
    }
}

/// Image links as published, with fallbacks already substituted.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub icon_link: String,
    pub grid_image_link: String,
    pub base_image_link: String,
    pub inspect_image_link: String,
    #[serde(rename = "image512pxLink")]
    pub image_512px_link: String,
    #[serde(rename = "image8xLink")]
    pub image_8x_link: String,
}

/// Ordered id -> override map as returned by the overrides accessor.
pub type OverrideMap = BTreeMap<ItemId, ItemOverride>;

/// Ids of overrides that are not tagged `disabled`.
pub fn live_ids(overrides: &OverrideMap) -> HashSet<ItemId> {
    overrides
        .values()
        .filter(|o| !o.has_type(TAG_DISABLED))
        .map(|o| o.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_images_publish_fallbacks() {
        let o = ItemOverride {
            id: "a".into(),
            icon_link: Some("https://cdn/a-icon.webp".into()),
            grid_image_link: Some(String::new()),
            ..Default::default()
        };
        let links = o.image_links();
        assert_eq!(links.icon_link, "https://cdn/a-icon.webp");
        assert_eq!(links.grid_image_link, FALLBACK_GRID_IMAGE);
        assert_eq!(links.base_image_link, FALLBACK_BASE_IMAGE);
        assert_eq!(links.inspect_image_link, FALLBACK_INSPECT_IMAGE);
        assert_eq!(links.image_512px_link, FALLBACK_512_IMAGE);
        assert_eq!(links.image_8x_link, FALLBACK_8X_IMAGE);
    }

    #[test]
    fn image_links_serialize_with_published_names() {
        let json = serde_json::to_value(ItemOverride::default().image_links()).unwrap();
        assert!(json.get("image512pxLink").is_some());
        assert!(json.get("image8xLink").is_some());
        assert!(json.get("inspectImageLink").is_some());
    }

    #[test]
    fn exclusion_and_live_ids() {
        let mut map = OverrideMap::new();
        for (id, types) in [("a", vec!["gun"]), ("b", vec!["disabled"]), ("c", vec!["quest"])] {
            map.insert(
                id.into(),
                ItemOverride {
                    id: id.into(),
                    types: types.into_iter().map(String::from).collect(),
                    ..Default::default()
                },
            );
        }
        assert!(!map["a"].is_excluded());
        assert!(map["b"].is_excluded());
        assert!(map["c"].is_excluded());
        let live = live_ids(&map);
        assert!(live.contains("a") && live.contains("c"));
        assert!(!live.contains("b"));
    }
}
