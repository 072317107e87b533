//! The handbook taxonomy document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ItemId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandbookCategory {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "ParentId", default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandbookItem {
    #[serde(rename = "Id")]
    pub id: ItemId,
    #[serde(rename = "ParentId")]
    pub parent_id: String,
    #[serde(rename = "Price", default)]
    pub price: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Handbook {
    #[serde(rename = "Categories", default)]
    pub categories: Vec<HandbookCategory>,
    #[serde(rename = "Items", default)]
    pub items: Vec<HandbookItem>,
}

impl Handbook {
    /// Linear scan of the category listing.
    pub fn category(&self, id: &str) -> Option<&HandbookCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Parent of a handbook category; empty parent ids mean root.
    pub fn category_parent(&self, id: &str) -> Option<&str> {
        self.category(id)
            .and_then(|c| c.parent_id.as_deref())
            .filter(|p| !p.is_empty())
    }

    /// Index of item id -> handbook category id.
    pub fn item_index(&self) -> HashMap<&str, &str> {
        self.items
            .iter()
            .map(|i| (i.id.as_str(), i.parent_id.as_str()))
            .collect()
    }
}
