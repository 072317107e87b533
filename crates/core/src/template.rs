//! Raw game item templates and the ancestry primitive.
//!
//! The template catalog is the weakly-typed source of truth: every item
//! and every category node is a template, linked to its parent through
//! `_parent`. Field access goes through the typed helpers on
//! [`ItemTemplate`] so that missing or mistyped properties degrade to
//! `None` instead of failing the whole build.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ItemId;

/* --------------------------------------------------------------------------
   ItemTemplate
   -------------------------------------------------------------------------- */

/// `_type` of a concrete item template.
pub const TYPE_ITEM: &str = "Item";

/// `_type` of a category node template.
pub const TYPE_NODE: &str = "Node";

/// One entry of the template catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemTemplate {
    #[serde(rename = "_id")]
    pub id: ItemId,
    /// Raw internal name, used as the last-resort display name.
    #[serde(rename = "_name", default)]
    pub name: String,
    /// Taxonomy parent id; empty string or absent for roots.
    #[serde(rename = "_parent", default)]
    pub parent_id: Option<ItemId>,
    #[serde(rename = "_type", default)]
    pub type_tag: String,
    #[serde(rename = "_props", default)]
    pub props: Map<String, Value>,
}

impl ItemTemplate {
    /// The parent pointer, treating an empty string as "no parent".
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key).filter(|v| !v.is_null())
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.prop(key).and_then(value_as_f64)
    }

    /// Numeric property, defaulting to `0.0`.
    pub fn f64_or_zero(&self, key: &str) -> f64 {
        self.f64(key).unwrap_or(0.0)
    }

    pub fn i64(&self, key: &str) -> Option<i64> {
        self.f64(key).map(|v| v as i64)
    }

    pub fn i64_or_zero(&self, key: &str) -> i64 {
        self.i64(key).unwrap_or(0)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.prop(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn bool_or_false(&self, key: &str) -> bool {
        self.bool(key).unwrap_or(false)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.prop(key).and_then(Value::as_str)
    }

    pub fn array(&self, key: &str) -> &[Value] {
        self.prop(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// String entries of an array property (e.g. `ConflictingItems`).
    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.array(key)
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Storage grids declared by the template.
    pub fn grids(&self) -> Vec<GridSpec> {
        self.array("Grids")
            .iter()
            .map(|grid| GridSpec {
                id: grid.get("_id").and_then(Value::as_str).map(str::to_string),
                cells_h: nested_i64(grid, &["_props", "cellsH"]),
                cells_v: nested_i64(grid, &["_props", "cellsV"]),
            })
            .collect()
    }

    /// Attachment slots declared by the template.
    pub fn slots(&self) -> Vec<SlotSpec> {
        parse_slots(self.array("Slots"))
    }

    /// Ids accepted by the first chamber, falling back to the first
    /// cartridge slot (magazines) and then the first stack slot (ammo boxes).
    pub fn chamber_filter(&self) -> Vec<String> {
        for key in ["Chambers", "Cartridges", "StackSlots"] {
            if let Some(first) = self.array(key).first() {
                let ids = filter_ids(first);
                if !ids.is_empty() {
                    return ids;
                }
            }
        }
        Vec::new()
    }
}

/// A single storage grid (`Grids[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSpec {
    pub id: Option<String>,
    pub cells_h: i64,
    pub cells_v: i64,
}

/// A single attachment slot (`Slots[]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSpec {
    pub id: String,
    pub name: String,
    pub required: bool,
    /// Template ids accepted by the slot.
    pub filters: Vec<String>,
    /// Built-in, non-removable plates (`filters[].Plate` with `locked`).
    #[serde(skip)]
    pub locked_plates: Vec<String>,
}

fn parse_slots(raw: &[Value]) -> Vec<SlotSpec> {
    raw.iter()
        .map(|slot| {
            let filter_groups = slot
                .get("_props")
                .and_then(|p| p.get("filters"))
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let locked_plates = filter_groups
                .iter()
                .filter(|f| f.get("locked").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|f| f.get("Plate").and_then(Value::as_str))
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            SlotSpec {
                id: slot.get("_id").and_then(Value::as_str).unwrap_or_default().to_string(),
                name: slot.get("_name").and_then(Value::as_str).unwrap_or_default().to_string(),
                required: slot.get("_required").and_then(Value::as_bool).unwrap_or(false),
                filters: filter_ids(slot),
                locked_plates,
            }
        })
        .collect()
}

/// Collect `_props.filters[*].Filter[*]` ids from a slot-like value.
fn filter_ids(slot_like: &Value) -> Vec<String> {
    slot_like
        .get("_props")
        .and_then(|p| p.get("filters"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|f| f.get("Filter").and_then(Value::as_array))
        .flatten()
        .filter_map(|id| id.as_str().map(str::to_string))
        .collect()
}

fn nested_i64(value: &Value, path: &[&str]) -> i64 {
    let mut current = value;
    for key in path {
        match current.get(key) {
            Some(v) => current = v,
            None => return 0,
        }
    }
    value_as_f64(current).map(|v| v as i64).unwrap_or(0)
}

/// Numbers sometimes arrive as strings in the raw catalog.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/* --------------------------------------------------------------------------
   TemplateCatalog
   -------------------------------------------------------------------------- */

/// The full template catalog keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    templates: HashMap<ItemId, ItemTemplate>,
}

impl TemplateCatalog {
    pub fn new(templates: HashMap<ItemId, ItemTemplate>) -> Self {
        Self { templates }
    }

    pub fn get(&self, id: &str) -> Option<&ItemTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &ItemTemplate)> {
        self.templates.iter()
    }

    pub fn insert(&mut self, template: ItemTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Ids from `id` itself up to the root, following `_parent`.
    ///
    /// Stops at the first id that is missing from the catalog (it is still
    /// yielded) and at the first repeated id, so a cyclic chain terminates.
    pub fn lineage(&self, id: &str) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let Some(start) = self.templates.get_key_value(id) else {
            return chain;
        };
        let mut current: Option<&str> = Some(start.0.as_str());
        while let Some(cur) = current {
            if !seen.insert(cur) {
                tracing::warn!(id, at = cur, "Cyclic template parent chain");
                break;
            }
            chain.push(cur);
            current = self.templates.get(cur).and_then(ItemTemplate::parent);
        }
        chain
    }

    /// Whether the item itself or any ancestor is one of `targets`.
    ///
    /// This is the sole classification primitive used by the property
    /// deriver and trader category resolution.
    pub fn is_a(&self, id: &str, targets: &[&str]) -> bool {
        self.lineage(id).iter().any(|ancestor| targets.contains(ancestor))
    }

    /// Whether the template's direct parent is one of `targets`.
    pub fn has_parent(&self, id: &str, targets: &[&str]) -> bool {
        self.templates
            .get(id)
            .and_then(ItemTemplate::parent)
            .is_some_and(|parent| targets.contains(&parent))
    }

    /// Every slot id declared by any template, used to bucket conflicts.
    pub fn slot_ids(&self) -> HashSet<String> {
        self.templates
            .values()
            .flat_map(|t| t.slots().into_iter().map(|s| s.id))
            .filter(|id| !id.is_empty())
            .collect()
    }
}

impl FromIterator<ItemTemplate> for TemplateCatalog {
    fn from_iter<I: IntoIterator<Item = ItemTemplate>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(id: &str, parent: Option<&str>, props: Value) -> ItemTemplate {
        serde_json::from_value(json!({
            "_id": id,
            "_name": format!("{id}_name"),
            "_parent": parent.unwrap_or(""),
            "_type": if props.is_null() { TYPE_NODE } else { TYPE_ITEM },
            "_props": if props.is_null() { json!({}) } else { props },
        }))
        .unwrap()
    }

    fn catalog() -> TemplateCatalog {
        [
            template("root", None, Value::Null),
            template("weapon", Some("root"), Value::Null),
            template("rifle", Some("weapon"), Value::Null),
            template("ak", Some("rifle"), json!({"Weight": "3.3", "CanSellOnRagfair": true})),
        ]
        .into_iter()
        .collect()
    }

    // --- property access ---

    #[test]
    fn numeric_props_accept_strings() {
        let cat = catalog();
        let ak = cat.get("ak").unwrap();
        assert_eq!(ak.f64("Weight"), Some(3.3));
        assert_eq!(ak.f64("Missing"), None);
        assert_eq!(ak.f64_or_zero("Missing"), 0.0);
        assert!(ak.bool_or_false("CanSellOnRagfair"));
    }

    #[test]
    fn empty_parent_is_root() {
        let cat = catalog();
        assert_eq!(cat.get("root").unwrap().parent(), None);
        assert_eq!(cat.get("rifle").unwrap().parent(), Some("weapon"));
    }

    #[test]
    fn slots_collect_filters_and_locked_plates() {
        let t = template(
            "vest",
            Some("root"),
            json!({
                "Slots": [{
                    "_id": "slot1",
                    "_name": "Front_plate",
                    "_required": true,
                    "_props": {"filters": [{"Filter": ["p1", "p2"], "Plate": "p1", "locked": true}]}
                }]
            }),
        );
        let slots = t.slots();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].filters, vec!["p1", "p2"]);
        assert_eq!(slots[0].locked_plates, vec!["p1"]);
        assert!(slots[0].required);
    }

    // --- ancestry ---

    #[test]
    fn lineage_walks_to_root() {
        let cat = catalog();
        assert_eq!(cat.lineage("ak"), vec!["ak", "rifle", "weapon", "root"]);
        assert!(cat.lineage("unknown").is_empty());
    }

    #[test]
    fn is_a_matches_self_and_ancestors() {
        let cat = catalog();
        assert!(cat.is_a("ak", &["weapon"]));
        assert!(cat.is_a("ak", &["ak"]));
        assert!(!cat.is_a("rifle", &["ak"]));
        assert!(cat.has_parent("ak", &["rifle"]));
        assert!(!cat.has_parent("ak", &["weapon"]));
    }

    #[test]
    fn lineage_stops_on_cycle() {
        let cat: TemplateCatalog = [
            template("a", Some("b"), Value::Null),
            template("b", Some("a"), Value::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(cat.lineage("a"), vec!["a", "b"]);
        assert!(!cat.is_a("a", &["c"]));
    }
}
