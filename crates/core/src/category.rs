//! Category trees built from flat parent-pointer records.
//!
//! Two independent trees are built per build: the engine taxonomy (from the
//! template catalog) and the handbook taxonomy (from the handbook document).
//! Nodes are created on demand by [`CategoryTree::ensure`] while items are
//! processed; children are linked in a single deferred pass afterwards.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::handbook::Handbook;
use crate::locale::{Locales, DEFAULT_LANG};
use crate::naming::{category_enum_name, normalize_name};
use crate::template::TemplateCatalog;
use crate::types::{ItemId, LangCode};

/* --------------------------------------------------------------------------
   Node & source
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: ItemId,
    pub parent_id: Option<ItemId>,
    pub child_ids: BTreeSet<ItemId>,
    pub name: BTreeMap<LangCode, String>,
    pub normalized_name: String,
    pub enum_name: String,
}

/// What a source knows about one category id.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInfo {
    pub parent_id: Option<ItemId>,
    pub names: BTreeMap<LangCode, String>,
}

/// Resolves category ids into parent pointers and localized names.
pub trait CategorySource {
    fn describe(&self, id: &str) -> Option<CategoryInfo>;
}

/// Engine taxonomy: parents and names come from the template catalog.
pub struct TemplateCategories<'a> {
    pub templates: &'a TemplateCatalog,
    pub locales: &'a Locales,
}

impl CategorySource for TemplateCategories<'_> {
    fn describe(&self, id: &str) -> Option<CategoryInfo> {
        let template = self.templates.get(id)?;
        Some(CategoryInfo {
            parent_id: template.parent().map(str::to_string),
            names: self.locales.template_names(id, &template.name),
        })
    }
}

/// Handbook taxonomy: parents come from a scan of the handbook listing,
/// names from the `interface` namespace, then the template table.
pub struct HandbookCategories<'a> {
    pub handbook: &'a Handbook,
    pub locales: &'a Locales,
}

impl CategorySource for HandbookCategories<'_> {
    fn describe(&self, id: &str) -> Option<CategoryInfo> {
        self.handbook.category(id)?;
        let names = self
            .locales
            .iter()
            .map(|(code, dict)| {
                let english = self.locales.english();
                let name = dict
                    .interface
                    .get(id)
                    .map(String::as_str)
                    .or_else(|| dict.template_name(id))
                    .or_else(|| english.and_then(|en| en.interface.get(id)).map(String::as_str))
                    .or_else(|| english.and_then(|en| en.template_name(id)))
                    .unwrap_or(id)
                    .to_string();
                (code.clone(), name)
            })
            .collect();
        Some(CategoryInfo {
            parent_id: self.handbook.category_parent(id).map(str::to_string),
            names,
        })
    }
}

/* --------------------------------------------------------------------------
   Tree
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CategoryTree {
    nodes: BTreeMap<ItemId, CategoryNode>,
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&CategoryNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values()
    }

    /// Make sure `id` and all of its ancestors have nodes.
    ///
    /// Existing nodes are never touched, so repeated calls are no-ops. An id
    /// the source does not know creates nothing; if it was reached as some
    /// node's parent, that node becomes a root.
    pub fn ensure(&mut self, id: &str, source: &impl CategorySource) {
        let mut visited: HashSet<ItemId> = HashSet::new();
        let mut created: Option<ItemId> = None;
        let mut current: Option<ItemId> = Some(id.to_string());

        while let Some(cur) = current.take() {
            if cur.is_empty() || self.nodes.contains_key(&cur) {
                break;
            }
            if !visited.insert(cur.clone()) {
                tracing::warn!(category_id = %cur, "Cyclic category parent chain");
                break;
            }
            let Some(info) = source.describe(&cur) else {
                tracing::warn!(category_id = %cur, "Unknown category id");
                if let Some(child) = created.as_ref().and_then(|c| self.nodes.get_mut(c)) {
                    child.parent_id = None;
                }
                break;
            };

            let english = info
                .names
                .get(DEFAULT_LANG)
                .or_else(|| info.names.values().next())
                .cloned()
                .unwrap_or_else(|| cur.clone());
            let node = CategoryNode {
                id: cur.clone(),
                parent_id: info.parent_id.clone(),
                child_ids: BTreeSet::new(),
                name: info.names,
                normalized_name: normalize_name(&english),
                enum_name: category_enum_name(&english),
            };
            self.nodes.insert(cur.clone(), node);
            created = Some(cur);
            current = info.parent_id;
        }
    }

    /// Deferred pass: add every node to its parent's `child_ids`.
    pub fn link_children(&mut self) {
        let edges: Vec<(ItemId, ItemId)> = self
            .nodes
            .values()
            .filter_map(|n| n.parent_id.clone().map(|p| (p, n.id.clone())))
            .collect();
        for (parent, child) in edges {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.child_ids.insert(child);
            }
        }
    }

    /// `id` followed by all of its ancestors, as far as nodes exist.
    pub fn closure(&self, id: &str) -> Vec<ItemId> {
        let mut out: Vec<ItemId> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if !seen.insert(node.id.as_str()) {
                break;
            }
            out.push(node.id.clone());
            current = node.parent_id.as_deref().and_then(|p| self.nodes.get(p));
        }
        out
    }

    /// Sorted enum names, for downstream schema generation.
    pub fn enum_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.values().map(|n| n.enum_name.clone()).collect();
        names.sort();
        names
    }
}
