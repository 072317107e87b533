//! Locale dictionaries and the translation capability.
//!
//! A locale dictionary carries per-template display strings and a flat
//! `interface` namespace of UI labels (body zones, materials, fire modes,
//! the flea market title). Other namespaces in the raw document are ignored.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::naming::camel_case_to_title_case;
use crate::types::{ItemId, LangCode};

/// Language whose strings are used for slugs, enum names and fallbacks.
pub const DEFAULT_LANG: &str = "en";

/* --------------------------------------------------------------------------
   Raw dictionaries
   -------------------------------------------------------------------------- */

/// Display strings of one template in one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateStrings {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "ShortName", default)]
    pub short_name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

/// All strings of one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleDictionary {
    #[serde(default)]
    pub templates: HashMap<ItemId, TemplateStrings>,
    #[serde(default)]
    pub interface: HashMap<String, String>,
}

impl LocaleDictionary {
    pub fn template_name(&self, id: &str) -> Option<&str> {
        self.templates
            .get(id)
            .and_then(|t| t.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

/// Every loaded language keyed by language code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locales {
    languages: BTreeMap<LangCode, LocaleDictionary>,
}

impl Locales {
    pub fn new(languages: BTreeMap<LangCode, LocaleDictionary>) -> Self {
        Self { languages }
    }

    pub fn get(&self, lang: &str) -> Option<&LocaleDictionary> {
        self.languages.get(lang)
    }

    pub fn english(&self) -> Option<&LocaleDictionary> {
        self.get(DEFAULT_LANG)
    }

    /// Language codes in sorted order.
    pub fn codes(&self) -> Vec<LangCode> {
        self.languages.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LangCode, &LocaleDictionary)> {
        self.languages.iter()
    }

    pub fn has_template(&self, id: &str) -> bool {
        self.english().and_then(|en| en.template_name(id)).is_some()
    }

    /// Per-language name of a template node.
    ///
    /// A language without its own translation borrows the English one; when
    /// English has none either, `raw_name` is converted to Title Case.
    pub fn template_names(&self, id: &str, raw_name: &str) -> BTreeMap<LangCode, String> {
        let english = self.english().and_then(|en| en.template_name(id));
        if english.is_none() {
            tracing::warn!(id, raw_name, "Category is missing an English translation");
        }
        self.languages
            .iter()
            .map(|(code, dict)| {
                let name = dict
                    .template_name(id)
                    .or(english)
                    .map(str::to_string)
                    .unwrap_or_else(|| camel_case_to_title_case(raw_name));
                (code.clone(), name)
            })
            .collect()
    }

    /// Per-language interface label, falling back to English and then to
    /// the key itself.
    pub fn interface_names(&self, key: &str) -> BTreeMap<LangCode, String> {
        let english = self.english().and_then(|en| en.interface.get(key));
        self.languages
            .iter()
            .map(|(code, dict)| {
                let name = dict
                    .interface
                    .get(key)
                    .or(english)
                    .cloned()
                    .unwrap_or_else(|| key.to_string());
                (code.clone(), name)
            })
            .collect()
    }

    /// The published locale bundle for a template item, if English knows it.
    pub fn item_bundle(&self, id: &str) -> Option<BTreeMap<LangCode, ItemLocale>> {
        if !self.has_template(id) {
            return None;
        }
        let bundle = self
            .languages
            .iter()
            .filter_map(|(code, dict)| {
                let strings = dict.templates.get(id)?;
                Some((code.clone(), ItemLocale::from(strings)))
            })
            .collect();
        Some(bundle)
    }
}

/* --------------------------------------------------------------------------
   Published locale bundle
   -------------------------------------------------------------------------- */

/// Per-language strings attached to a catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemLocale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&TemplateStrings> for ItemLocale {
    fn from(strings: &TemplateStrings) -> Self {
        Self {
            name: strings.name.clone(),
            short_name: strings.short_name.clone(),
            description: strings.description.clone(),
        }
    }
}

/* --------------------------------------------------------------------------
   Translate
   -------------------------------------------------------------------------- */

/// Resolves a game code (body zone, material, fire mode, ...) into a label.
pub trait Translate {
    fn translate(&self, code: &str) -> String;
}

/// English `interface` lookup that falls back to the raw code.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceTranslator<'a> {
    interface: Option<&'a HashMap<String, String>>,
}

impl<'a> InterfaceTranslator<'a> {
    pub fn new(locales: &'a Locales) -> Self {
        Self {
            interface: locales.english().map(|en| &en.interface),
        }
    }
}

impl Translate for InterfaceTranslator<'_> {
    fn translate(&self, code: &str) -> String {
        self.interface
            .and_then(|i| i.get(code))
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}
