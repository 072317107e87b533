//! Catalog assembly: one synchronous pass over every override row.
//!
//! Each live row becomes a [`CatalogEntry`] built from its template (or its
//! preset), the derived properties, both category closures, trader quotes
//! and the locale bundle. Contained items and conflict sets are resolved in
//! a second pass once every entry is known.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;
use stash_core::category::{CategoryTree, HandbookCategories, TemplateCategories};
use stash_core::error::CoreError;
use stash_core::globals::{armor_materials, player_levels, FleaMarketConfig};
use stash_core::locale::{InterfaceTranslator, ItemLocale, DEFAULT_LANG};
use stash_core::naming::{dash_to_camel_case, normalize_name};
use stash_core::overrides::{live_ids, ItemOverride, TAG_GUN, TAG_NO_FLEA, TAG_ONLY_FLEA};
use stash_core::preset::{Preset, PresetCalculator, PresetPart, PresetStats};
use stash_core::properties::{
    derive_properties, matching_rule, DefaultPresetStats, DeriveContext, ItemProperties, PresetProperties,
};
use stash_core::snapshot::{item_types, CatalogEntry, CatalogSnapshot, ConflictSets, ContainedItem, NO_DISCARD_LIMIT};
use stash_core::taxonomy;
use stash_core::template::{value_as_f64, ItemTemplate};
use stash_core::traders::{base_price_of, TraderPricing};
use stash_core::types::{ItemId, LangCode};
use stash_sources::BuildInputs;

use crate::context::{BuildContext, BuildOptions, ItemErrorPolicy};
use crate::error::BuildError;

/// Background color of templates that declare none.
const DEFAULT_BACKGROUND: &str = "default";

/// Synthetic dog tag preset; never treated as a weapon build.
const CUSTOM_DOGTAGS_ID: &str = "customdogtags12345678910";

/// Assemble the snapshot from a loaded context.
///
/// Both category trees are moved into the snapshot.
pub fn assemble(ctx: &mut BuildContext) -> Result<CatalogSnapshot, BuildError> {
    let BuildContext {
        options,
        inputs,
        categories,
        handbook_categories,
        warnings,
        ..
    } = ctx;

    let mut assembler = Assembler::new(inputs, options, categories, handbook_categories, warnings);
    let mut data = assembler.entries()?;
    assembler.resolve_references(&mut data);

    categories.link_children();
    handbook_categories.link_children();

    let snapshot = CatalogSnapshot {
        updated_at: chrono::Utc::now(),
        item_types: item_types(data.values()),
        data,
        categories: std::mem::take(categories),
        handbook_categories: std::mem::take(handbook_categories),
        flea_market: FleaMarketConfig::from_globals(&inputs.globals, &inputs.locales),
        armor_mats: armor_materials(&inputs.globals, &inputs.locales),
        player_levels: player_levels(&inputs.globals),
        language_codes: inputs.locales.codes(),
    };
    tracing::info!(
        items = snapshot.data.len(),
        categories = snapshot.categories.len(),
        handbook_categories = snapshot.handbook_categories.len(),
        warnings = *warnings,
        "Catalog assembled"
    );
    Ok(snapshot)
}

struct Assembler<'a> {
    inputs: &'a BuildInputs,
    options: &'a BuildOptions,
    categories: &'a mut CategoryTree,
    handbook_categories: &'a mut CategoryTree,
    warnings: &'a mut usize,
    translator: InterfaceTranslator<'a>,
    live: HashSet<ItemId>,
    handbook_index: HashMap<&'a str, &'a str>,
    pricing: TraderPricing<'a>,
    calculator: PresetCalculator<'a>,
}

impl<'a> Assembler<'a> {
    fn new(
        inputs: &'a BuildInputs,
        options: &'a BuildOptions,
        categories: &'a mut CategoryTree,
        handbook_categories: &'a mut CategoryTree,
        warnings: &'a mut usize,
    ) -> Self {
        Self {
            inputs,
            options,
            categories,
            handbook_categories,
            warnings,
            translator: InterfaceTranslator::new(&inputs.locales),
            live: live_ids(&inputs.overrides),
            handbook_index: inputs.handbook.item_index(),
            pricing: TraderPricing::new(&inputs.templates, &inputs.credits),
            calculator: PresetCalculator::new(&inputs.templates, &inputs.credits),
        }
    }

    fn warned(&mut self) {
        *self.warnings += 1;
    }

    fn derive_ctx(&self) -> DeriveContext<'_> {
        DeriveContext {
            templates: &self.inputs.templates,
            translator: &self.translator,
            live_ids: &self.live,
            presets: &self.inputs.presets,
            stim_buffs: self.inputs.globals.stimulator_buffs(),
        }
    }

    /* ----------------------------------------------------------------------
       First pass
       ---------------------------------------------------------------------- */

    fn entries(&mut self) -> Result<BTreeMap<ItemId, CatalogEntry>, BuildError> {
        let inputs = self.inputs;
        let mut data = BTreeMap::new();

        for (id, row) in &inputs.overrides {
            if row.is_excluded() {
                continue;
            }
            match self.entry(id, row) {
                Ok(Some(entry)) => {
                    data.insert(id.clone(), entry);
                }
                Ok(None) => {}
                Err(source) => match self.options.error_policy {
                    ItemErrorPolicy::SkipItem => {
                        tracing::warn!(item_id = %id, error = %source, "Skipping item");
                        self.warned();
                    }
                    ItemErrorPolicy::FailBuild => {
                        return Err(BuildError::Item { id: id.clone(), source });
                    }
                },
            }
        }
        Ok(data)
    }

    /// `Ok(None)` when the row is neither a template item nor a live preset.
    fn entry(&mut self, id: &str, row: &ItemOverride) -> Result<Option<CatalogEntry>, CoreError> {
        let inputs = self.inputs;
        let mut entry = if let Some(template) = inputs.templates.get(id) {
            self.template_entry(template, row)?
        } else if let Some(preset) = inputs.presets.presets.get(id) {
            self.preset_entry(preset, row)?
        } else {
            tracing::warn!(item_id = id, "Item is neither a template nor a preset");
            self.warned();
            return Ok(None);
        };

        entry.categories = match entry.bsg_category_id.as_deref() {
            Some(category_id) => {
                let source = TemplateCategories {
                    templates: &inputs.templates,
                    locales: &inputs.locales,
                };
                self.categories.ensure(category_id, &source);
                self.categories.closure(category_id)
            }
            None => Vec::new(),
        };

        let handbook_id = match &entry.properties {
            Some(ItemProperties::Preset(p)) => p.base_item_id.as_str(),
            _ => id,
        };
        entry.handbook_categories = match self.handbook_index.get(handbook_id).copied() {
            Some(parent) => {
                let source = HandbookCategories {
                    handbook: &inputs.handbook,
                    locales: &inputs.locales,
                };
                self.handbook_categories.ensure(parent, &source);
                self.handbook_categories.closure(parent)
            }
            None => {
                tracing::warn!(item_id = id, handbook_id, "Item has no handbook entry");
                self.warned();
                Vec::new()
            }
        };

        Ok(Some(entry))
    }

    fn template_entry(&mut self, template: &ItemTemplate, row: &ItemOverride) -> Result<CatalogEntry, CoreError> {
        let inputs = self.inputs;
        let id = template.id.as_str();
        let bundle = inputs.locales.item_bundle(id).unwrap_or_default();
        let mut entry = self.base_entry(row, bundle, Some(template.name.as_str()))?;

        entry.width = template.i64_or_zero("Width");
        entry.height = template.i64_or_zero("Height");
        entry.weight = template.f64_or_zero("Weight");
        entry.bsg_category_id = template.parent().map(str::to_string);
        entry.discard_limit = template.i64("DiscardLimit").unwrap_or(NO_DISCARD_LIMIT);
        if let Some(color) = template.str("BackgroundColor") {
            entry.background_color = color.to_string();
        }
        entry.raw_conflicts = template.string_list("ConflictingItems");

        match base_price_of(&inputs.templates, &inputs.credits, id) {
            Some(price) => {
                entry.base_price = price;
                let (quotes, mapped) = self.pricing.quotes_for(id, price);
                entry.trader_prices = quotes;
                if !mapped {
                    self.warned();
                }
            }
            None => {
                tracing::warn!(item_id = id, "Unknown base value");
                self.warned();
            }
        }

        let derive_ctx = self.derive_ctx();
        let mut properties = derive_properties(&derive_ctx, template);
        if properties.is_none() && matching_rule(&derive_ctx, template).is_none() {
            tracing::warn!(item_id = id, "No property rule matched");
            self.warned();
        }

        if row.has_type(TAG_GUN) {
            let default_parts: Vec<PresetPart> = inputs
                .presets
                .default_for(id)
                .map(|p| p.contains_items.iter().filter(|part| part.item_id != id).cloned().collect())
                .unwrap_or_default();
            entry.contains_items = default_parts.iter().map(contained).collect();

            if let Some(ItemProperties::Weapon(weapon)) = properties.as_mut() {
                weapon.default_stats = self
                    .calculator
                    .aggregate_build(id, id, &default_parts)
                    .as_ref()
                    .map(DefaultPresetStats::from);
            }
        }

        if entry.bsg_category_id.as_deref() == Some(taxonomy::AMMO_BOX) {
            entry.contains_items.push(ammo_box_contents(template)?);
        }

        entry.properties = properties;
        Ok(entry)
    }

    fn preset_entry(&mut self, preset: &Preset, row: &ItemOverride) -> Result<CatalogEntry, CoreError> {
        let inputs = self.inputs;
        let base = inputs.templates.get(&preset.base_id);
        let bundle = inputs
            .locales
            .item_bundle(&preset.id)
            .unwrap_or_else(|| preset_bundle(preset));
        let mut entry = self.base_entry(row, bundle, preset.name.as_deref())?;

        let stats: Option<PresetStats> = self.calculator.aggregate(preset);
        if stats.is_none() {
            self.warned();
        }
        if let Some(s) = &stats {
            entry.width = s.width;
            entry.height = s.height;
            entry.weight = s.weight;
            entry.base_price = s.base_value;
        }
        entry.bsg_category_id = base.and_then(|b| b.parent()).map(str::to_string);
        if let Some(color) = preset
            .background_color
            .as_deref()
            .or_else(|| base.and_then(|b| b.str("BackgroundColor")))
        {
            entry.background_color = color.to_string();
        }

        let no_flea = dash_to_camel_case(TAG_NO_FLEA);
        let base_no_flea = inputs
            .overrides
            .get(&preset.base_id)
            .is_some_and(|b| b.has_type(TAG_NO_FLEA));
        if base_no_flea && !entry.types.contains(&no_flea) {
            entry.types.push(no_flea);
        }

        entry.contains_items = preset.contains_items.iter().map(contained).collect();
        if preset.id != CUSTOM_DOGTAGS_ID {
            let (quotes, mapped) = self.pricing.preset_quotes(&preset.contains_items);
            entry.trader_prices = quotes;
            if !mapped {
                self.warned();
            }
        }
        entry.properties = Some(ItemProperties::Preset(PresetProperties::new(preset, stats.as_ref())));
        Ok(entry)
    }

    /// Fields shared by template and preset entries.
    fn base_entry(
        &self,
        row: &ItemOverride,
        locale: BTreeMap<LangCode, ItemLocale>,
        fallback_name: Option<&str>,
    ) -> Result<CatalogEntry, CoreError> {
        let english = locale.get(DEFAULT_LANG);
        let name = english
            .and_then(|l| l.name.clone())
            .or_else(|| row.name.clone())
            .or_else(|| fallback_name.map(str::to_string))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| row.id.clone());
        let short_name = english
            .and_then(|l| l.short_name.clone())
            .or_else(|| row.short_name.clone())
            .unwrap_or_else(|| name.clone());
        let description = english.and_then(|l| l.description.clone());

        let normalized_name = row
            .normalized_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| normalize_name(&name));
        if normalized_name.is_empty() {
            return Err(CoreError::Validation(format!("no usable normalized name for '{name}'")));
        }

        let only_flea = dash_to_camel_case(TAG_ONLY_FLEA);
        let types = row
            .types
            .iter()
            .map(|t| dash_to_camel_case(t))
            .filter(|t| *t != only_flea)
            .collect();

        Ok(CatalogEntry {
            id: row.id.clone(),
            link: format!("{}/{}", self.options.item_link_base.trim_end_matches('/'), normalized_name),
            name,
            short_name,
            normalized_name,
            description,
            wiki_link: row.wiki_link.clone(),
            types,
            images: row.image_links(),
            width: 0,
            height: 0,
            weight: 0.0,
            base_price: 0,
            background_color: DEFAULT_BACKGROUND.to_string(),
            bsg_category_id: None,
            discard_limit: NO_DISCARD_LIMIT,
            contains_items: Vec::new(),
            categories: Vec::new(),
            handbook_categories: Vec::new(),
            properties: None,
            trader_prices: Vec::new(),
            locale,
            raw_conflicts: Vec::new(),
            conflicting_items: Vec::new(),
            conflicting_slot_ids: Vec::new(),
            conflicting_categories: Vec::new(),
        })
    }

    /* ----------------------------------------------------------------------
       Second pass
       ---------------------------------------------------------------------- */

    /// Drop contained items that are not entries and bucket conflict ids.
    fn resolve_references(&mut self, data: &mut BTreeMap<ItemId, CatalogEntry>) {
        let item_ids: HashSet<String> = data.keys().cloned().collect();
        let item_refs: HashSet<&str> = item_ids.iter().map(String::as_str).collect();
        let slot_ids = self.inputs.templates.slot_ids();
        let mut dangling = 0;

        for entry in data.values_mut() {
            let id = entry.id.clone();
            entry.contains_items.retain(|c| {
                let known = item_refs.contains(c.item.as_str());
                if !known {
                    tracing::warn!(item_id = %id, contained = %c.item, "Contained item is not in the catalog");
                    dangling += 1;
                }
                known
            });

            let raw = std::mem::take(&mut entry.raw_conflicts);
            if entry.is_preset() {
                continue;
            }
            let sets = ConflictSets::bucket(raw.iter().map(String::as_str), &item_refs, &slot_ids, &*self.categories);
            entry.conflicting_items = sets.items;
            entry.conflicting_slot_ids = sets.slot_ids;
            entry.conflicting_categories = sets.categories;
        }
        *self.warnings += dangling;
    }
}

fn contained(part: &PresetPart) -> ContainedItem {
    ContainedItem {
        item: part.item_id.clone(),
        count: part.count,
    }
}

/// Localized preset names, for presets without template strings.
fn preset_bundle(preset: &Preset) -> BTreeMap<LangCode, ItemLocale> {
    preset
        .locale
        .iter()
        .filter(|(_, l)| l.name.is_some() || l.short_name.is_some())
        .map(|(code, l)| {
            let strings = ItemLocale {
                name: l.name.clone(),
                short_name: l.short_name.clone(),
                description: None,
            };
            (code.clone(), strings)
        })
        .collect()
}

/// The round and count held by an ammo box's first stack slot.
fn ammo_box_contents(template: &ItemTemplate) -> Result<ContainedItem, CoreError> {
    let slot = template
        .array("StackSlots")
        .first()
        .ok_or_else(|| CoreError::Validation("ammo box has no stack slots".into()))?;
    let item = slot
        .pointer("/_props/filters/0/Filter/0")
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::Validation("ammo box stack slot has no round filter".into()))?;
    let count = slot.get("_max_count").and_then(value_as_f64).unwrap_or(0.0) as i64;
    Ok(ContainedItem {
        item: item.to_string(),
        count,
    })
}
