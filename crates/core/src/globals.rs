//! Globals constants and the snapshot tables derived from them
//! (flea market configuration, armor materials, player levels).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::locale::Locales;
use crate::types::LangCode;

/// Interface key holding the flea market title.
const FLEA_MARKET_LABEL_KEY: &str = "RAG FAIR";

/* --------------------------------------------------------------------------
   Raw document
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Globals {
    #[serde(default)]
    pub config: GlobalsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalsConfig {
    #[serde(default)]
    pub rag_fair: RagFair,
    /// Material id -> raw material parameters.
    #[serde(default)]
    pub armor_materials: BTreeMap<String, Map<String, Value>>,
    #[serde(rename = "exp", default)]
    pub exp: ExperienceConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagFair {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub min_user_level: i64,
    #[serde(default)]
    pub community_item_tax: f64,
    #[serde(default)]
    pub community_requirement_tax: f64,
    #[serde(default)]
    pub max_active_offer_count: Vec<OfferCountBand>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OfferCountBand {
    pub from: f64,
    pub to: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExperienceConfig {
    #[serde(default)]
    pub level: LevelConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LevelConfig {
    #[serde(default)]
    pub exp_table: Vec<ExpRow>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExpRow {
    pub exp: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthConfig {
    #[serde(default)]
    pub effects: HealthEffects,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthEffects {
    #[serde(default)]
    pub stimulator: StimulatorConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StimulatorConfig {
    /// Buff group name (`StimulatorBuffs` on a template) -> effects.
    #[serde(default)]
    pub buffs: BTreeMap<String, Vec<StimBuff>>,
}

/// One effect of a stimulator buff group.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct StimBuff {
    pub buff_type: String,
    pub chance: f64,
    pub delay: f64,
    pub duration: f64,
    pub value: f64,
    pub absolute_value: bool,
    pub skill_name: String,
}

impl Globals {
    pub fn stimulator_buffs(&self) -> &BTreeMap<String, Vec<StimBuff>> {
        &self.config.health.effects.stimulator.buffs
    }
}

/* --------------------------------------------------------------------------
   Flea market
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReputationLevel {
    pub offers: i64,
    pub min_rep: f64,
    pub max_rep: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleaMarketConfig {
    pub name: String,
    pub normalized_name: String,
    pub locale: BTreeMap<LangCode, String>,
    pub min_player_level: i64,
    pub enabled: bool,
    pub sell_offer_fee_rate: f64,
    pub sell_requirement_fee_rate: f64,
    pub reputation_levels: Vec<ReputationLevel>,
}

impl FleaMarketConfig {
    pub fn from_globals(globals: &Globals, locales: &Locales) -> Self {
        let rag_fair = &globals.config.rag_fair;
        let locale = locales
            .iter()
            .filter_map(|(code, dict)| {
                let label = dict.interface.get(FLEA_MARKET_LABEL_KEY)?;
                Some((code.clone(), soften_caps(label)))
            })
            .collect();
        Self {
            name: "FleaMarket".to_string(),
            normalized_name: "flea-market".to_string(),
            locale,
            min_player_level: rag_fair.min_user_level,
            enabled: rag_fair.enabled,
            sell_offer_fee_rate: rag_fair.community_item_tax / 100.0,
            sell_requirement_fee_rate: rag_fair.community_requirement_tax / 100.0,
            reputation_levels: reputation_levels(&rag_fair.max_active_offer_count),
        }
    }
}

/// Adjacent bands with the same offer count collapse into one level.
fn reputation_levels(bands: &[OfferCountBand]) -> Vec<ReputationLevel> {
    let mut levels: Vec<ReputationLevel> = Vec::new();
    for band in bands {
        if let Some(last) = levels.last_mut() {
            if last.offers == band.count {
                last.max_rep = band.to;
                continue;
            }
        }
        levels.push(ReputationLevel {
            offers: band.count,
            min_rep: band.from,
            max_rep: band.to,
        });
    }
    levels
}

/// `RAG FAIR` -> `Rag Fair`: capitals that don't start a word are lowered.
fn soften_caps(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut word_start = true;
    for ch in label.chars() {
        if ch.is_uppercase() && !word_start {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
        word_start = ch.is_whitespace();
    }
    out
}

/* --------------------------------------------------------------------------
   Armor materials & levels
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArmorMaterial {
    pub id: String,
    pub name: BTreeMap<LangCode, String>,
    /// Raw parameters with the first letter of each key lower-cased.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

pub fn armor_materials(globals: &Globals, locales: &Locales) -> BTreeMap<String, ArmorMaterial> {
    globals
        .config
        .armor_materials
        .iter()
        .map(|(id, raw)| {
            let fields = raw
                .iter()
                .map(|(key, value)| (lower_first(key), value.clone()))
                .collect();
            let material = ArmorMaterial {
                id: id.clone(),
                name: locales.interface_names(&format!("Mat{id}")),
                fields,
            };
            (id.clone(), material)
        })
        .collect()
}

fn lower_first(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerLevel {
    pub level: u32,
    pub exp: i64,
}

pub fn player_levels(globals: &Globals) -> Vec<PlayerLevel> {
    globals
        .config
        .exp
        .level
        .exp_table
        .iter()
        .zip(1u32..)
        .map(|(row, level)| PlayerLevel { level, exp: row.exp })
        .collect()
}
