//! Weapons, weapon mods and preset builds.

use serde::Serialize;

use super::{DeriveContext, ItemProperties};
use crate::preset::{Preset, PresetStats};
use crate::taxonomy;
use crate::template::{value_as_f64, ItemTemplate, SlotSpec};
use crate::types::ItemId;

/* --------------------------------------------------------------------------
   Weapons
   -------------------------------------------------------------------------- */

/// Stats of a weapon's default preset, filled in by the assembler.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPresetStats {
    pub default_width: i64,
    pub default_height: i64,
    pub default_ergonomics: f64,
    pub default_recoil_vertical: i64,
    pub default_recoil_horizontal: i64,
    pub default_weight: f64,
}

impl From<&PresetStats> for DefaultPresetStats {
    fn from(stats: &PresetStats) -> Self {
        Self {
            default_width: stats.width,
            default_height: stats.height,
            default_ergonomics: stats.ergonomics,
            default_recoil_vertical: stats.vertical_recoil,
            default_recoil_horizontal: stats.horizontal_recoil,
            default_weight: stats.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeaponProperties {
    pub caliber: Option<String>,
    pub default_ammo: Option<ItemId>,
    pub allowed_ammo: Vec<ItemId>,
    pub ergonomics: f64,
    pub recoil_vertical: f64,
    pub recoil_horizontal: f64,
    pub fire_rate: f64,
    pub effective_distance: f64,
    pub sighting_range: f64,
    pub center_of_impact: f64,
    pub deviation_curve: f64,
    pub deviation_max: f64,
    pub fire_modes: Vec<String>,
    pub slots: Vec<SlotSpec>,
    pub default_preset: Option<ItemId>,
    pub presets: Vec<ItemId>,
    #[serde(flatten)]
    pub default_stats: Option<DefaultPresetStats>,
}

pub(super) fn build_weapon(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> WeaponProperties {
    let default_ammo = t
        .str("defAmmo")
        .filter(|id| ctx.live_ids.contains(*id))
        .map(str::to_string);
    WeaponProperties {
        caliber: t.str("ammoCaliber").map(str::to_string),
        default_ammo,
        allowed_ammo: ctx.live(t.chamber_filter()),
        ergonomics: t.f64_or_zero("Ergonomics"),
        recoil_vertical: t.f64_or_zero("RecoilForceUp"),
        recoil_horizontal: t.f64_or_zero("RecoilForceBack"),
        fire_rate: t.f64_or_zero("bFirerate"),
        effective_distance: t.f64_or_zero("bEffDist"),
        sighting_range: t.f64_or_zero("SightingRange"),
        center_of_impact: t.f64_or_zero("CenterOfImpact"),
        deviation_curve: t.f64_or_zero("DeviationCurve"),
        deviation_max: t.f64_or_zero("DeviationMax"),
        fire_modes: ctx.translate_all(&t.string_list("weapFireType")),
        slots: t.slots(),
        default_preset: ctx.presets.default_for(&t.id).map(|p| p.id.clone()),
        presets: ctx.presets.for_base(&t.id).map(|p| p.id.clone()).collect(),
        default_stats: None,
    }
}

/* --------------------------------------------------------------------------
   Weapon mods
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeaponModProperties {
    pub ergonomics: f64,
    pub recoil_modifier: f64,
    pub accuracy_modifier: f64,
    pub slots: Vec<SlotSpec>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScopeProperties {
    #[serde(flatten)]
    pub base: WeaponModProperties,
    pub zoom_levels: Vec<Vec<f64>>,
    pub sighting_range: f64,
    pub sight_modes: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MagazineProperties {
    #[serde(flatten)]
    pub base: WeaponModProperties,
    pub capacity: i64,
    pub load_modifier: f64,
    pub ammo_check_modifier: f64,
    pub malfunction_chance: f64,
    pub allowed_ammo: Vec<ItemId>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarrelProperties {
    #[serde(flatten)]
    pub base: WeaponModProperties,
    pub center_of_impact: f64,
    pub deviation_curve: f64,
    pub deviation_max: f64,
}

/// `_max_count` of the first cartridge slot, or the first stack slot.
fn magazine_capacity(t: &ItemTemplate) -> i64 {
    t.array("Cartridges")
        .first()
        .or_else(|| t.array("StackSlots").first())
        .and_then(|slot| slot.get("_max_count"))
        .and_then(value_as_f64)
        .map(|v| v as i64)
        .unwrap_or(0)
}

fn zoom_levels(t: &ItemTemplate) -> Vec<Vec<f64>> {
    t.array("Zooms")
        .iter()
        .map(|mode| {
            mode.as_array()
                .map(|levels| levels.iter().filter_map(value_as_f64).collect())
                .unwrap_or_default()
        })
        .collect()
}

/// Generic mod shape, narrowed to scopes, magazines (and ammo boxes) or
/// barrels where the ancestry says so.
pub(super) fn build_mod(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> ItemProperties {
    let base = WeaponModProperties {
        ergonomics: t.f64_or_zero("Ergonomics"),
        recoil_modifier: t.f64_or_zero("Recoil") / 100.0,
        accuracy_modifier: t.f64_or_zero("Accuracy") / 100.0,
        slots: t.slots(),
    };
    if ctx.is_a(t, &[taxonomy::SIGHTS]) {
        return ItemProperties::Scope(ScopeProperties {
            base,
            zoom_levels: zoom_levels(t),
            sighting_range: t.f64_or_zero("SightingRange"),
            sight_modes: t.i64_or_zero("ModesCount"),
        });
    }
    if ctx.is_a(t, &[taxonomy::MAGAZINE, taxonomy::AMMO_BOX]) {
        return ItemProperties::Magazine(MagazineProperties {
            base,
            capacity: magazine_capacity(t),
            load_modifier: t.f64_or_zero("LoadUnloadModifier") / 100.0,
            ammo_check_modifier: t.f64_or_zero("CheckTimeModifier") / 100.0,
            malfunction_chance: t.f64_or_zero("MalfunctionChance"),
            allowed_ammo: ctx.live(t.chamber_filter()),
        });
    }
    if ctx.is_a(t, &[taxonomy::BARREL]) {
        return ItemProperties::Barrel(BarrelProperties {
            base,
            center_of_impact: t.f64_or_zero("CenterOfImpact"),
            deviation_curve: t.f64_or_zero("DeviationCurve"),
            deviation_max: t.f64_or_zero("DeviationMax"),
        });
    }
    ItemProperties::WeaponMod(base)
}

/* --------------------------------------------------------------------------
   Presets
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetProperties {
    pub base_item_id: ItemId,
    pub ergonomics: Option<f64>,
    pub recoil_vertical: Option<i64>,
    pub recoil_horizontal: Option<i64>,
    pub moa: Option<f64>,
    pub default: bool,
}

impl PresetProperties {
    /// Properties of a preset; figures are absent when its stats could
    /// not be computed.
    pub fn new(preset: &Preset, stats: Option<&PresetStats>) -> Self {
        Self {
            base_item_id: preset.base_id.clone(),
            ergonomics: stats.map(|s| s.ergonomics),
            recoil_vertical: stats.map(|s| s.vertical_recoil),
            recoil_horizontal: stats.map(|s| s.horizontal_recoil),
            moa: stats.and_then(|s| s.moa),
            default: preset.default,
        }
    }
}
