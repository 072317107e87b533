//! Type-specific item properties.
//!
//! Every template item is classified by an ordered table of rules. Each
//! rule pairs an ancestry predicate with a builder; the first rule whose
//! predicate matches decides the item's shape, even when its builder
//! produces nothing. Classification depends only on the item's ancestry
//! chain and its own fields, never on the order items are processed in.

mod ammo;
mod armor;
mod consumables;
mod containers;
mod gear;
mod weapons;

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::globals::StimBuff;
use crate::locale::Translate;
use crate::preset::PresetsCache;
use crate::taxonomy;
use crate::template::{ItemTemplate, TemplateCatalog};
use crate::types::ItemId;

pub use ammo::AmmoProperties;
pub use armor::{
    ArmorAttachmentProperties, ArmorMaterialRef, ArmorProperties, ArmorStats,
    ChestRigProperties, GlassesProperties, HelmetProperties, RicochetParams,
};
pub use consumables::{
    FoodDrinkProperties, MedKitProperties, MedicalItemProperties, PainkillerProperties,
    ResourceProperties, StimEffect, StimProperties, SurgicalKitProperties,
};
pub use containers::{BackpackProperties, ContainerProperties, GridLayout};
pub use gear::{
    GrenadeProperties, HeadphoneProperties, KeyProperties, MeleeProperties,
    NightVisionProperties,
};
pub use weapons::{
    BarrelProperties, DefaultPresetStats, MagazineProperties, PresetProperties,
    ScopeProperties, WeaponModProperties, WeaponProperties,
};

/* --------------------------------------------------------------------------
   ItemProperties
   -------------------------------------------------------------------------- */

/// The published property record, tagged by `propertiesType`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "propertiesType")]
pub enum ItemProperties {
    #[serde(rename = "ItemPropertiesAmmo")]
    Ammo(AmmoProperties),
    #[serde(rename = "ItemPropertiesArmor")]
    Armor(ArmorProperties),
    #[serde(rename = "ItemPropertiesChestRig")]
    ChestRig(ChestRigProperties),
    #[serde(rename = "ItemPropertiesBackpack")]
    Backpack(BackpackProperties),
    #[serde(rename = "ItemPropertiesGrenade")]
    Grenade(GrenadeProperties),
    #[serde(rename = "ItemPropertiesFoodDrink")]
    FoodDrink(FoodDrinkProperties),
    #[serde(rename = "ItemPropertiesGlasses")]
    Glasses(GlassesProperties),
    #[serde(rename = "ItemPropertiesHelmet")]
    Helmet(HelmetProperties),
    #[serde(rename = "ItemPropertiesArmorAttachment")]
    ArmorAttachment(ArmorAttachmentProperties),
    #[serde(rename = "ItemPropertiesContainer")]
    Container(ContainerProperties),
    #[serde(rename = "ItemPropertiesWeapon")]
    Weapon(WeaponProperties),
    #[serde(rename = "ItemPropertiesNightVision")]
    NightVision(NightVisionProperties),
    #[serde(rename = "ItemPropertiesWeaponMod")]
    WeaponMod(WeaponModProperties),
    #[serde(rename = "ItemPropertiesScope")]
    Scope(ScopeProperties),
    #[serde(rename = "ItemPropertiesMagazine")]
    Magazine(MagazineProperties),
    #[serde(rename = "ItemPropertiesBarrel")]
    Barrel(BarrelProperties),
    #[serde(rename = "ItemPropertiesMedicalItem")]
    MedicalItem(MedicalItemProperties),
    #[serde(rename = "ItemPropertiesSurgicalKit")]
    SurgicalKit(SurgicalKitProperties),
    #[serde(rename = "ItemPropertiesMedKit")]
    MedKit(MedKitProperties),
    #[serde(rename = "ItemPropertiesPainkiller")]
    Painkiller(PainkillerProperties),
    #[serde(rename = "ItemPropertiesStim")]
    Stim(StimProperties),
    #[serde(rename = "ItemPropertiesKey")]
    Key(KeyProperties),
    #[serde(rename = "ItemPropertiesMelee")]
    Melee(MeleeProperties),
    #[serde(rename = "ItemPropertiesHeadphone")]
    Headphone(HeadphoneProperties),
    #[serde(rename = "ItemPropertiesResource")]
    Resource(ResourceProperties),
    #[serde(rename = "ItemPropertiesPreset")]
    Preset(PresetProperties),
}

impl ItemProperties {
    /// The `propertiesType` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Ammo(_) => "ItemPropertiesAmmo",
            Self::Armor(_) => "ItemPropertiesArmor",
            Self::ChestRig(_) => "ItemPropertiesChestRig",
            Self::Backpack(_) => "ItemPropertiesBackpack",
            Self::Grenade(_) => "ItemPropertiesGrenade",
            Self::FoodDrink(_) => "ItemPropertiesFoodDrink",
            Self::Glasses(_) => "ItemPropertiesGlasses",
            Self::Helmet(_) => "ItemPropertiesHelmet",
            Self::ArmorAttachment(_) => "ItemPropertiesArmorAttachment",
            Self::Container(_) => "ItemPropertiesContainer",
            Self::Weapon(_) => "ItemPropertiesWeapon",
            Self::NightVision(_) => "ItemPropertiesNightVision",
            Self::WeaponMod(_) => "ItemPropertiesWeaponMod",
            Self::Scope(_) => "ItemPropertiesScope",
            Self::Magazine(_) => "ItemPropertiesMagazine",
            Self::Barrel(_) => "ItemPropertiesBarrel",
            Self::MedicalItem(_) => "ItemPropertiesMedicalItem",
            Self::SurgicalKit(_) => "ItemPropertiesSurgicalKit",
            Self::MedKit(_) => "ItemPropertiesMedKit",
            Self::Painkiller(_) => "ItemPropertiesPainkiller",
            Self::Stim(_) => "ItemPropertiesStim",
            Self::Key(_) => "ItemPropertiesKey",
            Self::Melee(_) => "ItemPropertiesMelee",
            Self::Headphone(_) => "ItemPropertiesHeadphone",
            Self::Resource(_) => "ItemPropertiesResource",
            Self::Preset(_) => "ItemPropertiesPreset",
        }
    }
}

/* --------------------------------------------------------------------------
   Derivation context & rule table
   -------------------------------------------------------------------------- */

/// Read-only inputs shared by every rule.
pub struct DeriveContext<'a> {
    pub templates: &'a TemplateCatalog,
    pub translator: &'a dyn Translate,
    /// Override ids not tagged `disabled`; ammo references are checked
    /// against this set.
    pub live_ids: &'a HashSet<ItemId>,
    pub presets: &'a PresetsCache,
    pub stim_buffs: &'a BTreeMap<String, Vec<StimBuff>>,
}

impl DeriveContext<'_> {
    fn is_a(&self, item: &ItemTemplate, targets: &[&str]) -> bool {
        self.templates.is_a(&item.id, targets)
    }

    fn has_parent(&self, item: &ItemTemplate, targets: &[&str]) -> bool {
        self.templates.has_parent(&item.id, targets)
    }

    fn translate_all(&self, codes: &[String]) -> Vec<String> {
        codes.iter().map(|c| self.translator.translate(c)).collect()
    }

    /// Keep only ids of live items.
    fn live(&self, ids: Vec<String>) -> Vec<String> {
        ids.into_iter().filter(|id| self.live_ids.contains(id)).collect()
    }
}

type Predicate = fn(&DeriveContext<'_>, &ItemTemplate) -> bool;
type Builder = fn(&DeriveContext<'_>, &ItemTemplate) -> Option<ItemProperties>;

/// One classification rule.
pub struct Rule {
    pub name: &'static str,
    matches: Predicate,
    build: Builder,
}

/// Evaluated top to bottom; the first match wins.
pub static RULES: &[Rule] = &[
    Rule {
        name: "ammo",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::AMMO]),
        build: |_, t| Some(ItemProperties::Ammo(ammo::build(t))),
    },
    Rule {
        name: "armor",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::ARMOR]),
        build: |ctx, t| Some(ItemProperties::Armor(armor::build_armor(ctx, t))),
    },
    Rule {
        name: "chest-rig",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::CHEST_RIG]),
        build: |ctx, t| Some(ItemProperties::ChestRig(armor::build_chest_rig(ctx, t))),
    },
    Rule {
        name: "backpack",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::BACKPACK]),
        build: |_, t| Some(ItemProperties::Backpack(containers::build_backpack(t))),
    },
    Rule {
        name: "grenade",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::THROW_WEAPON]),
        build: |ctx, t| Some(ItemProperties::Grenade(gear::build_grenade(ctx, t))),
    },
    Rule {
        name: "food-drink",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::FOOD, taxonomy::DRINK]),
        build: |ctx, t| Some(ItemProperties::FoodDrink(consumables::build_food_drink(ctx, t))),
    },
    Rule {
        name: "glasses",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::VISORS]),
        build: |ctx, t| Some(ItemProperties::Glasses(armor::build_glasses(ctx, t))),
    },
    Rule {
        name: "head-armor",
        matches: |ctx, t| {
            ctx.is_a(t, &[taxonomy::HEADWEAR, taxonomy::ARMORED_EQUIPMENT, taxonomy::FACE_COVER])
                && t.f64_or_zero("armorClass") > 0.0
        },
        build: |ctx, t| Some(armor::build_head_armor(ctx, t)),
    },
    Rule {
        name: "container",
        matches: |ctx, t| {
            ctx.is_a(
                t,
                &[
                    taxonomy::SIMPLE_CONTAINER,
                    taxonomy::LOCKABLE_CONTAINER,
                    taxonomy::MOB_CONTAINER,
                ],
            )
        },
        build: |_, t| Some(ItemProperties::Container(containers::build_container(t))),
    },
    Rule {
        name: "weapon",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::WEAPON]),
        build: |ctx, t| Some(ItemProperties::Weapon(weapons::build_weapon(ctx, t))),
    },
    Rule {
        name: "night-vision",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::NIGHT_VISION]),
        build: |_, t| Some(ItemProperties::NightVision(gear::build_night_vision(t))),
    },
    Rule {
        name: "thermal-vision",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::THERMAL_VISION]),
        build: |_, _| None,
    },
    Rule {
        name: "weapon-mod",
        matches: |ctx, t| ctx.is_a(t, &[taxonomy::MOD, taxonomy::AMMO_BOX]),
        build: |ctx, t| Some(weapons::build_mod(ctx, t)),
    },
    Rule {
        name: "medical-item",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::MEDICAL_SUPPLIES]),
        build: |ctx, t| Some(consumables::build_medical_item(ctx, t)),
    },
    Rule {
        name: "med-kit",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::MEDKIT]),
        build: |ctx, t| Some(ItemProperties::MedKit(consumables::build_med_kit(ctx, t))),
    },
    Rule {
        name: "painkiller",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::DRUGS]),
        build: |ctx, t| Some(ItemProperties::Painkiller(consumables::build_painkiller(ctx, t))),
    },
    Rule {
        name: "stim",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::STIMULATOR]),
        build: |ctx, t| Some(ItemProperties::Stim(consumables::build_stim(ctx, t))),
    },
    Rule {
        name: "key",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::KEY_MECHANICAL, taxonomy::KEYCARD]),
        build: |_, t| Some(ItemProperties::Key(gear::build_key(t))),
    },
    Rule {
        name: "melee",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::KNIFE]),
        build: |_, t| Some(ItemProperties::Melee(gear::build_melee(t))),
    },
    Rule {
        name: "headphone",
        matches: |ctx, t| ctx.has_parent(t, &[taxonomy::HEADPHONES]),
        build: |_, t| Some(ItemProperties::Headphone(gear::build_headphone(t))),
    },
    Rule {
        name: "resource",
        matches: |_, t| t.f64_or_zero("MaxResource") > 0.0,
        build: |_, t| Some(ItemProperties::Resource(consumables::build_resource(t))),
    },
];

/// Name of the first rule matching `item`.
pub fn matching_rule(ctx: &DeriveContext<'_>, item: &ItemTemplate) -> Option<&'static str> {
    RULES.iter().find(|r| (r.matches)(ctx, item)).map(|r| r.name)
}

/// Derive the property record for a template item, `None` when no rule
/// matches or the matching rule yields nothing.
pub fn derive_properties(ctx: &DeriveContext<'_>, item: &ItemTemplate) -> Option<ItemProperties> {
    let rule = RULES.iter().find(|r| (r.matches)(ctx, item))?;
    (rule.build)(ctx, item)
}
