//! Body armor, rigs, eyewear and head armor.

use serde::Serialize;

use super::containers::GridLayout;
use super::{DeriveContext, ItemProperties};
use crate::taxonomy;
use crate::template::{ItemTemplate, SlotSpec};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArmorMaterialRef {
    pub id: String,
    pub name: String,
}

/// Fields shared by everything that protects a body part.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArmorStats {
    pub class: i64,
    pub durability: f64,
    pub repair_cost: i64,
    pub speed_penalty: f64,
    pub turn_penalty: f64,
    pub ergo_penalty: f64,
    pub material: Option<ArmorMaterialRef>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RicochetParams {
    #[serde(rename = "ricochetX")]
    pub x: f64,
    #[serde(rename = "ricochetY")]
    pub y: f64,
    #[serde(rename = "ricochetZ")]
    pub z: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArmorProperties {
    #[serde(flatten)]
    pub armor: ArmorStats,
    pub zones: Vec<String>,
    /// Likelihood hint that a hit ricochets.
    pub ricochet_y: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChestRigProperties {
    #[serde(flatten)]
    pub armor: ArmorStats,
    pub zones: Vec<String>,
    pub ricochet_y: f64,
    #[serde(flatten)]
    pub grid: GridLayout,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlassesProperties {
    pub class: i64,
    pub durability: f64,
    pub repair_cost: i64,
    pub blindness_protection: f64,
    pub material: Option<ArmorMaterialRef>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmetProperties {
    #[serde(flatten)]
    pub armor: ArmorStats,
    pub head_zones: Vec<String>,
    #[serde(flatten)]
    pub ricochet: RicochetParams,
    pub slots: Vec<SlotSpec>,
    pub deafening: Option<String>,
    pub blocks_headset: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArmorAttachmentProperties {
    #[serde(flatten)]
    pub armor: ArmorStats,
    pub head_zones: Vec<String>,
    #[serde(flatten)]
    pub ricochet: RicochetParams,
    pub slots: Vec<SlotSpec>,
    pub blindness_protection: f64,
}

fn material(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> Option<ArmorMaterialRef> {
    let id = t.str("ArmorMaterial").filter(|m| !m.is_empty())?;
    Some(ArmorMaterialRef {
        id: id.to_string(),
        name: ctx.translator.translate(&format!("Mat{id}")),
    })
}

fn stats(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> ArmorStats {
    ArmorStats {
        class: t.i64_or_zero("armorClass"),
        durability: t.f64_or_zero("MaxDurability"),
        repair_cost: t.i64_or_zero("RepairCost"),
        speed_penalty: t.f64_or_zero("speedPenaltyPercent") / 100.0,
        turn_penalty: t.f64_or_zero("mousePenalty") / 100.0,
        ergo_penalty: t.f64_or_zero("weaponErgonomicPenalty"),
        material: material(ctx, t),
    }
}

fn ricochet(t: &ItemTemplate) -> RicochetParams {
    let axis = |key: &str| {
        t.prop("RicochetParams")
            .and_then(|p| p.get(key))
            .and_then(crate::template::value_as_f64)
            .unwrap_or(0.0)
    };
    RicochetParams {
        x: axis("x"),
        y: axis("y"),
        z: axis("z"),
    }
}

pub(super) fn build_armor(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> ArmorProperties {
    ArmorProperties {
        armor: stats(ctx, t),
        zones: ctx.translate_all(&t.string_list("armorZone")),
        ricochet_y: ricochet(t).y,
    }
}

pub(super) fn build_chest_rig(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> ChestRigProperties {
    ChestRigProperties {
        armor: stats(ctx, t),
        zones: ctx.translate_all(&t.string_list("armorZone")),
        ricochet_y: ricochet(t).y,
        grid: GridLayout::of(t),
    }
}

pub(super) fn build_glasses(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> GlassesProperties {
    GlassesProperties {
        class: t.i64_or_zero("armorClass"),
        durability: t.f64_or_zero("MaxDurability"),
        repair_cost: t.i64_or_zero("RepairCost"),
        blindness_protection: t.f64_or_zero("BlindnessProtection"),
        material: material(ctx, t),
    }
}

/// Helmets for headwear proper, attachments for everything else.
pub(super) fn build_head_armor(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> ItemProperties {
    let armor = stats(ctx, t);
    let head_zones = ctx.translate_all(&t.string_list("headSegments"));
    if ctx.is_a(t, &[taxonomy::HEADWEAR]) {
        ItemProperties::Helmet(HelmetProperties {
            armor,
            head_zones,
            ricochet: ricochet(t),
            slots: t.slots(),
            deafening: t.str("DeafStrength").map(str::to_string),
            blocks_headset: t.bool_or_false("BlocksEarpiece"),
        })
    } else {
        ItemProperties::ArmorAttachment(ArmorAttachmentProperties {
            armor,
            head_zones,
            ricochet: ricochet(t),
            slots: t.slots(),
            blindness_protection: t.f64_or_zero("BlindnessProtection"),
        })
    }
}
