//! Provisions, medicine and stimulants.

use serde::Serialize;
use serde_json::Value;

use super::{DeriveContext, ItemProperties};
use crate::template::{value_as_f64, ItemTemplate};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StimEffect {
    #[serde(rename = "type")]
    pub kind: String,
    pub chance: f64,
    pub delay: f64,
    pub duration: f64,
    pub value: f64,
    pub percent: bool,
    pub skill_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodDrinkProperties {
    pub energy: f64,
    pub hydration: f64,
    pub units: i64,
    pub stim_effects: Vec<StimEffect>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalItemProperties {
    pub uses: i64,
    pub use_time: f64,
    pub cures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurgicalKitProperties {
    pub uses: i64,
    pub use_time: f64,
    pub cures: Vec<String>,
    pub min_limb_health: f64,
    pub max_limb_health: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedKitProperties {
    pub hitpoints: i64,
    pub use_time: f64,
    pub max_heal_per_use: f64,
    pub cures: Vec<String>,
    pub hp_cost_light_bleeding: f64,
    pub hp_cost_heavy_bleeding: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PainkillerProperties {
    pub uses: i64,
    pub use_time: f64,
    pub cures: Vec<String>,
    pub painkiller_duration: f64,
    pub energy_impact: f64,
    pub hydration_impact: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StimProperties {
    pub use_time: f64,
    pub cures: Vec<String>,
    pub stim_effects: Vec<StimEffect>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceProperties {
    pub units: i64,
}

/// `_props.{group}.{effect}.{field}` as a number.
fn effect_field(t: &ItemTemplate, group: &str, effect: &str, field: &str) -> Option<f64> {
    t.prop(group)?.get(effect)?.get(field).and_then(value_as_f64)
}

/// Translated keys of `effects_damage`.
fn cures(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> Vec<String> {
    let keys: Vec<String> = t
        .prop("effects_damage")
        .and_then(Value::as_object)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();
    ctx.translate_all(&keys)
}

fn stim_effects(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> Vec<StimEffect> {
    let Some(group) = t.str("StimulatorBuffs").filter(|g| !g.is_empty()) else {
        return Vec::new();
    };
    let Some(buffs) = ctx.stim_buffs.get(group) else {
        tracing::warn!(item_id = %t.id, group, "Unknown stimulator buff group");
        return Vec::new();
    };
    buffs
        .iter()
        .map(|b| StimEffect {
            kind: b.buff_type.clone(),
            chance: b.chance,
            delay: b.delay,
            duration: b.duration,
            value: b.value,
            percent: !b.absolute_value,
            skill_name: (!b.skill_name.is_empty()).then(|| ctx.translator.translate(&b.skill_name)),
        })
        .collect()
}

fn uses(t: &ItemTemplate) -> i64 {
    match t.i64_or_zero("MaxHpResource") {
        0 => 1,
        n => n,
    }
}

pub(super) fn build_food_drink(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> FoodDrinkProperties {
    FoodDrinkProperties {
        energy: effect_field(t, "effects_health", "Energy", "value").unwrap_or(0.0),
        hydration: effect_field(t, "effects_health", "Hydration", "value").unwrap_or(0.0),
        units: t.i64_or_zero("MaxResource"),
        stim_effects: stim_effects(ctx, t),
    }
}

/// Surgical kits are medical items that can restore a destroyed limb.
pub(super) fn build_medical_item(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> ItemProperties {
    let destroyed = t
        .prop("effects_damage")
        .and_then(|e| e.get("DestroyedPart"));
    match destroyed {
        Some(_) => ItemProperties::SurgicalKit(SurgicalKitProperties {
            uses: uses(t),
            use_time: t.f64_or_zero("medUseTime"),
            cures: cures(ctx, t),
            min_limb_health: effect_field(t, "effects_damage", "DestroyedPart", "healthPenaltyMin")
                .unwrap_or(0.0)
                / 100.0,
            max_limb_health: effect_field(t, "effects_damage", "DestroyedPart", "healthPenaltyMax")
                .unwrap_or(0.0)
                / 100.0,
        }),
        None => ItemProperties::MedicalItem(MedicalItemProperties {
            uses: uses(t),
            use_time: t.f64_or_zero("medUseTime"),
            cures: cures(ctx, t),
        }),
    }
}

pub(super) fn build_med_kit(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> MedKitProperties {
    MedKitProperties {
        hitpoints: t.i64_or_zero("MaxHpResource"),
        use_time: t.f64_or_zero("medUseTime"),
        max_heal_per_use: t.f64_or_zero("hpResourceRate"),
        cures: cures(ctx, t),
        hp_cost_light_bleeding: effect_field(t, "effects_damage", "LightBleeding", "cost").unwrap_or(0.0),
        hp_cost_heavy_bleeding: effect_field(t, "effects_damage", "HeavyBleeding", "cost").unwrap_or(0.0),
    }
}

pub(super) fn build_painkiller(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> PainkillerProperties {
    PainkillerProperties {
        uses: uses(t),
        use_time: t.f64_or_zero("medUseTime"),
        cures: cures(ctx, t),
        painkiller_duration: effect_field(t, "effects_damage", "Pain", "duration").unwrap_or(0.0),
        energy_impact: effect_field(t, "effects_health", "Energy", "value").unwrap_or(0.0),
        hydration_impact: effect_field(t, "effects_health", "Hydration", "value").unwrap_or(0.0),
    }
}

pub(super) fn build_stim(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> StimProperties {
    StimProperties {
        use_time: t.f64_or_zero("medUseTime"),
        cures: cures(ctx, t),
        stim_effects: stim_effects(ctx, t),
    }
}

pub(super) fn build_resource(t: &ItemTemplate) -> ResourceProperties {
    ResourceProperties {
        units: t.i64_or_zero("MaxResource"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::ItemProperties;
    use crate::globals::StimBuff;
    use crate::taxonomy;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn surgical_kit_when_destroyed_part_is_cured() {
        let fx = Fixture::new(vec![
            item(
                "cms",
                taxonomy::MEDICAL_SUPPLIES,
                json!({
                    "MaxHpResource": 5, "medUseTime": 16,
                    "effects_damage": {"DestroyedPart": {"healthPenaltyMin": 60, "healthPenaltyMax": 72}}
                }),
            ),
            item(
                "splint",
                taxonomy::MEDICAL_SUPPLIES,
                json!({"medUseTime": 5, "effects_damage": {"Fracture": {}}}),
            ),
        ]);
        assert_matches!(fx.derive("cms"), Some(ItemProperties::SurgicalKit(k)) => {
            assert_eq!(k.uses, 5);
            assert_eq!(k.min_limb_health, 0.6);
            assert_eq!(k.max_limb_health, 0.72);
            assert_eq!(k.cures, vec!["DESTROYEDPART"]);
        });
        assert_matches!(fx.derive("splint"), Some(ItemProperties::MedicalItem(m)) => {
            assert_eq!(m.uses, 1);
            assert_eq!(m.cures, vec!["FRACTURE"]);
        });
    }

    #[test]
    fn med_kit_bleeding_costs() {
        let fx = Fixture::new(vec![item(
            "salewa",
            taxonomy::MEDKIT,
            json!({
                "MaxHpResource": 400, "hpResourceRate": 85, "medUseTime": 3,
                "effects_damage": {"LightBleeding": {"cost": 45}, "HeavyBleeding": {"cost": 175}}
            }),
        )]);
        assert_matches!(fx.derive("salewa"), Some(ItemProperties::MedKit(m)) => {
            assert_eq!(m.hitpoints, 400);
            assert_eq!(m.hp_cost_light_bleeding, 45.0);
            assert_eq!(m.hp_cost_heavy_bleeding, 175.0);
        });
    }

    #[test]
    fn stim_effects_resolve_buff_groups() {
        let mut fx = Fixture::new(vec![item(
            "propital",
            taxonomy::STIMULATOR,
            json!({"medUseTime": 2, "StimulatorBuffs": "BuffsPropital"}),
        )]);
        fx.stim_buffs.insert(
            "BuffsPropital".into(),
            vec![StimBuff {
                buff_type: "SkillRate".into(),
                chance: 1.0,
                duration: 300.0,
                value: 20.0,
                skill_name: "Health".into(),
                ..Default::default()
            }],
        );
        assert_matches!(fx.derive("propital"), Some(ItemProperties::Stim(s)) => {
            assert_eq!(s.stim_effects.len(), 1);
            assert!(s.stim_effects[0].percent);
            assert_eq!(s.stim_effects[0].skill_name.as_deref(), Some("HEALTH"));
        });
    }

    #[test]
    fn food_reads_health_effects() {
        let fx = Fixture::new(vec![item(
            "water",
            taxonomy::DRINK,
            json!({"MaxResource": 1, "effects_health": {"Hydration": {"value": 60}, "Energy": {"value": -3}}}),
        )]);
        assert_matches!(fx.derive("water"), Some(ItemProperties::FoodDrink(f)) => {
            assert_eq!(f.hydration, 60.0);
            assert_eq!(f.energy, -3.0);
            assert_eq!(f.units, 1);
        });
    }
}
