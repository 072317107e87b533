use serde::Serialize;

use crate::template::ItemTemplate;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmmoProperties {
    pub caliber: Option<String>,
    pub stack_max_size: i64,
    pub tracer: bool,
    pub tracer_color: Option<String>,
    pub ammo_type: Option<String>,
    pub projectile_count: i64,
    pub damage: f64,
    pub armor_damage: f64,
    pub fragmentation_chance: f64,
    pub ricochet_chance: f64,
    pub penetration_chance: f64,
    pub penetration_power: f64,
    pub accuracy_modifier: f64,
    pub recoil_modifier: f64,
    pub initial_speed: f64,
    pub light_bleed_modifier: f64,
    pub heavy_bleed_modifier: f64,
    pub durability_burn_factor: f64,
    pub heat_factor: f64,
    pub stamina_burn_per_damage: f64,
    pub ballistic_coeficient: f64,
    pub bullet_diameter_millimeters: f64,
    pub bullet_mass_grams: f64,
}

pub(super) fn build(t: &ItemTemplate) -> AmmoProperties {
    AmmoProperties {
        caliber: t.str("Caliber").map(str::to_string),
        stack_max_size: t.i64_or_zero("StackMaxSize"),
        tracer: t.bool_or_false("Tracer"),
        tracer_color: t.str("TracerColor").map(str::to_string),
        ammo_type: t.str("ammoType").map(str::to_string),
        projectile_count: t.i64_or_zero("ProjectileCount"),
        damage: t.f64_or_zero("Damage"),
        armor_damage: t.f64_or_zero("ArmorDamage"),
        fragmentation_chance: t.f64_or_zero("FragmentationChance"),
        ricochet_chance: t.f64_or_zero("RicochetChance"),
        penetration_chance: t.f64_or_zero("PenetrationChance"),
        penetration_power: t.f64_or_zero("PenetrationPower"),
        accuracy_modifier: t.f64_or_zero("ammoAccr") / 100.0,
        recoil_modifier: t.f64_or_zero("ammoRec") / 100.0,
        initial_speed: t.f64_or_zero("InitialSpeed"),
        light_bleed_modifier: t.f64_or_zero("LightBleedingDelta"),
        heavy_bleed_modifier: t.f64_or_zero("HeavyBleedingDelta"),
        durability_burn_factor: t.f64_or_zero("DurabilityBurnModificator"),
        heat_factor: t.f64_or_zero("HeatFactor"),
        stamina_burn_per_damage: t.f64_or_zero("StaminaBurnPerDamage"),
        ballistic_coeficient: t.f64_or_zero("BallisticCoeficient"),
        bullet_diameter_millimeters: t.f64_or_zero("BulletDiameterMilimeters"),
        bullet_mass_grams: t.f64_or_zero("BulletMassGram"),
    }
}
