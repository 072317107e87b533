//! Weapon presets and the preset aggregation calculator.
//!
//! A preset is a base item plus an ordered list of attached parts. Its
//! combined size, weight, value, ergonomics, recoil and accuracy are a pure
//! function of the base template, the part templates and the credits table.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::template::{ItemTemplate, TemplateCatalog};
use crate::types::{Credits, ItemId, LangCode};

/// Barrel deviation used when no part overrides it.
pub const DEFAULT_BARREL_DEVIATION_MAX: f64 = 100.0;

/// Weapon durability assumed for the accuracy figure.
pub const FULL_DURABILITY: f64 = 100.0;

/// Converts deviation into minutes of angle.
const MOA_DIVISOR: f64 = 2.9089;

const DIRECTIONS: [&str; 4] = ["Left", "Right", "Up", "Down"];

/* --------------------------------------------------------------------------
   Presets cache model
   -------------------------------------------------------------------------- */

/// One part of a preset build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresetPart {
    #[serde(rename = "item", deserialize_with = "part_item_id")]
    pub item_id: ItemId,
    #[serde(default = "one")]
    pub count: i64,
}

fn one() -> i64 {
    1
}

/// Parts are written either as a bare id or as `{ "id": ..., "name": ... }`.
fn part_item_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ItemId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PartRef {
        Id(String),
        Object { id: String },
    }
    Ok(match PartRef::deserialize(deserializer)? {
        PartRef::Id(id) | PartRef::Object { id } => id,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetLocale {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
}

/// A weapon build produced by the upstream presets job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: ItemId,
    pub base_id: ItemId,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Ordered parts; the base item itself is usually listed first.
    #[serde(default)]
    pub contains_items: Vec<PresetPart>,
    #[serde(default)]
    pub locale: BTreeMap<LangCode, PresetLocale>,
    #[serde(default)]
    pub background_color: Option<String>,
}

/// Contents of the presets job output file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetsCache {
    #[serde(default)]
    pub presets: BTreeMap<ItemId, Preset>,
}

impl PresetsCache {
    pub fn for_base<'a>(&'a self, base_id: &'a str) -> impl Iterator<Item = &'a Preset> + 'a {
        self.presets.values().filter(move |p| p.base_id == base_id)
    }

    pub fn default_for(&self, base_id: &str) -> Option<&Preset> {
        self.presets.values().find(|p| p.base_id == base_id && p.default)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) {
        self.presets.retain(|id, _| keep(id));
    }
}

/* --------------------------------------------------------------------------
   Aggregated stats
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetStats {
    pub width: i64,
    pub height: i64,
    pub weight: f64,
    pub base_value: i64,
    pub ergonomics: f64,
    pub vertical_recoil: i64,
    pub horizontal_recoil: i64,
    /// `None` when the base barrel curve yields no finite deviation.
    pub moa: Option<f64>,
}

/// Computes [`PresetStats`] against a read-only template catalog and credits table.
#[derive(Debug, Clone, Copy)]
pub struct PresetCalculator<'a> {
    templates: &'a TemplateCatalog,
    credits: &'a Credits,
}

impl<'a> PresetCalculator<'a> {
    pub fn new(templates: &'a TemplateCatalog, credits: &'a Credits) -> Self {
        Self { templates, credits }
    }

    /// Stats of a preset, or `None` when its base item is unknown.
    pub fn aggregate(&self, preset: &Preset) -> Option<PresetStats> {
        self.aggregate_build(&preset.id, &preset.base_id, &preset.contains_items)
    }

    /// Stats of an arbitrary build of `base_id` plus `parts`.
    ///
    /// `subject_id` only labels warnings.
    pub fn aggregate_build(
        &self,
        subject_id: &str,
        base_id: &str,
        parts: &[PresetPart],
    ) -> Option<PresetStats> {
        let Some(base) = self.templates.get(base_id) else {
            tracing::warn!(preset_id = subject_id, base_id, "Preset base item not found");
            return None;
        };

        let mut soft = [0.0_f64; 4];
        let mut hard = [0.0_f64; 4];
        let mut weight = base.f64_or_zero("Weight");
        let mut base_value = self.credits_of(subject_id, base_id);
        let mut ergonomics = base.f64_or_zero("Ergonomics");
        let base_vertical = base.f64_or_zero("RecoilForceUp");
        let base_horizontal = base.f64_or_zero("RecoilForceBack");
        let mut vertical = base_vertical;
        let mut horizontal = base_horizontal;
        let mut center_of_impact = base.f64_or_zero("CenterOfImpact");
        let mut resolved: Vec<&ItemTemplate> = Vec::with_capacity(parts.len());

        for part in parts {
            let Some(template) = self.templates.get(&part.item_id) else {
                tracing::warn!(preset_id = subject_id, part_id = %part.item_id, "Preset part not found");
                continue;
            };
            if template.id == base.id {
                continue;
            }
            resolved.push(template);

            let force_add = template.bool_or_false("ExtraSizeForceAdd");
            for (i, dir) in DIRECTIONS.iter().enumerate() {
                let extra = template.f64_or_zero(&format!("ExtraSize{dir}"));
                if force_add {
                    hard[i] += extra;
                } else if extra > soft[i] {
                    soft[i] = extra;
                }
            }

            let count = part.count as f64;
            weight += template.f64_or_zero("Weight") * count;
            match self.credits.get(&part.item_id) {
                Some(value) if *value != 0 => base_value += value * part.count,
                _ => tracing::warn!(
                    preset_id = subject_id,
                    part_id = %part.item_id,
                    "Preset part has no base value"
                ),
            }
            ergonomics += template.f64_or_zero("Ergonomics");
            let recoil = template.f64_or_zero("Recoil") / 100.0;
            vertical += base_vertical * recoil;
            horizontal += base_horizontal * recoil;
            if let Some(coi) = template.f64("CenterOfImpact") {
                center_of_impact += coi;
            }
            for slot in template.slots() {
                for plate in &slot.locked_plates {
                    base_value += self.credits_of(subject_id, plate);
                }
            }
        }

        let barrel_deviation_max = last_deviation_max(resolved.iter().copied());
        let deviation = barrel_deviation(
            base.f64_or_zero("DeviationCurve"),
            barrel_deviation_max,
            FULL_DURABILITY,
        );

        Some(PresetStats {
            width: (base.f64_or_zero("Width") + soft[0] + soft[1] + hard[0] + hard[1]) as i64,
            height: (base.f64_or_zero("Height") + soft[2] + soft[3] + hard[2] + hard[3]) as i64,
            weight: round_to(weight, 3),
            base_value,
            ergonomics,
            vertical_recoil: round_half_up(vertical) as i64,
            horizontal_recoil: round_half_up(horizontal) as i64,
            moa: moa(center_of_impact, deviation),
        })
    }

    fn credits_of(&self, subject_id: &str, id: &str) -> i64 {
        match self.credits.get(id) {
            Some(value) => *value,
            None => {
                tracing::warn!(preset_id = subject_id, id, "No base value");
                0
            }
        }
    }
}

/// The `DeviationMax` of the last part that defines a non-zero one.
///
/// Left-to-right fold, so the result depends on part order.
pub fn last_deviation_max<'a>(parts: impl IntoIterator<Item = &'a ItemTemplate>) -> f64 {
    parts
        .into_iter()
        .fold(DEFAULT_BARREL_DEVIATION_MAX, |current, part| {
            match part.f64("DeviationMax") {
                Some(max) if max != 0.0 => max,
                _ => current,
            }
        })
}

/// Barrel deviation for a weapon's `DeviationCurve` at the given durability.
pub fn barrel_deviation(deviation_curve: f64, barrel_deviation_max: f64, durability: f64) -> f64 {
    let num = 2.0 * deviation_curve;
    let num2 = if 100.0 - num == 0.0 {
        durability / num
    } else {
        (-deviation_curve + ((100.0 - num) * durability + deviation_curve).sqrt()) / (100.0 - num)
    };
    let num3 = 1.0 - num2;
    num3 * num3 * barrel_deviation_max + 2.0 * num2 * num3 * deviation_curve + num2 * num2
}

/// Minutes of angle for a cumulative center of impact and a barrel deviation.
pub fn moa(center_of_impact: f64, deviation: f64) -> Option<f64> {
    let raw = center_of_impact * deviation * 100.0 / MOA_DIVISOR;
    raw.is_finite().then(|| round_to(raw, 2))
}

/// Rounds half up (towards positive infinity), matching the published figures.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn template(id: &str, props: Value) -> ItemTemplate {
        serde_json::from_value(json!({
            "_id": id,
            "_name": id,
            "_parent": "weapon",
            "_type": "Item",
            "_props": props,
        }))
        .unwrap()
    }

    fn fixture() -> (TemplateCatalog, Credits) {
        let templates: TemplateCatalog = [
            template(
                "rifle",
                json!({
                    "Width": 4, "Height": 1, "Weight": 3.0, "Ergonomics": 40,
                    "RecoilForceUp": 100, "RecoilForceBack": 300,
                    "DeviationCurve": 1.35, "CenterOfImpact": 0.1
                }),
            ),
            template(
                "stock",
                json!({
                    "ExtraSizeLeft": 1, "Weight": 0.5, "Ergonomics": 10, "Recoil": -20,
                    "CenterOfImpact": 0.0
                }),
            ),
            template(
                "suppressor",
                json!({
                    "ExtraSizeRight": 2, "ExtraSizeForceAdd": true, "Weight": 0.4,
                    "Ergonomics": -8, "Recoil": -10, "DeviationMax": 20
                }),
            ),
            template(
                "barrel",
                json!({
                    "ExtraSizeRight": 1, "Weight": 0.7, "Ergonomics": -5, "Recoil": 0,
                    "DeviationMax": 28, "CenterOfImpact": 0.05
                }),
            ),
        ]
        .into_iter()
        .collect();
        let credits: Credits = [
            ("rifle", 20000),
            ("stock", 3000),
            ("suppressor", 9000),
            ("barrel", 5000),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        (templates, credits)
    }

    fn part(id: &str, count: i64) -> PresetPart {
        PresetPart { item_id: id.to_string(), count }
    }

    fn preset(parts: Vec<PresetPart>) -> Preset {
        Preset {
            id: "preset".into(),
            base_id: "rifle".into(),
            default: true,
            name: None,
            short_name: None,
            contains_items: parts,
            locale: BTreeMap::new(),
            background_color: None,
        }
    }

    // --- aggregation ---

    #[test]
    fn sums_size_weight_value_and_recoil() {
        let (templates, credits) = fixture();
        let calc = PresetCalculator::new(&templates, &credits);
        let stats = calc
            .aggregate(&preset(vec![
                part("rifle", 1),
                part("stock", 1),
                part("suppressor", 1),
                part("barrel", 1),
            ]))
            .unwrap();
        // 4 + soft(left 1) + soft(right 1) + hard(right 2)
        assert_eq!(stats.width, 8);
        assert_eq!(stats.height, 1);
        assert_eq!(stats.weight, 4.6);
        assert_eq!(stats.base_value, 37000);
        assert_eq!(stats.ergonomics, 37.0);
        assert_eq!(stats.vertical_recoil, 70);
        assert_eq!(stats.horizontal_recoil, 210);
    }

    #[test]
    fn sum_fields_are_order_invariant() {
        let (templates, credits) = fixture();
        let calc = PresetCalculator::new(&templates, &credits);
        let a = calc
            .aggregate(&preset(vec![part("stock", 1), part("suppressor", 1), part("barrel", 1)]))
            .unwrap();
        let b = calc
            .aggregate(&preset(vec![part("barrel", 1), part("stock", 1), part("suppressor", 1)]))
            .unwrap();
        assert_eq!(a.width, b.width);
        assert_eq!(a.weight, b.weight);
        assert_eq!(a.base_value, b.base_value);
        assert_eq!(a.ergonomics, b.ergonomics);
        assert_eq!(a.vertical_recoil, b.vertical_recoil);
        assert_eq!(a.horizontal_recoil, b.horizontal_recoil);
    }

    #[test]
    fn last_deviation_max_depends_on_order() {
        let (templates, _) = fixture();
        let suppressor = templates.get("suppressor").unwrap();
        let barrel = templates.get("barrel").unwrap();
        let stock = templates.get("stock").unwrap();
        assert_eq!(last_deviation_max([suppressor, barrel]), 28.0);
        assert_eq!(last_deviation_max([barrel, suppressor]), 20.0);
        assert_eq!(last_deviation_max([barrel, stock]), 28.0);
        assert_eq!(last_deviation_max([stock]), DEFAULT_BARREL_DEVIATION_MAX);
    }

    #[test]
    fn missing_parts_are_skipped_and_missing_base_yields_none() {
        let (templates, credits) = fixture();
        let calc = PresetCalculator::new(&templates, &credits);
        let stats = calc
            .aggregate(&preset(vec![part("ghost", 1), part("stock", 2)]))
            .unwrap();
        assert_eq!(stats.weight, 4.0);
        assert_eq!(stats.base_value, 26000);

        let mut orphan = preset(vec![part("stock", 1)]);
        orphan.base_id = "nothing".into();
        assert!(calc.aggregate(&orphan).is_none());
    }

    #[test]
    fn locked_plates_add_their_value() {
        let (mut templates, mut credits) = fixture();
        templates.insert(template(
            "plate_carrier_mod",
            json!({
                "Slots": [{
                    "_id": "s1", "_name": "front",
                    "_props": {"filters": [{"Filter": ["plate"], "Plate": "plate", "locked": true}]}
                }]
            }),
        ));
        credits.insert("plate_carrier_mod".into(), 100);
        credits.insert("plate".into(), 50);
        let calc = PresetCalculator::new(&templates, &credits);
        let stats = calc.aggregate(&preset(vec![part("plate_carrier_mod", 1)])).unwrap();
        assert_eq!(stats.base_value, 20150);
    }

    // --- accuracy ---

    #[test]
    fn moa_edge_case_at_curve_fifty() {
        let deviation = barrel_deviation(50.0, DEFAULT_BARREL_DEVIATION_MAX, FULL_DURABILITY);
        assert_eq!(deviation, 1.0);
        assert_eq!(moa(2.9089, deviation), Some(100.0));
    }

    #[test]
    fn moa_through_aggregation() {
        let templates: TemplateCatalog = [
            template("base", json!({"DeviationCurve": 50, "CenterOfImpact": 2.0})),
            template("muzzle", json!({"CenterOfImpact": 0.9089})),
        ]
        .into_iter()
        .collect();
        let credits = Credits::new();
        let calc = PresetCalculator::new(&templates, &credits);
        let stats = calc.aggregate_build("p", "base", &[part("muzzle", 1)]).unwrap();
        assert_eq!(stats.moa, Some(100.0));
    }

    #[test]
    fn default_preset_outlives_the_lookup_key() {
        let preset = |id: &str, default: bool| Preset {
            id: id.into(),
            base_id: "rifle".into(),
            default,
            name: None,
            short_name: None,
            contains_items: vec![part("rifle", 1)],
            locale: BTreeMap::new(),
            background_color: None,
        };
        let cache = PresetsCache {
            presets: BTreeMap::from([
                ("p1".to_string(), preset("p1", false)),
                ("p2".to_string(), preset("p2", true)),
            ]),
        };

        let found = {
            let key = String::from("rifle");
            cache.default_for(&key)
        };
        assert_eq!(found.map(|p| p.id.as_str()), Some("p2"));
        assert_eq!(cache.for_base("rifle").count(), 2);
        assert!(cache.default_for("stock").is_none());
    }

    #[test]
    fn parts_parse_from_object_or_id() {
        let parsed: Preset = serde_json::from_value(json!({
            "id": "p1",
            "baseId": "rifle",
            "default": true,
            "containsItems": [
                {"item": {"id": "rifle", "name": "Rifle"}, "count": 1},
                {"item": "stock"}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.contains_items, vec![part("rifle", 1), part("stock", 1)]);
    }
}
