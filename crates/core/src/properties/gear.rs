use serde::Serialize;

use super::DeriveContext;
use crate::template::ItemTemplate;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GrenadeProperties {
    #[serde(rename = "type")]
    pub kind: String,
    pub fuse: f64,
    pub min_explosion_distance: f64,
    pub max_explosion_distance: f64,
    pub fragments: i64,
    pub contusion_radius: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NightVisionProperties {
    pub intensity: f64,
    pub noise_intensity: f64,
    pub noise_scale: f64,
    pub diffuse_intensity: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeyProperties {
    pub uses: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeleeProperties {
    pub slash_damage: f64,
    pub stab_damage: f64,
    pub hit_radius: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadphoneProperties {
    pub ambient_volume: f64,
    pub compressor_attack: f64,
    pub compressor_gain: f64,
    pub compressor_release: f64,
    pub compressor_threshold: f64,
    pub distortion: f64,
    pub dry_volume: f64,
    pub high_frequencies_gain: f64,
    pub resonance: f64,
}

pub(super) fn build_grenade(ctx: &DeriveContext<'_>, t: &ItemTemplate) -> GrenadeProperties {
    GrenadeProperties {
        kind: ctx.translator.translate(t.str("ThrowType").unwrap_or_default()),
        fuse: t.f64_or_zero("explDelay"),
        min_explosion_distance: t.f64_or_zero("MinExplosionDistance"),
        max_explosion_distance: t.f64_or_zero("MaxExplosionDistance"),
        fragments: t.i64_or_zero("FragmentsCount"),
        contusion_radius: t.f64_or_zero("ContusionDistance"),
    }
}

pub(super) fn build_night_vision(t: &ItemTemplate) -> NightVisionProperties {
    NightVisionProperties {
        intensity: t.f64_or_zero("Intensity"),
        noise_intensity: t.f64_or_zero("NoiseIntensity"),
        noise_scale: t.f64_or_zero("NoiseScale"),
        diffuse_intensity: t.f64_or_zero("DiffuseIntensity"),
    }
}

pub(super) fn build_key(t: &ItemTemplate) -> KeyProperties {
    KeyProperties {
        uses: t.i64_or_zero("MaximumNumberOfUsage"),
    }
}

pub(super) fn build_melee(t: &ItemTemplate) -> MeleeProperties {
    MeleeProperties {
        slash_damage: t.f64_or_zero("knifeHitSlashDam"),
        stab_damage: t.f64_or_zero("knifeHitStabDam"),
        hit_radius: t.f64_or_zero("knifeHitRadius"),
    }
}

pub(super) fn build_headphone(t: &ItemTemplate) -> HeadphoneProperties {
    HeadphoneProperties {
        ambient_volume: t.f64_or_zero("AmbientVolume"),
        compressor_attack: t.f64_or_zero("CompressorAttack"),
        compressor_gain: t.f64_or_zero("CompressorGain"),
        compressor_release: t.f64_or_zero("CompressorRelease"),
        compressor_threshold: t.f64_or_zero("CompressorTreshold"),
        distortion: t.f64_or_zero("Distortion"),
        dry_volume: t.f64_or_zero("DryVolume"),
        high_frequencies_gain: t.f64_or_zero("HighFrequenciesGain"),
        resonance: t.f64_or_zero("Resonance"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::ItemProperties;
    use crate::taxonomy;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn grenade_type_is_translated() {
        let fx = Fixture::new(vec![item(
            "f1",
            taxonomy::THROW_WEAPON,
            json!({"ThrowType": "frag_grenade", "explDelay": 3.5, "FragmentsCount": 70}),
        )]);
        assert_matches!(fx.derive("f1"), Some(ItemProperties::Grenade(g)) => {
            assert_eq!(g.kind, "FRAG_GRENADE");
            assert_eq!(g.fuse, 3.5);
            assert_eq!(g.fragments, 70);
        });
    }

    #[test]
    fn keys_require_a_key_parent() {
        let fx = Fixture::new(vec![
            item("dorm", taxonomy::KEY_MECHANICAL, json!({"MaximumNumberOfUsage": 40})),
            item("labs", taxonomy::KEYCARD, json!({"MaximumNumberOfUsage": 10})),
            item("odd", taxonomy::KEY, json!({"MaximumNumberOfUsage": 1})),
        ]);
        assert_matches!(fx.derive("dorm"), Some(ItemProperties::Key(k)) => assert_eq!(k.uses, 40));
        assert_matches!(fx.derive("labs"), Some(ItemProperties::Key(k)) => assert_eq!(k.uses, 10));
        assert_eq!(fx.derive("odd"), None);
    }

    #[test]
    fn melee_and_headphones() {
        let fx = Fixture::new(vec![
            item("kiba", taxonomy::KNIFE, json!({"knifeHitSlashDam": 45, "knifeHitStabDam": 60})),
            item("comtac", taxonomy::HEADPHONES, json!({"AmbientVolume": -5, "Distortion": 0.2})),
        ]);
        assert_matches!(fx.derive("kiba"), Some(ItemProperties::Melee(m)) => {
            assert_eq!(m.slash_damage, 45.0);
            assert_eq!(m.stab_damage, 60.0);
        });
        assert_matches!(fx.derive("comtac"), Some(ItemProperties::Headphone(h)) => {
            assert_eq!(h.ambient_volume, -5.0);
            assert_eq!(h.distortion, 0.2);
        });
    }
}
