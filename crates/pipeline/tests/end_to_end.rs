//! Full builds against directory fixtures and an in-memory key-value store.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use stash_core::overrides::ItemOverride;
use stash_pipeline::{BuildOptions, BuildSources, BuildStatus, CatalogBuilder, SCHEMA_KEY};
use stash_publish::{InMemoryKv, KvStore, SnapshotPublisher, WebhookAlerter, DEFAULT_KEY};
use stash_sources::{DirectoryGameDataSource, InMemoryOverrideSource, NoopPresetJobTrigger, PresetStore};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const ROOT: &str = "54009119af1c881c07000029";
const AMMO: &str = "5485a8684bdc2da71d8b4567";
const WEAPON: &str = "5422acb9af1c889c16000029";
const ASSAULT_RIFLE: &str = "5447b5f14bdc2d61278b4567";
const MOD: &str = "5448fe124bdc2da5018b4567";
const STOCK: &str = "55818a594bdc2db9688b456a";
const HANDGUARD: &str = "55818a104bdc2db9688b4569";
const USD: &str = "5696686a4bdc2da3298b456a";

const ROUND: &str = "56dff3afd2720bba668b4567";
const RIFLE: &str = "5447a9cd4bdc2dbd208b4567";
const RIFLE_PRESET: &str = "5a8ae43686f774377b73cfb3";
const STOCK_PART: &str = "5649b0544bdc2d1b2b8b458a";
const HANDGUARD_PART: &str = "5648b1504bdc2d9d488b4584";

fn node(id: &str, parent: &str, name: &str) -> Value {
    json!({"_id": id, "_name": name, "_parent": parent, "_type": "Node", "_props": {}})
}

fn item(id: &str, parent: &str, props: Value) -> Value {
    json!({"_id": id, "_name": id, "_parent": parent, "_type": "Item", "_props": props})
}

fn write(dir: &Path, name: &str, value: Value) {
    std::fs::write(dir.join(format!("{name}.json")), value.to_string()).unwrap();
}

fn seed(dir: &Path) {
    let templates = [
        node(ROOT, "", "Item"),
        node(AMMO, ROOT, "Ammo"),
        node(WEAPON, ROOT, "Weapon"),
        node(ASSAULT_RIFLE, WEAPON, "AssaultRifle"),
        node(MOD, ROOT, "Mod"),
        node(STOCK, MOD, "Stock"),
        node(HANDGUARD, MOD, "Handguard"),
        item(ROUND, AMMO, json!({"Width": 1, "Height": 1, "Weight": 0.012, "Caliber": "Caliber556x45NATO", "Damage": 54, "PenetrationPower": 33})),
        item(
            RIFLE,
            ASSAULT_RIFLE,
            json!({
                "Width": 4, "Height": 2, "Weight": 2.9,
                "Ergonomics": 50, "RecoilForceUp": 100, "RecoilForceBack": 300,
                "DeviationCurve": 1.35, "DeviationMax": 23, "CenterOfImpact": 0.01,
                "ammoCaliber": "Caliber556x45NATO", "defAmmo": ROUND,
                "weapFireType": ["single", "fullauto"],
                "Chambers": [{"_props": {"filters": [{"Filter": [ROUND]}]}}]
            }),
        ),
        item(STOCK_PART, STOCK, json!({"Weight": 0.3, "Ergonomics": 10, "Recoil": -20, "ExtraSizeRight": 1})),
        item(HANDGUARD_PART, HANDGUARD, json!({"Weight": 0.2, "Ergonomics": 5, "Recoil": -2})),
    ];
    let templates: serde_json::Map<String, Value> = templates
        .into_iter()
        .map(|t| (t["_id"].as_str().unwrap().to_string(), t))
        .collect();
    write(dir, "items", Value::Object(templates));

    write(
        dir,
        "locales",
        json!({"en": {
            "templates": {
                ROUND: {"Name": "5.56x45mm M855", "ShortName": "M855", "Description": "A round."},
                RIFLE: {"Name": "Colt M4A1 5.56x45 assault rifle", "ShortName": "M4A1"},
                STOCK_PART: {"Name": "Buffer tube stock", "ShortName": "Stock"},
                HANDGUARD_PART: {"Name": "Handguard", "ShortName": "HG"},
                AMMO: {"Name": "Ammo"},
                WEAPON: {"Name": "Weapon"},
                ASSAULT_RIFLE: {"Name": "Assault rifle"}
            },
            "interface": {"single": "Single fire", "fullauto": "Full auto"}
        }}),
    );
    write(dir, "globals", json!({}));
    write(
        dir,
        "credits",
        json!({ROUND: 100, RIFLE: 20000, STOCK_PART: 3000, HANDGUARD_PART: 2000, USD: 140}),
    );
    write(
        dir,
        "handbook",
        json!({
            "Categories": [
                {"Id": "hb_weapons", "ParentId": null},
                {"Id": "hb_rifles", "ParentId": "hb_weapons"},
                {"Id": "hb_ammo", "ParentId": null}
            ],
            "Items": [
                {"Id": ROUND, "ParentId": "hb_ammo", "Price": 100},
                {"Id": RIFLE, "ParentId": "hb_rifles", "Price": 20000}
            ]
        }),
    );
    write(
        dir,
        "presets",
        json!({"presets": {
            RIFLE_PRESET: {
                "id": RIFLE_PRESET,
                "baseId": RIFLE,
                "default": true,
                "name": "Colt M4A1 Default",
                "containsItems": [
                    {"item": RIFLE, "count": 1},
                    {"item": STOCK_PART, "count": 1},
                    {"item": HANDGUARD_PART, "count": 1}
                ],
                "locale": {"en": {"name": "Colt M4A1 Default", "shortName": "M4A1"}}
            }
        }}),
    );
}

fn overrides() -> InMemoryOverrideSource {
    let row = |id: &str, slug: &str, types: &[&str]| ItemOverride {
        id: id.into(),
        normalized_name: Some(slug.into()),
        types: types.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    };
    InMemoryOverrideSource::new([
        row(ROUND, "556x45mm-m855", &["ammo"]),
        row(RIFLE, "colt-m4a1-556x45-assault-rifle", &["gun", "no-flea"]),
        row(RIFLE_PRESET, "colt-m4a1-default", &["preset", "gun"]),
    ])
}

fn builder(dir: &Path, kv: Arc<dyn KvStore>) -> CatalogBuilder {
    let sources = BuildSources {
        game: Box::new(DirectoryGameDataSource::new(dir)),
        presets: PresetStore::new(dir, Box::new(NoopPresetJobTrigger)),
        overrides: Box::new(overrides()),
    };
    let publisher = SnapshotPublisher::new(kv, DEFAULT_KEY, dir.join("dumps"));
    CatalogBuilder::new(sources, publisher, WebhookAlerter::disabled(), BuildOptions::default())
}

async fn published(kv: &InMemoryKv, key: &str) -> Value {
    serde_json::from_slice(&kv.get(key).await.expect("value was published")).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn three_item_catalog_publishes_three_entries() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let kv = Arc::new(InMemoryKv::new());

    let report = builder(dir.path(), kv.clone()).run().await;
    assert_eq!(report.status, BuildStatus::Published, "{:?}", report.error);
    assert_eq!(report.item_count, 3);

    let snapshot = published(&kv, DEFAULT_KEY).await;
    let data = snapshot["data"].as_object().unwrap();
    assert_eq!(data.len(), 3);

    let expected = [
        (ROUND, "ItemPropertiesAmmo", 2),
        (RIFLE, "ItemPropertiesWeapon", 5),
        // Rifle traders plus Skier, who buys the handguard.
        (RIFLE_PRESET, "ItemPropertiesPreset", 6),
    ];
    for (id, properties_type, traders) in expected {
        let entry = &data[id];
        assert_eq!(entry["properties"]["propertiesType"], properties_type, "{id}");
        assert!(!entry["categories"].as_array().unwrap().is_empty(), "{id}");
        assert_eq!(entry["traderPrices"].as_array().unwrap().len(), traders, "{id}");
    }
}

#[tokio::test]
async fn entries_carry_quotes_presets_and_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let kv = Arc::new(InMemoryKv::new());
    builder(dir.path(), kv.clone()).run().await;

    let snapshot = published(&kv, DEFAULT_KEY).await;
    let round = &snapshot["data"][ROUND];
    let rifle = &snapshot["data"][RIFLE];
    let preset = &snapshot["data"][RIFLE_PRESET];

    // Prapor pays half the base value in roubles.
    let prapor = round["traderPrices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|q| q["traderNormalizedName"] == "prapor")
        .unwrap();
    assert_eq!(prapor["price"], 50);
    assert_eq!(prapor["priceRUB"], 50);

    // Peacekeeper converts to dollars.
    let peacekeeper = rifle["traderPrices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|q| q["traderNormalizedName"] == "peacekeeper")
        .unwrap();
    assert_eq!(peacekeeper["currencyCode"], "USD");
    assert_eq!(peacekeeper["price"], 71);

    assert_eq!(round["name"], "5.56x45mm M855");
    assert_eq!(round["iconLink"], "https://assets.tarkov.dev/unknown-item-icon.jpg");
    assert_eq!(round["link"], "https://tarkov.dev/item/556x45mm-m855");
    assert_eq!(round["handbookCategories"], json!(["hb_ammo"]));

    assert_eq!(rifle["properties"]["defaultPreset"], RIFLE_PRESET);
    assert_eq!(rifle["properties"]["presets"], json!([RIFLE_PRESET]));
    assert_eq!(rifle["properties"]["defaultAmmo"], ROUND);
    assert_eq!(rifle["properties"]["defaultWidth"], 5);
    assert_eq!(rifle["handbookCategories"], json!(["hb_rifles", "hb_weapons"]));
    assert_eq!(rifle["categories"], json!([ASSAULT_RIFLE, WEAPON, ROOT]));

    assert_eq!(preset["name"], "Colt M4A1 Default");
    assert_eq!(preset["properties"]["baseItemId"], RIFLE);
    assert_eq!(preset["properties"]["default"], true);
    assert_eq!(preset["basePrice"], 25000);
    assert_eq!(preset["types"], json!(["preset", "gun", "noFlea"]));
    assert_eq!(preset["containsItems"], json!([{"item": RIFLE, "count": 1}]));
    assert_eq!(preset["handbookCategories"], rifle["handbookCategories"]);

    assert_eq!(snapshot["itemTypes"], json!(["any", "ammo", "gun", "noFlea", "preset"]));
    assert_eq!(snapshot["languageCodes"], json!(["en"]));

    let schema = published(&kv, SCHEMA_KEY).await;
    assert_eq!(schema["ItemType"], "any\n ammo\n gun\n noFlea\n preset");
}

#[tokio::test]
async fn rejected_write_leaves_a_dump_and_reports_unpublished() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let kv = Arc::new(InMemoryKv::rejecting());

    let report = builder(dir.path(), kv.clone()).run().await;
    assert_eq!(report.status, BuildStatus::ComputedButUnpublished);
    assert_eq!(report.item_count, 3);
    assert!(report.error.is_some());

    let dump: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("dumps").join("item_data.json")).unwrap()).unwrap();
    assert_eq!(dump["data"].as_object().unwrap().len(), 3);
    assert!(kv.get(SCHEMA_KEY).await.is_none());
}

#[tokio::test]
async fn failed_load_publishes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    std::fs::remove_file(dir.path().join("credits.json")).unwrap();
    let kv = Arc::new(InMemoryKv::new());

    let report = builder(dir.path(), kv.clone()).run().await;
    assert_eq!(report.status, BuildStatus::Failed);
    assert_eq!(report.item_count, 0);
    assert!(kv.get(DEFAULT_KEY).await.is_none());
    assert!(!dir.path().join("dumps").exists());
}
