//! Well-known category node ids of the engine taxonomy.
//!
//! These are stable template ids; classification rules and trader tables
//! refer to them by name instead of repeating the raw hex strings.

pub const AMMO: &str = "5485a8684bdc2da71d8b4567";
pub const AMMO_BOX: &str = "543be5cb4bdc2deb348b4568";

pub const ARMOR: &str = "5448e54d4bdc2dcc718b4568";
pub const CHEST_RIG: &str = "5448e5284bdc2dcb718b4567";
pub const BACKPACK: &str = "5448e53e4bdc2d60728b4567";
pub const VISORS: &str = "5448e5724bdc2ddf718b4568";
pub const HEADWEAR: &str = "5a341c4086f77401f2541505";
pub const ARMORED_EQUIPMENT: &str = "57bef4c42459772e8d35a53b";
pub const FACE_COVER: &str = "5a341c4686f77469e155819e";
pub const HEADPHONES: &str = "5645bcb74bdc2ded0b8b4578";
pub const ARMOR_PLATE: &str = "644120aa86ffbe10ee032b6f";
pub const BUILT_IN_INSERTS: &str = "65649eb40bf0ed77b8044453";

pub const THROW_WEAPON: &str = "543be6564bdc2df4348b4568";
pub const FOOD: &str = "5448e8d04bdc2ddf718b4569";
pub const DRINK: &str = "5448e8d64bdc2dce718b4568";

pub const SIMPLE_CONTAINER: &str = "5795f317245977243854e041";
pub const LOCKABLE_CONTAINER: &str = "5671435f4bdc2d96058b4569";
pub const MOB_CONTAINER: &str = "5448bf274bdc2dfc2f8b456a";
pub const RANDOM_LOOT_CONTAINER: &str = "62f109593b54472778797866";

pub const WEAPON: &str = "5422acb9af1c889c16000029";
pub const NIGHT_VISION: &str = "5a2c3a9486f774688b05e574";
pub const THERMAL_VISION: &str = "5d21f59b6dbe99052b54ef83";

pub const MOD: &str = "5448fe124bdc2da5018b4567";
pub const SIGHTS: &str = "5448fe7a4bdc2d6f028b456b";
pub const SPECIAL_SCOPE: &str = "55818aeb4bdc2ddc698b456a";
pub const MAGAZINE: &str = "5448bc234bdc2d3c308b4569";
pub const BARREL: &str = "555ef6e44bdc2de9068b457e";

pub const MEDICAL_SUPPLIES: &str = "5448f3ac4bdc2dce718b4569";
pub const MEDKIT: &str = "5448f39d4bdc2d0a728b4568";
pub const DRUGS: &str = "5448f3a14bdc2d27728b4569";
pub const STIMULATOR: &str = "5448f3a64bdc2d60728b456a";

pub const KEY: &str = "543be5e94bdc2df1348b4568";
pub const KEY_MECHANICAL: &str = "5c99f98d86f7745c314214b3";
pub const KEYCARD: &str = "5c164d2286f774194c5e69fa";
pub const KNIFE: &str = "5447e1d04bdc2dff2f8b4567";

pub const MONEY: &str = "543be5dd4bdc2deb348b4569";

/// Base currency (roubles) and the two foreign settlement currencies.
pub const CURRENCY_RUB: &str = "5449016a4bdc2d6f028b456f";
pub const CURRENCY_USD: &str = "5696686a4bdc2da3298b456a";
pub const CURRENCY_EUR: &str = "569668774bdc2da2298b4568";
