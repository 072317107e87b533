//! Trader sell prices.
//!
//! Every trader buys a fixed set of sell categories at a fixed multiplier
//! of the item's base value. Traders settling in a foreign currency convert
//! the rouble price at the current currency rate, and a price that rounds
//! to zero in the foreign currency is zero in roubles as well.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::preset::{round_half_up, PresetPart};
use crate::taxonomy;
use crate::template::TemplateCatalog;
use crate::types::Credits;

/* --------------------------------------------------------------------------
   Currencies
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Rub,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Self::Rub => "RUB",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    /// Template id of the currency item.
    pub fn item_id(self) -> &'static str {
        match self {
            Self::Rub => taxonomy::CURRENCY_RUB,
            Self::Usd => taxonomy::CURRENCY_USD,
            Self::Eur => taxonomy::CURRENCY_EUR,
        }
    }
}

/// Roubles per unit of each currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyRates {
    pub usd: f64,
    pub eur: f64,
}

impl CurrencyRates {
    /// Rates are the base values of the currency items.
    pub fn from_credits(credits: &Credits) -> Self {
        let rate = |id: &str| {
            credits.get(id).map(|v| *v as f64).unwrap_or_else(|| {
                tracing::warn!(currency_item = id, "No base value for currency item");
                0.0
            })
        };
        Self {
            usd: rate(taxonomy::CURRENCY_USD),
            eur: rate(taxonomy::CURRENCY_EUR),
        }
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Rub => 1.0,
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
        }
    }
}

/* --------------------------------------------------------------------------
   Traders
   -------------------------------------------------------------------------- */

#[derive(Debug, PartialEq)]
pub struct Trader {
    pub id: &'static str,
    pub name: &'static str,
    pub normalized_name: &'static str,
    /// Share of the base value paid for an item.
    pub multiplier: f64,
    pub currency: Currency,
}

pub static PRAPOR: Trader = Trader {
    id: "54cb50c76803fa8b248b4571",
    name: "Prapor",
    normalized_name: "prapor",
    multiplier: 0.50,
    currency: Currency::Rub,
};

pub static THERAPIST: Trader = Trader {
    id: "54cb57776803fa99248b456e",
    name: "Therapist",
    normalized_name: "therapist",
    multiplier: 0.63,
    currency: Currency::Rub,
};

pub static FENCE: Trader = Trader {
    id: "579dc571d53a0658a154fbec",
    name: "Fence",
    normalized_name: "fence",
    multiplier: 0.40,
    currency: Currency::Rub,
};

pub static SKIER: Trader = Trader {
    id: "58330581ace78e27b8b10cee",
    name: "Skier",
    normalized_name: "skier",
    multiplier: 0.49,
    currency: Currency::Rub,
};

pub static PEACEKEEPER: Trader = Trader {
    id: "5935c25fb3acc3127c3d8cd9",
    name: "Peacekeeper",
    normalized_name: "peacekeeper",
    multiplier: 0.50,
    currency: Currency::Usd,
};

pub static MECHANIC: Trader = Trader {
    id: "5a7c2eca46aef81a7ca2145d",
    name: "Mechanic",
    normalized_name: "mechanic",
    multiplier: 0.56,
    currency: Currency::Rub,
};

pub static RAGMAN: Trader = Trader {
    id: "5ac3b934156ae10c4430e83c",
    name: "Ragman",
    normalized_name: "ragman",
    multiplier: 0.62,
    currency: Currency::Rub,
};

pub static JAEGER: Trader = Trader {
    id: "5c0647fdd443bc2504c2d371",
    name: "Jaeger",
    normalized_name: "jaeger",
    multiplier: 0.60,
    currency: Currency::Rub,
};

/// Which traders buy items of one sell category.
#[derive(Debug)]
pub struct CategoryTraders {
    pub category_id: &'static str,
    pub name: &'static str,
    pub traders: &'static [&'static Trader],
}

pub static CATEGORY_TRADERS: &[CategoryTraders] = &[
    CategoryTraders { category_id: "5448ecbe4bdc2d60728b4568", name: "Info", traders: &[&FENCE, &PEACEKEEPER] },
    CategoryTraders { category_id: "55818aeb4bdc2ddc698b456a", name: "SpecialScope", traders: &[&FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "5448e8d64bdc2dce718b4568", name: "Drinks", traders: &[&THERAPIST, &FENCE, &JAEGER] },
    CategoryTraders { category_id: "5795f317245977243854e041", name: "SimpleContainer", traders: &[&THERAPIST, &FENCE, &RAGMAN] },
    CategoryTraders { category_id: "5c164d2286f774194c5e69fa", name: "Keycard", traders: &[&THERAPIST, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "5447e1d04bdc2dff2f8b4567", name: "Knife", traders: &[&FENCE, &JAEGER] },
    CategoryTraders { category_id: "57864a3d24597754843f8721", name: "Jewelry", traders: &[&THERAPIST, &FENCE, &SKIER, &PEACEKEEPER] },
    CategoryTraders { category_id: "5c99f98d86f7745c314214b3", name: "KeyMechanical", traders: &[&PRAPOR, &THERAPIST, &FENCE, &JAEGER] },
    CategoryTraders { category_id: "57864a66245977548f04a81f", name: "Electronics", traders: &[&THERAPIST, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "57864ada245977548638de91", name: "BuildingMaterial", traders: &[&PRAPOR, &THERAPIST, &FENCE, &JAEGER] },
    CategoryTraders { category_id: "5448eb774bdc2d0a728b4567", name: "BarterItems", traders: &[&PRAPOR, &THERAPIST, &FENCE, &SKIER] },
    CategoryTraders { category_id: "57bef4c42459772e8d35a53b", name: "ArmoredEquipment", traders: &[&FENCE, &SKIER, &PEACEKEEPER, &RAGMAN] },
    CategoryTraders { category_id: "5448f3a64bdc2d60728b456a", name: "Stimulator", traders: &[&PRAPOR, &THERAPIST, &FENCE, &JAEGER] },
    CategoryTraders { category_id: "5448f3ac4bdc2dce718b4569", name: "Medical", traders: &[&PRAPOR, &THERAPIST, &FENCE, &PEACEKEEPER, &RAGMAN, &JAEGER] },
    CategoryTraders { category_id: "5448f3a14bdc2d27728b4569", name: "Drugs", traders: &[&PRAPOR, &THERAPIST, &FENCE, &JAEGER] },
    CategoryTraders { category_id: "5448f39d4bdc2d0a728b4568", name: "Medkit", traders: &[&PRAPOR, &THERAPIST, &FENCE, &JAEGER] },
    CategoryTraders { category_id: "5448e8d04bdc2ddf718b4569", name: "Food", traders: &[&THERAPIST, &FENCE, &JAEGER] },
    CategoryTraders { category_id: "5671435f4bdc2d96058b4569", name: "LockableContainer", traders: &[&THERAPIST, &FENCE, &RAGMAN] },
    CategoryTraders { category_id: "55818add4bdc2d5b648b456f", name: "AssaultScopes", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "550aa4cd4bdc2dd8348b456c", name: "Silencer", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818ae44bdc2dde698b456c", name: "OpticScope", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818ad54bdc2ddc698b4569", name: "Collimator", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "5448e53e4bdc2d60728b4567", name: "Backpack", traders: &[&FENCE, &SKIER, &RAGMAN, &JAEGER] },
    CategoryTraders { category_id: "5448e5284bdc2dcb718b4567", name: "Vest", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &RAGMAN, &JAEGER] },
    CategoryTraders { category_id: "55818acf4bdc2dde698b456b", name: "CompactCollimator", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "5645bcb74bdc2ded0b8b4578", name: "Headphones", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &RAGMAN, &JAEGER] },
    CategoryTraders { category_id: "5447b5f14bdc2d61278b4567", name: "AssaultRifle", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC, &JAEGER] },
    CategoryTraders { category_id: "5447b5fc4bdc2d87278b4567", name: "AssaultCarbine", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "5447b6254bdc2dc3278b4568", name: "SniperRifle", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC, &JAEGER] },
    CategoryTraders { category_id: "5447bed64bdc2d97278b4568", name: "MachineGun", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC, &JAEGER] },
    CategoryTraders { category_id: "5447b6194bdc2d67278b4567", name: "MarksmanRifle", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC, &JAEGER] },
    CategoryTraders { category_id: "5447b5cf4bdc2d65278b4567", name: "Pistol", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "5447b6094bdc2dc3278b4567", name: "Shotgun", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC, &JAEGER] },
    CategoryTraders { category_id: "5447b5e04bdc2d62278b4567", name: "Smg", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "543be6564bdc2df4348b4568", name: "ThrowWeap", traders: &[&PRAPOR, &FENCE] },
    CategoryTraders { category_id: "5485a8684bdc2da71d8b4567", name: "Ammo", traders: &[&FENCE, &PRAPOR] },
    CategoryTraders { category_id: "5448bc234bdc2d3c308b4569", name: "Magazine", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818b164bdc2ddc698b456c", name: "TacticalCombo", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818b084bdc2d5b648b4571", name: "Flashlight", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818af64bdc2d5b648b4570", name: "Foregrip", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818a594bdc2db9688b456a", name: "Stock", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818a684bdc2ddd698b456d", name: "PistolGrip", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818b224bdc2dde698b456f", name: "Mount", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818a304bdc2db5418b457d", name: "Receiver", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818a6f4bdc2db9688b456b", name: "Charge", traders: &[&PRAPOR, &FENCE, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "56ea9461d2720b67698b456f", name: "Gasblock", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "550aa4bf4bdc2dd6348b456b", name: "FlashHider", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "550aa4dd4bdc2dc9348b4569", name: "MuzzleCombo", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "5a74651486f7744e73386dd1", name: "AuxiliaryMod", traders: &[&PRAPOR, &FENCE, &MECHANIC] },
    CategoryTraders { category_id: "55818a104bdc2db9688b4569", name: "Handguard", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "555ef6e44bdc2de9068b457e", name: "Barrel", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818afb4bdc2dde698b456d", name: "Bipod", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "55818ac54bdc2d5b648b456e", name: "IronSight", traders: &[&PRAPOR, &FENCE, &SKIER, &PEACEKEEPER, &MECHANIC] },
    CategoryTraders { category_id: "567849dd4bdc2d150f8b456e", name: "Map", traders: &[] },
    CategoryTraders { category_id: "5b3f15d486f77432d0509248", name: "ArmBand", traders: &[&RAGMAN] },
    CategoryTraders { category_id: "5447e0e74bdc2d3c308b4567", name: "SpecItem", traders: &[] },
    CategoryTraders { category_id: "543be5cb4bdc2deb348b4568", name: "AmmoBox", traders: &[&FENCE] },
    CategoryTraders { category_id: "543be5dd4bdc2deb348b4569", name: "Money", traders: &[] },
    CategoryTraders { category_id: "5448bf274bdc2dfc2f8b456a", name: "MobContainer", traders: &[] },
    CategoryTraders { category_id: "5447bedf4bdc2d87278b4568", name: "GrenadeLauncher", traders: &[] },
    CategoryTraders { category_id: "55818b014bdc2ddc698b456b", name: "Launcher", traders: &[] },
];

/// Traders buying specific items regardless of their category.
pub static ITEM_TRADERS: &[(&str, &[&Trader])] = &[
    // BEAR and USEC dogtags
    ("59f32bb586f774757e1e8442", &[&FENCE]),
    ("59f32c3b86f77472a31742f0", &[&FENCE]),
];

/// Sell categories that are expected to have no buyers.
pub const IGNORED_SELL_CATEGORIES: [&str; 3] = [
    taxonomy::MONEY,
    taxonomy::MOB_CONTAINER,
    taxonomy::RANDOM_LOOT_CONTAINER,
];

pub fn category_traders(category_id: &str) -> Option<&'static CategoryTraders> {
    CATEGORY_TRADERS.iter().find(|c| c.category_id == category_id)
}

/// First id in the item's ancestry that has a trader table entry.
pub fn resolve_sell_category(templates: &TemplateCatalog, item_id: &str) -> Option<&'static CategoryTraders> {
    templates
        .lineage(item_id)
        .into_iter()
        .find_map(category_traders)
}

/* --------------------------------------------------------------------------
   Quotes
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TraderPriceQuote {
    pub trader_id: String,
    pub trader_name: String,
    pub trader_normalized_name: String,
    pub price: i64,
    pub currency_code: Currency,
    pub currency_item_id: String,
    #[serde(rename = "priceRUB")]
    pub price_in_base_currency: i64,
}

/// Price a single trader pays for an item of the given base value.
pub fn quote(trader: &Trader, base_price: i64, rates: &CurrencyRates) -> TraderPriceQuote {
    let mut price_rub = (trader.multiplier * base_price as f64).floor() as i64;
    let mut price = price_rub;
    if trader.currency != Currency::Rub {
        let rate = rates.rate(trader.currency);
        let converted = if rate > 0.0 { price_rub as f64 / rate } else { 0.0 };
        price = if converted > 0.0 { round_half_up(converted) as i64 } else { 0 };
        if price == 0 {
            price_rub = 0;
        }
    }
    TraderPriceQuote {
        trader_id: trader.id.to_string(),
        trader_name: trader.name.to_string(),
        trader_normalized_name: trader.normalized_name.to_string(),
        price,
        currency_code: trader.currency,
        currency_item_id: trader.currency.item_id().to_string(),
        price_in_base_currency: price_rub,
    }
}

/// Base value of a template item, including locked built-in armor plates.
pub fn base_price_of(templates: &TemplateCatalog, credits: &Credits, item_id: &str) -> Option<i64> {
    let mut value = *credits.get(item_id)?;
    if let Some(template) = templates.get(item_id) {
        for slot in template.slots() {
            for plate in &slot.locked_plates {
                value += credits.get(plate).copied().unwrap_or(0);
            }
        }
    }
    Some(value)
}

/// Trader quotes against a read-only template catalog and currency rates.
#[derive(Debug, Clone, Copy)]
pub struct TraderPricing<'a> {
    templates: &'a TemplateCatalog,
    credits: &'a Credits,
    rates: CurrencyRates,
}

impl<'a> TraderPricing<'a> {
    pub fn new(templates: &'a TemplateCatalog, credits: &'a Credits) -> Self {
        Self {
            templates,
            credits,
            rates: CurrencyRates::from_credits(credits),
        }
    }

    pub fn rates(&self) -> CurrencyRates {
        self.rates
    }

    /// Quotes for a template item with the given base value.
    ///
    /// Returns the resolved category's traders plus any item-specific
    /// buyers; the bool is `false` when the category has no table entry and
    /// is not one of the ignored categories.
    pub fn quotes_for(&self, item_id: &str, base_price: i64) -> (Vec<TraderPriceQuote>, bool) {
        let category = resolve_sell_category(self.templates, item_id);
        let mut traders: Vec<&Trader> = category
            .map(|c| c.traders.iter().copied().collect())
            .unwrap_or_default();
        if let Some((_, extra)) = ITEM_TRADERS.iter().find(|(id, _)| *id == item_id) {
            for trader in extra.iter().copied() {
                if !traders.iter().any(|t| t.id == trader.id) {
                    traders.push(trader);
                }
            }
        }

        let mapped = category.is_some() || !traders.is_empty() || self.is_ignored(item_id);
        if !mapped {
            tracing::warn!(
                item_id,
                bsg_category_id = self.templates.get(item_id).and_then(|t| t.parent()),
                "No trader sell prices mapped"
            );
        }
        let quotes = traders
            .into_iter()
            .map(|t| quote(t, base_price, &self.rates))
            .collect();
        (quotes, mapped)
    }

    /// Per-trader sum of the parts' quotes, each multiplied by its count.
    ///
    /// Traders appear in the order they first quote a part. Parts without a
    /// base value contribute nothing.
    pub fn preset_quotes(&self, parts: &[PresetPart]) -> (Vec<TraderPriceQuote>, bool) {
        let mut totals: Vec<TraderPriceQuote> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut mapped = true;
        for part in parts {
            let Some(base_price) = base_price_of(self.templates, self.credits, &part.item_id) else {
                continue;
            };
            let (quotes, part_mapped) = self.quotes_for(&part.item_id, base_price);
            mapped &= part_mapped;
            for q in quotes {
                match index.get(&q.trader_id) {
                    Some(&i) => {
                        totals[i].price += q.price * part.count;
                        totals[i].price_in_base_currency += q.price_in_base_currency * part.count;
                    }
                    None => {
                        index.insert(q.trader_id.clone(), totals.len());
                        totals.push(TraderPriceQuote {
                            price: q.price * part.count,
                            price_in_base_currency: q.price_in_base_currency * part.count,
                            ..q
                        });
                    }
                }
            }
        }
        (totals, mapped)
    }

    fn is_ignored(&self, item_id: &str) -> bool {
        self.templates
            .get(item_id)
            .and_then(|t| t.parent())
            .is_some_and(|parent| IGNORED_SELL_CATEGORIES.contains(&parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn templates() -> TemplateCatalog {
        serde_json::from_value(json!({
            "5422acb9af1c889c16000029": {"_id": "5422acb9af1c889c16000029", "_name": "Weapon", "_parent": "", "_type": "Node", "_props": {}},
            "5447b5f14bdc2d61278b4567": {"_id": "5447b5f14bdc2d61278b4567", "_name": "AssaultRifle", "_parent": "5422acb9af1c889c16000029", "_type": "Node", "_props": {}},
            "ak": {"_id": "ak", "_name": "ak", "_parent": "5447b5f14bdc2d61278b4567", "_type": "Item", "_props": {}},
            "orphan": {"_id": "orphan", "_name": "orphan", "_parent": "5422acb9af1c889c16000029", "_type": "Item", "_props": {}},
            "cash": {"_id": "cash", "_name": "cash", "_parent": "543be5dd4bdc2deb348b4569", "_type": "Item", "_props": {}},
            "59f32bb586f774757e1e8442": {"_id": "59f32bb586f774757e1e8442", "_name": "tag", "_parent": "5422acb9af1c889c16000029", "_type": "Item", "_props": {}}
        }))
        .unwrap()
    }

    fn credits() -> Credits {
        [
            ("ak", 10000),
            ("orphan", 500),
            (taxonomy::CURRENCY_USD, 123),
            (taxonomy::CURRENCY_EUR, 135),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    // --- single quotes ---

    #[test]
    fn foreign_price_clamps_to_zero() {
        let rates = CurrencyRates { usd: 123.0, eur: 135.0 };
        let q = quote(&PEACEKEEPER, 1, &rates);
        assert_eq!(q.price, 0);
        assert_eq!(q.price_in_base_currency, 0);

        let q = quote(&PEACEKEEPER, 100, &rates);
        assert_eq!(q.price, 0);
        assert_eq!(q.price_in_base_currency, 0);
    }

    #[test]
    fn foreign_price_rounds_and_keeps_roubles() {
        let rates = CurrencyRates { usd: 123.0, eur: 135.0 };
        let q = quote(&PEACEKEEPER, 10000, &rates);
        assert_eq!(q.price_in_base_currency, 5000);
        assert_eq!(q.price, 41);
        assert_eq!(q.currency_code, Currency::Usd);
        assert_eq!(q.currency_item_id, taxonomy::CURRENCY_USD);
    }

    #[test]
    fn rouble_price_is_floored() {
        let rates = CurrencyRates { usd: 123.0, eur: 135.0 };
        let q = quote(&THERAPIST, 999, &rates);
        assert_eq!(q.price, 629);
        assert_eq!(q.price_in_base_currency, 629);
    }

    // --- category resolution ---

    #[test]
    fn quotes_follow_ancestry_category() {
        let (t, c) = (templates(), credits());
        let pricing = TraderPricing::new(&t, &c);
        let (quotes, mapped) = pricing.quotes_for("ak", 10000);
        assert!(mapped);
        let names: Vec<&str> = quotes.iter().map(|q| q.trader_name.as_str()).collect();
        assert_eq!(names, vec!["Prapor", "Fence", "Peacekeeper", "Mechanic", "Jaeger"]);
    }

    #[test]
    fn unmapped_and_ignored_categories_are_empty() {
        let (t, c) = (templates(), credits());
        let pricing = TraderPricing::new(&t, &c);
        let (quotes, mapped) = pricing.quotes_for("orphan", 500);
        assert!(quotes.is_empty());
        assert!(!mapped);
        let (quotes, mapped) = pricing.quotes_for("cash", 1);
        assert!(quotes.is_empty());
        assert!(mapped);
    }

    #[test]
    fn item_specific_buyers_are_added() {
        let (t, c) = (templates(), credits());
        let pricing = TraderPricing::new(&t, &c);
        let (quotes, _) = pricing.quotes_for("59f32bb586f774757e1e8442", 100);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].trader_id, FENCE.id);
    }

    #[test]
    fn preset_quotes_sum_parts() {
        let (t, c) = (templates(), credits());
        let pricing = TraderPricing::new(&t, &c);
        let parts = vec![
            PresetPart { item_id: "ak".into(), count: 1 },
            PresetPart { item_id: "ak".into(), count: 2 },
            PresetPart { item_id: "missing".into(), count: 1 },
        ];
        let (quotes, _) = pricing.preset_quotes(&parts);
        let prapor = quotes.iter().find(|q| q.trader_id == PRAPOR.id).unwrap();
        assert_eq!(prapor.price, 15000);
        let pk = quotes.iter().find(|q| q.trader_id == PEACEKEEPER.id).unwrap();
        assert_eq!(pk.price, 41 * 3);
        assert_eq!(pk.price_in_base_currency, 15000);
    }

    #[test]
    fn rates_come_from_currency_credits() {
        let rates = CurrencyRates::from_credits(&credits());
        assert_eq!(rates.rate(Currency::Rub), 1.0);
        assert_eq!(rates.rate(Currency::Usd), 123.0);
        assert_eq!(rates.rate(Currency::Eur), 135.0);
    }
}
