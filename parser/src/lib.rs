//! Loads the JSON card, enemy and potion catalogs into `models` types.
//!
//! Every catalog is a JSON array of objects with camelCase keys. Catalog errors surface as
//! `anyhow` errors naming the offending entry.

mod json;

pub mod cards;
pub mod effects;
pub mod enemies;
pub mod potions;

pub use cards::{parse_card, parse_card_catalog};
pub use enemies::{parse_enemy, parse_enemy_catalog};
pub use json::JsonValue;
pub use potions::{parse_potion, parse_potion_catalog};

fn catalog_entries(json: &str, what: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    let root: serde_json::Value = serde_json::from_str(json)?;
    match root {
        serde_json::Value::Array(entries) => Ok(entries),
        _ => anyhow::bail!("{what} catalog must be a JSON array"),
    }
}
