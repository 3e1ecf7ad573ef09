//! Item catalog supplied by the configuration layer
//!
//! Banners only reference item ids. The catalog carries what the engine needs
//! beyond the id: the item's native rarity (for cross-checking banner pools)
//! and its type (for the 4★ character/weapon split).

use super::config::{ItemId, Rarity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Character,
    Weapon,
}

impl ItemType {
    /// Characters sort before weapons in display order
    pub fn display_rank(&self) -> u8 {
        match self {
            ItemType::Character => 0,
            ItemType::Weapon => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub rarity: Rarity,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Element, weapon class or similar grouping; free-form
    #[serde(default)]
    pub affiliated_type: String,
}

/// Items indexed by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, CatalogItem>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates replace earlier ones
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        Ok(Self::from_items(items))
    }

    pub fn insert(&mut self, item: CatalogItem) -> Option<CatalogItem> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    pub fn item_type(&self, id: &str) -> Option<ItemType> {
        self.items.get(id).map(|item| item.item_type)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    pub fn by_rarity(&self, rarity: Rarity) -> Vec<&CatalogItem> {
        self.items.values().filter(|item| item.rarity == rarity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, rarity: Rarity, item_type: ItemType) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            rarity,
            item_type,
            affiliated_type: String::new(),
        }
    }

    #[test]
    fn test_parse_catalog_json() {
        let json = r#"[
            {"id": "nereid", "name": "Nereid", "rarity": "5star", "type": "character", "affiliated_type": "hydro"},
            {"id": "kelp", "name": "Kelp Blade", "rarity": "4star", "type": "weapon"}
        ]"#;
        let catalog = ItemCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.item_type("nereid"), Some(ItemType::Character));
        assert_eq!(catalog.get("kelp").unwrap().affiliated_type, "");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_by_rarity_and_replace() {
        let mut catalog = ItemCatalog::from_items(vec![
            item("a", Rarity::FourStar, ItemType::Weapon),
            item("b", Rarity::FourStar, ItemType::Character),
            item("c", Rarity::ThreeStar, ItemType::Weapon),
        ]);
        assert_eq!(catalog.by_rarity(Rarity::FourStar).len(), 2);

        let replaced = catalog.insert(item("c", Rarity::FourStar, ItemType::Weapon));
        assert!(replaced.is_some());
        assert_eq!(catalog.by_rarity(Rarity::FourStar).len(), 3);
        assert!(catalog.by_rarity(Rarity::ThreeStar).is_empty());
    }
}
