//! Game data DTOs
//!
//! Passive types for items, ARC enemies and maps as served by the proxy.
//! Enumerated string fields fall back to `Unknown` so one unfamiliar
//! category never fails a whole collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// JSON envelope returned by the collection endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Upstream fetch time; any JSON number
    #[serde(default)]
    pub timestamp: Option<f64>,
}

// == Items ==

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    Material,
    Mod,
    Utility,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeMaterial {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftingRecipe {
    pub materials: Vec<RecipeMaterial>,
    #[serde(default)]
    pub crafting_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub rarity: Rarity,
    /// Named numeric stats (damage, armor, fireRate, ...)
    #[serde(default)]
    pub stats: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub crafting_recipe: Option<CraftingRecipe>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub obtainable_sources: Vec<String>,
}

// == ARC enemies ==

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcType {
    Basic,
    Elite,
    Boss,
    Special,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcStats {
    pub health: f64,
    #[serde(default)]
    pub armor: Option<f64>,
    pub damage: f64,
    pub speed: f64,
    pub attack_range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcAbility {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cooldown: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootDrop {
    pub item_id: String,
    /// Probability in 0..=1
    pub drop_rate: f64,
}

/// An ARC (enemy machine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcEnemy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub arc_type: ArcType,
    /// 1 (easy) to 5 (extreme)
    pub difficulty: u8,
    pub stats: ArcStats,
    #[serde(default)]
    pub abilities: Vec<ArcAbility>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub resistances: Vec<String>,
    #[serde(default)]
    pub loot: Vec<LootDrop>,
    /// Map ids where this ARC spawns
    #[serde(default)]
    pub spawns_on: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

// == Maps ==

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Resource,
    Spawn,
    Poi,
    Extraction,
    DangerZone,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSize {
    Small,
    Medium,
    Large,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub related_items: Vec<String>,
    #[serde(default, rename = "relatedARCs")]
    pub related_arcs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMap {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub size: MapSize,
    pub difficulty: u8,
    #[serde(default)]
    pub locations: Vec<MapLocation>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub weather_conditions: Vec<String>,
}

/// Types that carry a string id, for lookups by id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for ArcEnemy {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for GameMap {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_deserialize() {
        let item: Item = serde_json::from_value(json!({
            "id": "ferro-1",
            "name": "Ferro",
            "description": "Break-action rifle",
            "type": "weapon",
            "rarity": "rare",
            "stats": { "damage": 40.0, "fireRate": 1.5 },
            "craftingRecipe": {
                "materials": [{ "itemId": "metal-parts", "quantity": 4 }]
            },
            "tags": ["rifle"]
        }))
        .unwrap();

        assert_eq!(item.item_type, ItemType::Weapon);
        assert_eq!(item.rarity, Rarity::Rare);
        assert_eq!(item.stats.unwrap()["fireRate"], 1.5);
        assert_eq!(item.crafting_recipe.unwrap().materials[0].quantity, 4);
        assert!(item.obtainable_sources.is_empty());
    }

    #[test]
    fn test_unknown_enum_values_tolerated() {
        let item: Item = serde_json::from_value(json!({
            "id": "x", "name": "X", "type": "gadget", "rarity": "mythic"
        }))
        .unwrap();
        assert_eq!(item.item_type, ItemType::Unknown);
        assert_eq!(item.rarity, Rarity::Unknown);
    }

    #[test]
    fn test_arc_deserialize() {
        let arc: ArcEnemy = serde_json::from_value(json!({
            "id": "tick",
            "name": "Tick",
            "description": "Small crawler",
            "type": "basic",
            "difficulty": 1,
            "stats": { "health": 50, "damage": 10, "speed": 6, "attackRange": 2 },
            "loot": [{ "itemId": "arc-alloy", "dropRate": 0.25 }],
            "spawnsOn": ["dam"]
        }))
        .unwrap();
        assert_eq!(arc.arc_type, ArcType::Basic);
        assert_eq!(arc.loot[0].drop_rate, 0.25);
        assert_eq!(arc.id(), "tick");
    }

    #[test]
    fn test_map_deserialize() {
        let map: GameMap = serde_json::from_value(json!({
            "id": "dam",
            "name": "Dam Battlegrounds",
            "size": "large",
            "difficulty": 3,
            "locations": [{
                "id": "control-tower",
                "name": "Control Tower",
                "type": "danger_zone",
                "coordinates": { "x": 10.5, "y": -3.0 },
                "relatedARCs": ["bastion"]
            }]
        }))
        .unwrap();
        assert_eq!(map.size, MapSize::Large);
        assert_eq!(map.locations[0].location_type, LocationType::DangerZone);
        assert_eq!(map.locations[0].related_arcs, vec!["bastion"]);
    }

    #[test]
    fn test_api_response_envelope() {
        let resp: ApiResponse<Vec<String>> =
            serde_json::from_value(json!({ "data": ["a"], "timestamp": 17, "cached": true }))
                .unwrap();
        assert_eq!(resp.data, vec!["a"]);
        assert_eq!(resp.timestamp, Some(17.0));
        assert!(resp.error.is_none());

        let fractional: ApiResponse<Vec<String>> =
            serde_json::from_value(json!({ "data": [], "timestamp": 1.5 })).unwrap();
        assert_eq!(fractional.timestamp, Some(1.5));
    }
}
