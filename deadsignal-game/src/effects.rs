//! Modifier folds for owned perks and constructed buildings.
//!
//! Both folds are commutative: bonuses add, multipliers multiply, so the
//! order perks were picked or buildings raised never changes the result.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::state::{Player, Settlement};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerkEffects {
    pub scrap_bonus: f32,
    pub electronics_bonus: f32,
    pub food_bonus: f32,
    pub water_bonus: f32,
    pub encounter_mod: f32,
    pub item_bonus: f32,
    pub rare_loot_bonus: f32,
    pub hunger_decay_mult: f32,
    pub thirst_decay_mult: f32,
    pub damage_mult: f32,
    pub flee_bonus: f32,
    pub salvage_cost_mult: f32,
    pub on_kill_heal: f32,
    /// Fractional retaliation reduction while body armor is worn.
    pub armor_bonus: f32,
}

impl Default for PerkEffects {
    fn default() -> Self {
        Self {
            scrap_bonus: 0.0,
            electronics_bonus: 0.0,
            food_bonus: 0.0,
            water_bonus: 0.0,
            encounter_mod: 0.0,
            item_bonus: 0.0,
            rare_loot_bonus: 0.0,
            hunger_decay_mult: 1.0,
            thirst_decay_mult: 1.0,
            damage_mult: 1.0,
            flee_bonus: 0.0,
            salvage_cost_mult: 1.0,
            on_kill_heal: 0.0,
            armor_bonus: 0.0,
        }
    }
}

impl PerkEffects {
    #[must_use]
    pub fn combine(self, other: &Self) -> Self {
        Self {
            scrap_bonus: self.scrap_bonus + other.scrap_bonus,
            electronics_bonus: self.electronics_bonus + other.electronics_bonus,
            food_bonus: self.food_bonus + other.food_bonus,
            water_bonus: self.water_bonus + other.water_bonus,
            encounter_mod: self.encounter_mod + other.encounter_mod,
            item_bonus: self.item_bonus + other.item_bonus,
            rare_loot_bonus: self.rare_loot_bonus + other.rare_loot_bonus,
            hunger_decay_mult: self.hunger_decay_mult * other.hunger_decay_mult,
            thirst_decay_mult: self.thirst_decay_mult * other.thirst_decay_mult,
            damage_mult: self.damage_mult * other.damage_mult,
            flee_bonus: self.flee_bonus + other.flee_bonus,
            salvage_cost_mult: self.salvage_cost_mult * other.salvage_cost_mult,
            on_kill_heal: self.on_kill_heal + other.on_kill_heal,
            armor_bonus: self.armor_bonus + other.armor_bonus,
        }
    }

    /// Fold every perk the player owns. Unknown ids contribute nothing.
    #[must_use]
    pub fn for_player(player: &Player, catalog: &Catalog) -> Self {
        player
            .perks
            .iter()
            .filter_map(|id| catalog.perk(id))
            .fold(Self::default(), |acc, perk| acc.combine(&perk.effects))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementEffects {
    pub thirst_decay_mult: f32,
    /// Garden harvest interval in ticks; no garden-type building means no harvest.
    pub food_interval: Option<u32>,
    pub food_multiplier: f32,
    pub rare_loot_bonus: f32,
}

impl Default for SettlementEffects {
    fn default() -> Self {
        Self {
            thirst_decay_mult: 1.0,
            food_interval: None,
            food_multiplier: 1.0,
            rare_loot_bonus: 0.0,
        }
    }
}

impl SettlementEffects {
    #[must_use]
    pub fn combine(self, other: &Self) -> Self {
        let food_interval = match (self.food_interval, other.food_interval) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            thirst_decay_mult: self.thirst_decay_mult * other.thirst_decay_mult,
            food_interval,
            food_multiplier: self.food_multiplier * other.food_multiplier,
            rare_loot_bonus: self.rare_loot_bonus + other.rare_loot_bonus,
        }
    }

    #[must_use]
    pub fn for_settlement(settlement: &Settlement, catalog: &Catalog) -> Self {
        settlement
            .buildings
            .iter()
            .filter_map(|id| catalog.building(id))
            .fold(Self::default(), |acc, building| acc.combine(&building.effects))
    }
}
