//! Static content tables: loot affixes, perks, buildings, zones, enemies and
//! the story script.
//!
//! The default catalog is embedded at compile time and validated once on
//! first use. Alternate catalogs (mods, tests) go through [`Catalog::from_json`]
//! and get the same validation.

mod validate;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::effects::{PerkEffects, SettlementEffects};
use crate::state::{Attribute, GearSlot, ItemKind, Objective, RarityId};

pub use validate::CatalogError;

const DEFAULT_CATALOG_DATA: &str = include_str!("../../assets/data/catalog.json");

/// Inclusive integer range, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct RollRange {
    pub min: u32,
    pub max: u32,
}

impl RollRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Uniform inclusive roll. Degenerate and inverted ranges return the
    /// lower bound without drawing.
    pub fn roll<R>(&self, rng: &mut R) -> u32
    where
        R: Rng + ?Sized,
    {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl From<[u32; 2]> for RollRange {
    fn from(value: [u32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<RollRange> for [u32; 2] {
    fn from(value: RollRange) -> Self {
        [value.min, value.max]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rarity {
    pub id: RarityId,
    pub weight: u32,
    pub stat_range: RollRange,
    pub value_mult: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseItem {
    pub name: String,
    pub slot: GearSlot,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Candidate attributes; duplicates collapse when rolled.
    pub stats: Vec<Attribute>,
}

/// Affix stat key. `all` applies to every attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffixKey {
    Str,
    Agi,
    Luk,
    All,
}

impl AffixKey {
    /// Attributes touched by this key.
    #[must_use]
    pub fn targets(self) -> &'static [Attribute] {
        match self {
            Self::Str => &[Attribute::Str],
            Self::Agi => &[Attribute::Agi],
            Self::Luk => &[Attribute::Luk],
            Self::All => &Attribute::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    pub id: String,
    pub name: String,
    pub stats: BTreeMap<AffixKey, i8>,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perk {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub effects: PerkEffects,
    /// Permanent base-attribute grant applied once at acquisition.
    #[serde(default)]
    pub attribute_grant: BTreeMap<Attribute, u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialCost {
    pub scrap: u32,
    pub electronics: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: MaterialCost,
    #[serde(default)]
    pub effects: SettlementEffects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceProfile {
    pub scrap: RollRange,
    pub electronics: RollRange,
    pub food: RollRange,
    pub water: RollRange,
}

impl ResourceProfile {
    #[must_use]
    pub const fn ranges(&self) -> [RollRange; 4] {
        [self.scrap, self.electronics, self.food, self.water]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub encounter_mod: f32,
    #[serde(default)]
    pub enemy_tier_bonus: u32,
    #[serde(default)]
    pub item_bonus: f32,
    #[serde(default)]
    pub rare_loot_bonus: f32,
    #[serde(default)]
    pub resources: Option<ResourceProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub name: String,
    pub tier: u8,
    pub hp: RollRange,
    pub damage: RollRange,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reward {
    pub xp: u32,
    pub scrap: u32,
    pub electronics: u32,
    pub food: u32,
    pub water: u32,
    pub item: bool,
    pub rare_loot_bonus: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub title: String,
    pub message: String,
    pub objective: Objective,
    #[serde(default)]
    pub reward: Reward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryArc {
    pub id: String,
    pub title: String,
    pub intro: String,
    pub stages: Vec<Stage>,
}

/// Objective shape for a side op; ranges are rolled when the op is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SideOpObjective {
    ScavengeCount { required: RollRange },
    ZoneScavenge { required: RollRange },
    DefeatTier { tier: RollRange, required: RollRange },
    SalvageCount { required: RollRange },
    TravelZone { required: RollRange },
}

impl SideOpObjective {
    #[must_use]
    pub const fn required(&self) -> RollRange {
        match self {
            Self::ScavengeCount { required }
            | Self::ZoneScavenge { required }
            | Self::DefeatTier { required, .. }
            | Self::SalvageCount { required }
            | Self::TravelZone { required } => *required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideOpTemplate {
    pub title: String,
    pub objective: SideOpObjective,
    #[serde(default)]
    pub reward: Reward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub start_zone: String,
    pub rarities: Vec<Rarity>,
    pub base_items: Vec<BaseItem>,
    pub prefixes: Vec<Affix>,
    pub suffixes: Vec<Affix>,
    pub perks: Vec<Perk>,
    pub buildings: Vec<Building>,
    pub scavenge_default: ResourceProfile,
    pub salvage_cost: MaterialCost,
    pub zones: Vec<Zone>,
    pub enemies: Vec<EnemyTemplate>,
    pub barks: Vec<String>,
    pub arcs: Vec<StoryArc>,
    pub side_ops: Vec<SideOpTemplate>,
}

impl Catalog {
    /// The embedded catalog shipped with the engine.
    ///
    /// # Panics
    ///
    /// Panics if the embedded asset fails validation.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::from_json(DEFAULT_CATALOG_DATA).expect("embedded catalog is valid")
        })
    }

    /// Parse and validate a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the JSON is malformed or violates a table invariant.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    #[must_use]
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// Zone lookup that falls back to the start zone for stale ids.
    /// Validated catalogs always carry the start zone.
    #[must_use]
    pub fn active_zone(&self, id: &str) -> &Zone {
        self.zone(id)
            .or_else(|| self.zone(&self.start_zone))
            .unwrap_or(&self.zones[0])
    }

    #[must_use]
    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|building| building.id == id)
    }

    #[must_use]
    pub fn perk(&self, id: &str) -> Option<&Perk> {
        self.perks.iter().find(|perk| perk.id == id)
    }

    #[must_use]
    pub fn arc(&self, index: usize) -> Option<&StoryArc> {
        self.arcs.get(index)
    }

    #[must_use]
    pub fn stage(&self, arc_index: usize, stage_index: usize) -> Option<(&StoryArc, &Stage)> {
        let arc = self.arcs.get(arc_index)?;
        arc.stages.get(stage_index).map(|stage| (arc, stage))
    }

    #[must_use]
    pub fn side_op(&self, title: &str) -> Option<&SideOpTemplate> {
        self.side_ops.iter().find(|op| op.title == title)
    }

    /// Resolve a player-typed building name or id. Case and whitespace are ignored.
    #[must_use]
    pub fn resolve_building(&self, input: &str) -> Option<&Building> {
        let key = alias_key(input);
        self.buildings
            .iter()
            .find(|building| alias_key(&building.id) == key || alias_key(&building.name) == key)
    }

    /// Resolve a player-typed zone name or id. Case and whitespace are ignored.
    #[must_use]
    pub fn resolve_zone(&self, input: &str) -> Option<&Zone> {
        let key = alias_key(input);
        self.zones
            .iter()
            .find(|zone| alias_key(&zone.id) == key || alias_key(&zone.name) == key)
    }
}

fn alias_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn builtin_catalog_loads_every_table() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.rarities.len(), 5);
        assert_eq!(catalog.base_items.len(), 32);
        assert_eq!(catalog.prefixes.len(), 8);
        assert_eq!(catalog.suffixes.len(), 6);
        assert_eq!(catalog.perks.len(), 16);
        assert_eq!(catalog.buildings.len(), 10);
        assert_eq!(catalog.zones.len(), 7);
        assert_eq!(catalog.enemies.len(), 18);
        assert_eq!(catalog.barks.len(), 15);
        assert_eq!(catalog.arcs.len(), 3);
        assert_eq!(catalog.side_ops.len(), 5);
        assert_eq!(catalog.salvage_cost, MaterialCost { scrap: 14, electronics: 5 });
    }

    #[test]
    fn omitted_effects_are_neutral() {
        let catalog = Catalog::builtin();
        let hoarder = catalog.perk("hoarder").expect("hoarder perk");
        assert_eq!(hoarder.effects, PerkEffects::default());
        let armory = catalog.building("armory").expect("armory");
        assert_eq!(armory.effects, SettlementEffects::default());
        let tactician = catalog.perk("tactician").expect("tactician");
        assert_eq!(tactician.attribute_grant.get(&Attribute::Str), Some(&2));
    }

    #[test]
    fn aliases_ignore_case_and_spacing() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.resolve_building("water purifier").map(|b| b.id.as_str()),
            Some("waterPurifier")
        );
        assert_eq!(
            catalog.resolve_building("MEDICALBAY").map(|b| b.id.as_str()),
            Some("medicalBay")
        );
        assert_eq!(
            catalog.resolve_building("hydroponics lab").map(|b| b.id.as_str()),
            Some("hydroponics")
        );
        assert_eq!(
            catalog.resolve_zone("vault 22").map(|z| z.id.as_str()),
            Some("vaultTwentyTwo")
        );
        assert!(catalog.resolve_zone("moon base").is_none());
    }

    #[test]
    fn stale_zone_falls_back_to_start() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.active_zone("nowhere").id, "ruinedOutskirts");
        assert_eq!(catalog.active_zone("metroUndercity").id, "metroUndercity");
    }

    #[test]
    fn roll_range_stays_inclusive() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let range = RollRange::new(2, 4);
        for _ in 0..200 {
            assert!(range.contains(range.roll(&mut rng)));
        }
        assert_eq!(RollRange::new(3, 3).roll(&mut rng), 3);
    }

    #[test]
    fn roll_range_serializes_as_pair() {
        let json = serde_json::to_string(&RollRange::new(5, 12)).expect("serialize");
        assert_eq!(json, "[5,12]");
    }
}
