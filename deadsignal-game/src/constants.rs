//! Centralized balance and tuning constants for Dead Signal game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Content (names, zones, story script) lives in the JSON catalog; the
//! formulas that consume it live here so that balance changes are reviewed
//! as code.

// Terminal -----------------------------------------------------------------
pub const BOOT_MESSAGE: &str = "Survival Terminal boot sequence complete. Awaiting commands.";
pub const DEFAULT_TAB: &str = "Vitals";
pub const HISTORY_CAPACITY: usize = 500;

// Progression --------------------------------------------------------------
pub const LEVEL_CAP: u32 = 50;
pub(crate) const XP_BASE: u32 = 100;
pub(crate) const XP_PER_LEVEL: u32 = 50;
pub(crate) const HEALTH_BASE: u32 = 120;
pub(crate) const HEALTH_PER_LEVEL: u32 = 6;
pub(crate) const LEVEL_UP_HEAL: f32 = 10.0;
pub(crate) const PERK_POINT_LEVEL_INTERVAL: u32 = 3;

// Starting player ----------------------------------------------------------
pub(crate) const START_STRENGTH: u32 = 5;
pub(crate) const START_AGILITY: u32 = 5;
pub(crate) const START_LUCK: u32 = 4;
pub(crate) const START_HEALTH: f32 = 100.0;
pub(crate) const START_SCRAP: u32 = 25;
pub(crate) const START_ELECTRONICS: u32 = 8;
pub(crate) const START_FOOD: u32 = 3;
pub(crate) const START_WATER: u32 = 2;

// Vitals -------------------------------------------------------------------
pub const VITAL_CAP: f32 = 100.0;
pub(crate) const HUNGER_DECAY_PER_TICK: f32 = 0.08;
pub(crate) const THIRST_DECAY_PER_TICK: f32 = 0.12;
pub(crate) const STAMINA_REGEN_PER_TICK: f32 = 0.05;
pub(crate) const STARVATION_HEALTH_PENALTY: f32 = 0.15;
pub(crate) const DEHYDRATION_HEALTH_PENALTY: f32 = 0.2;
pub(crate) const EAT_RESTORE: f32 = 35.0;
pub(crate) const DRINK_RESTORE: f32 = 40.0;
pub(crate) const REST_HEALTH: f32 = 15.0;
pub(crate) const REST_STAMINA: f32 = 25.0;
pub(crate) const REST_HUNGER_COST: f32 = 8.0;
pub(crate) const REST_THIRST_COST: f32 = 6.0;

// Settlement ---------------------------------------------------------------
pub const RESOURCE_SOFT_CAP: u32 = 999;
pub(crate) const PURIFIER_BUILDING: &str = "waterPurifier";
pub(crate) const SMELTER_BUILDING: &str = "scrapSmelter";
pub(crate) const HYDROPONICS_BUILDING: &str = "hydroponics";
pub(crate) const PURIFIER_INTERVAL_TICKS: u32 = 120;
pub(crate) const SMELTER_INTERVAL_TICKS: u32 = 60;
pub(crate) const GARDEN_BASE_HARVEST: u32 = 1;
pub(crate) const HYDROPONICS_BASE_HARVEST: u32 = 2;

// Narrative ----------------------------------------------------------------
pub(crate) const NARRATIVE_DRIP_INTERVAL: u64 = 35;
pub(crate) const NARRATIVE_DRIP_CHANCE: f32 = 0.35;
pub(crate) const SIDE_OPS_TAG: &str = "SIDE OPS";
pub(crate) const SIDE_OPS_ARC_LABEL: &str = "Side Ops";
pub(crate) const SIDE_OP_FALLBACK_TITLE: &str = "Side Op";

// Scavenging ---------------------------------------------------------------
pub(crate) const ENCOUNTER_BASE_CHANCE: f32 = 0.6;
pub(crate) const ENCOUNTER_LUCK_FACTOR: f32 = 0.02;
pub(crate) const ENCOUNTER_CHANCE_MIN: f32 = 0.2;
pub(crate) const ENCOUNTER_CHANCE_MAX: f32 = 0.85;
pub(crate) const ITEM_CHANCE_BASE: f32 = 0.35;
pub(crate) const ITEM_CHANCE_MAX: f32 = 0.85;

// Enemies ------------------------------------------------------------------
pub(crate) const ENEMY_TIER_MIN: u8 = 1;
pub(crate) const ENEMY_TIER_MAX: u8 = 5;
pub(crate) const ENEMY_HIGH_TIER: u8 = 3;
pub(crate) const ENEMY_LOOT_BIAS_HIGH: f32 = 0.08;
pub(crate) const ENEMY_LOOT_BIAS_LOW: f32 = 0.02;
pub(crate) const ENEMY_SCRAP_PER_TIER_MIN: u32 = 4;
pub(crate) const ENEMY_SCRAP_PER_TIER_MAX: u32 = 9;
pub(crate) const ENEMY_ELECTRONICS_PER_TIER_MIN: u32 = 1;
pub(crate) const ENEMY_ELECTRONICS_PER_TIER_MAX: u32 = 3;
pub(crate) const ENEMY_ITEM_CHANCE_BASE: f32 = 0.3;
pub(crate) const ENEMY_ITEM_CHANCE_PER_TIER: f32 = 0.1;
pub(crate) const ENEMY_ITEM_CHANCE_MAX: f32 = 0.8;

// Combat -------------------------------------------------------------------
pub(crate) const DAMAGE_STRENGTH_FACTOR: f32 = 2.0;
pub(crate) const DAMAGE_AGILITY_FACTOR: f32 = 1.2;
pub(crate) const DAMAGE_ROLL_MAX: u32 = 4;
pub(crate) const DAMAGE_MIN: i32 = 3;
pub(crate) const DAMAGE_MAX: i32 = 40;
pub(crate) const KILL_XP_BASE: u32 = 10;
pub(crate) const KILL_XP_PER_TIER: u32 = 12;
pub(crate) const FLEE_BASE_CHANCE: f32 = 0.3;
pub(crate) const FLEE_LUCK_FACTOR: f32 = 0.04;
pub(crate) const FLEE_CHANCE_MAX: f32 = 0.9;
pub(crate) const RETREAT_HEALTH: f32 = 20.0;
pub(crate) const RETREAT_SCRAP_DIVISOR: u32 = 2;

// Loot ---------------------------------------------------------------------
pub(crate) const PREFIX_CHANCE: f64 = 0.6;
pub(crate) const SUFFIX_CHANCE: f64 = 0.5;
pub const MODIFIER_CAP: u8 = 6;
pub(crate) const MAX_ROLLED_MODIFIERS: usize = 3;
pub(crate) const ITEM_VALUE_FACTOR: f32 = 12.0;
