use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Catalog, RollRange};
use crate::constants::{
    BOOT_MESSAGE, DEFAULT_TAB, HISTORY_CAPACITY, START_AGILITY, START_ELECTRONICS, START_FOOD,
    START_HEALTH, START_LUCK, START_SCRAP, START_STRENGTH, START_WATER, VITAL_CAP,
};
use crate::numbers::u32_to_f32;
use crate::progression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Str,
    Agi,
    Luk,
}

impl Attribute {
    pub const ALL: [Self; 3] = [Self::Str, Self::Agi, Self::Luk];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Agi => "agi",
            Self::Luk => "luk",
        }
    }

    /// Uppercase tag used in item and status read-outs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Agi => "AGI",
            Self::Luk => "LUK",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(rename = "str")]
    pub strength: u32,
    #[serde(rename = "agi")]
    pub agility: u32,
    #[serde(rename = "luk")]
    pub luck: u32,
}

impl Attributes {
    #[must_use]
    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Str => self.strength,
            Attribute::Agi => self.agility,
            Attribute::Luk => self.luck,
        }
    }

    pub fn add(&mut self, attribute: Attribute, amount: u32) {
        let slot = match attribute {
            Attribute::Str => &mut self.strength,
            Attribute::Agi => &mut self.agility,
            Attribute::Luk => &mut self.luck,
        };
        *slot = slot.saturating_add(amount);
    }

    pub fn add_all(&mut self, amount: u32) {
        for attribute in Attribute::ALL {
            self.add(attribute, amount);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearSlot {
    Head,
    Body,
    Hand,
    Trinket,
}

impl GearSlot {
    pub const ALL: [Self; 4] = [Self::Head, Self::Body, Self::Hand, Self::Trinket];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Hand => "hand",
            Self::Trinket => "trinket",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Body => "Body",
            Self::Hand => "Hand",
            Self::Trinket => "Trinket",
        }
    }
}

impl fmt::Display for GearSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GearSlot {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => Ok(Self::Head),
            "body" => Ok(Self::Body),
            "hand" => Ok(Self::Hand),
            "trinket" => Ok(Self::Trinket),
            _ => Err(()),
        }
    }
}

/// Cosmetic item category; only the slot matters mechanically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Gear,
    Device,
    Consumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RarityId {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl RarityId {
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for RarityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A generated piece of gear. Immutable once minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: String,
    pub name: String,
    pub slot: GearSlot,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub rarity: RarityId,
    pub modifiers: BTreeMap<Attribute, u8>,
    pub value: u32,
}

impl EquipmentItem {
    #[must_use]
    pub fn modifier(&self, attribute: Attribute) -> u8 {
        self.modifiers.get(&attribute).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Equipped {
    pub head: Option<String>,
    pub body: Option<String>,
    pub hand: Option<String>,
    pub trinket: Option<String>,
}

impl Equipped {
    #[must_use]
    pub fn get(&self, slot: GearSlot) -> Option<&str> {
        match slot {
            GearSlot::Head => self.head.as_deref(),
            GearSlot::Body => self.body.as_deref(),
            GearSlot::Hand => self.hand.as_deref(),
            GearSlot::Trinket => self.trinket.as_deref(),
        }
    }

    /// Replace the slot contents, returning whatever was there before.
    pub fn set(&mut self, slot: GearSlot, item_id: Option<String>) -> Option<String> {
        let entry = match slot {
            GearSlot::Head => &mut self.head,
            GearSlot::Body => &mut self.body,
            GearSlot::Hand => &mut self.hand,
            GearSlot::Trinket => &mut self.trinket,
        };
        std::mem::replace(entry, item_id)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (GearSlot, Option<&str>)> + '_ {
        GearSlot::ALL.into_iter().map(|slot| (slot, self.get(slot)))
    }

    #[must_use]
    pub fn contains(&self, item_id: &str) -> bool {
        self.iter().any(|(_, id)| id == Some(item_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub scrap: u32,
    pub electronics: u32,
    pub food: u32,
    pub water: u32,
    #[serde(default)]
    pub items: Vec<EquipmentItem>,
    #[serde(default)]
    pub equipped: Equipped,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            scrap: START_SCRAP,
            electronics: START_ELECTRONICS,
            food: START_FOOD,
            water: START_WATER,
            items: Vec::new(),
            equipped: Equipped::default(),
        }
    }
}

impl Inventory {
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&EquipmentItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = &EquipmentItem> + '_ {
        self.items
            .iter()
            .filter(|item| self.equipped.contains(&item.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub stamina: f32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: START_HEALTH,
            hunger: VITAL_CAP,
            thirst: VITAL_CAP,
            stamina: VITAL_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub level: u32,
    pub xp: u32,
    #[serde(default)]
    pub perks: Vec<String>,
    #[serde(default)]
    pub perk_points: u32,
    pub attributes: Attributes,
    pub vitals: Vitals,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            perks: Vec::new(),
            perk_points: 0,
            attributes: Attributes {
                strength: START_STRENGTH,
                agility: START_AGILITY,
                luck: START_LUCK,
            },
            vitals: Vitals::default(),
        }
    }
}

impl Player {
    #[must_use]
    pub fn has_perk(&self, perk_id: &str) -> bool {
        self.perks.iter().any(|owned| owned == perk_id)
    }

    #[must_use]
    pub fn max_health(&self) -> f32 {
        u32_to_f32(progression::max_health(self.level))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterLoot {
    pub scrap: u32,
    pub electronics: u32,
    pub item_chance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEncounter {
    pub id: String,
    pub name: String,
    pub tier: u8,
    pub hp: u32,
    pub max_hp: u32,
    pub damage: RollRange,
    pub loot: EncounterLoot,
    pub loot_bonus: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(default)]
    pub buildings: Vec<String>,
    #[serde(default)]
    pub garden_progress: u32,
    #[serde(default)]
    pub purifier_progress: u32,
    #[serde(default)]
    pub smelter_progress: u32,
}

impl Settlement {
    #[must_use]
    pub fn has_building(&self, building_id: &str) -> bool {
        self.buildings.iter().any(|built| built == building_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub current_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveKind {
    ScavengeCount,
    ZoneScavenge { zone_id: String },
    TravelZone { zone_id: String },
    DefeatTier { tier: u8 },
    BuildStructure { building_id: String },
    SalvageCount,
    EquipSlot { slot: GearSlot },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(flatten)]
    pub kind: ObjectiveKind,
    pub required: u32,
    #[serde(default)]
    pub progress: u32,
}

impl Objective {
    #[must_use]
    pub const fn new(kind: ObjectiveKind, required: u32) -> Self {
        Self {
            kind,
            required,
            progress: 0,
        }
    }

    /// Copy of this objective with progress reset, as handed out by the story script.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self::new(self.kind.clone(), self.required)
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= self.required
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub time: u64,
    pub arc: String,
    pub stage: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub arc_index: usize,
    pub stage_index: usize,
    pub objective: Objective,
    #[serde(default)]
    pub last_transmission_at: u64,
    #[serde(default)]
    pub side_ops_count: u32,
    #[serde(default)]
    pub is_side_ops: bool,
    #[serde(default)]
    pub side_op_title: Option<String>,
    /// Most recent first.
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Input,
    System,
    Loot,
    Combat,
    Error,
}

impl LogKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::System => "system",
            Self::Loot => "loot",
            Self::Combat => "combat",
            Self::Error => "error",
        }
    }
}

/// Lines produced by a single handler, flushed into the history in order.
pub(crate) type LogLines = SmallVec<[(LogKind, String); 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub text: String,
}

/// Bounded terminal scroll-back. Ids stay monotonic across evictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalHistory {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

impl Default for TerminalHistory {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
            next_id: 1,
        }
    }
}

impl TerminalHistory {
    /// Append an entry and return the id assigned to it.
    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries from the given id onward, oldest first.
    pub fn since(&self, id: u64) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.id >= id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Explore,
    Combat,
}

/// The single authoritative snapshot of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub mode: Mode,
    pub current_tab: String,
    pub history: TerminalHistory,
    pub time: u64,
    pub player: Player,
    pub inventory: Inventory,
    pub settlement: Settlement,
    pub world: World,
    pub story: Story,
    pub active_encounter: Option<ActiveEncounter>,
    pub next_item_id: u32,
    pub next_journal_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl GameState {
    /// Fresh run positioned on the opening stage of the first arc.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let (intro, message, objective) = match catalog.stage(0, 0) {
            Some((arc, stage)) => (
                arc.intro.clone(),
                stage.message.clone(),
                stage.objective.fresh(),
            ),
            None => (
                String::new(),
                String::new(),
                Objective::new(ObjectiveKind::ScavengeCount, 1),
            ),
        };

        let mut history = TerminalHistory::default();
        history.push(LogKind::System, BOOT_MESSAGE);
        history.push(LogKind::System, format!("Transmission: {intro}"));
        history.push(LogKind::System, format!("Directive: {message}"));

        Self {
            mode: Mode::Explore,
            current_tab: DEFAULT_TAB.to_string(),
            history,
            time: 0,
            player: Player::default(),
            inventory: Inventory::default(),
            settlement: Settlement::default(),
            world: World {
                current_zone: catalog.start_zone.clone(),
            },
            story: Story {
                arc_index: 0,
                stage_index: 0,
                objective,
                last_transmission_at: 0,
                side_ops_count: 0,
                is_side_ops: false,
                side_op_title: None,
                journal: Vec::new(),
            },
            active_encounter: None,
            next_item_id: 1,
            next_journal_id: 1,
        }
    }

    #[must_use]
    pub const fn in_combat(&self) -> bool {
        matches!(self.mode, Mode::Combat)
    }

    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.player.max_health()
    }

    pub fn push_log(&mut self, kind: LogKind, text: impl Into<String>) {
        self.history.push(kind, text);
    }

    pub fn extend_log<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = (LogKind, String)>,
    {
        for (kind, text) in lines {
            self.history.push(kind, text);
        }
    }

    pub(crate) fn allocate_item_id(&mut self) -> String {
        let id = format!("itm-{:04}", self.next_item_id);
        self.next_item_id = self.next_item_id.saturating_add(1);
        id
    }

    pub(crate) fn allocate_journal_id(&mut self) -> String {
        let id = format!("jrn-{:04}", self.next_journal_id);
        self.next_journal_id = self.next_journal_id.saturating_add(1);
        id
    }

    pub(crate) fn set_health(&mut self, health: f32) {
        let cap = self.max_health();
        self.player.vitals.health = health.clamp(0.0, cap);
    }
}

/// Base attributes plus modifiers of equipped items only.
#[must_use]
pub fn total_attributes(state: &GameState) -> Attributes {
    let mut totals = state.player.attributes;
    for item in state.inventory.equipped_items() {
        for (attribute, bonus) in &item.modifiers {
            totals.add(*attribute, u32::from(*bonus));
        }
    }
    totals
}
