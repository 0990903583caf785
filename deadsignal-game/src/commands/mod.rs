//! Terminal verbs.
//!
//! Command text is lowercased and split into a verb and a free-form argument.
//! Each handler either mutates the working state and logs its narrative, or
//! fails with a [`CommandError`] before touching anything; the dispatcher turns
//! that error into an `error` history line.

mod combat;
mod gear;
mod perks;
mod reports;
mod scavenge;
mod settlement;
mod survival;
mod travel;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Zone};
use crate::effects::{PerkEffects, SettlementEffects};
use crate::state::{GameState, GearSlot, LogKind};

/// Perk and settlement folds plus the zone the player stands in.
struct Modifiers<'c> {
    perks: PerkEffects,
    settlement: SettlementEffects,
    zone: &'c Zone,
}

impl<'c> Modifiers<'c> {
    fn of(state: &GameState, catalog: &'c Catalog) -> Self {
        Self {
            perks: PerkEffects::for_player(&state.player, catalog),
            settlement: SettlementEffects::for_settlement(&state.settlement, catalog),
            zone: catalog.active_zone(&state.world.current_zone),
        }
    }
}

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verb", content = "arg", rename_all = "snake_case")]
pub enum Command {
    Scavenge,
    Attack,
    Flee,
    /// Building id or name with all whitespace removed.
    Build(String),
    Equip(String),
    Unequip(String),
    /// Empty or `list` shows the zone directory.
    Travel(String),
    Salvage,
    Eat,
    Drink,
    Rest,
    Intel,
    Perks,
    Perk(String),
    Status,
    Inventory,
    Unknown(String),
}

impl Command {
    /// Parse raw terminal input. Blank input yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        let mut words = normalized.split_whitespace();
        let verb = words.next()?;
        let arg = words.collect::<Vec<_>>().join(" ");

        let command = match verb {
            "scavenge" => Self::Scavenge,
            "attack" => Self::Attack,
            "flee" => Self::Flee,
            "build" => Self::Build(arg.split_whitespace().collect()),
            "equip" => Self::Equip(arg),
            "unequip" => Self::Unequip(arg),
            "zone" | "travel" => Self::Travel(arg),
            "salvage" => Self::Salvage,
            "eat" => Self::Eat,
            "drink" => Self::Drink,
            "rest" => Self::Rest,
            "intel" | "mission" => Self::Intel,
            "perks" => Self::Perks,
            "perk" if arg.is_empty() => Self::Perks,
            "perk" => Self::Perk(arg),
            "status" => Self::Status,
            "inv" | "inventory" => Self::Inventory,
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }

    /// Verb label used in debug logs.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Scavenge => "scavenge",
            Self::Attack => "attack",
            Self::Flee => "flee",
            Self::Build(_) => "build",
            Self::Equip(_) => "equip",
            Self::Unequip(_) => "unequip",
            Self::Travel(_) => "travel",
            Self::Salvage => "salvage",
            Self::Eat => "eat",
            Self::Drink => "drink",
            Self::Rest => "rest",
            Self::Intel => "intel",
            Self::Perks => "perks",
            Self::Perk(_) => "perk",
            Self::Status => "status",
            Self::Inventory => "inventory",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// A rejected command. The display text is exactly what the player sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Cannot scavenge while in combat.")]
    ScavengeInCombat,
    #[error("No active encounter to attack.")]
    NoEncounterToAttack,
    #[error("No encounter to flee from.")]
    NoEncounterToFlee,
    #[error("Equip which item?")]
    EquipWhich,
    #[error("Item not found in inventory.")]
    ItemNotFound,
    #[error("Multiple items match. Be specific: {names}.")]
    AmbiguousItem { names: String },
    #[error("{item} is a {slot} item, not {requested}.")]
    SlotMismatch {
        item: String,
        slot: GearSlot,
        requested: GearSlot,
    },
    #[error("Unequip which slot?")]
    UnequipWhich,
    #[error("Unknown slot.")]
    UnknownSlot,
    #[error("Cannot salvage during combat.")]
    SalvageInCombat,
    #[error("Need {scrap} scrap and {electronics} electronics to salvage.")]
    SalvageCost { scrap: u32, electronics: u32 },
    #[error("Zone not recognized.")]
    UnknownZone,
    #[error("No perk points available.")]
    NoPerkPoints,
    #[error("Perk id not recognized. Try: {ids}.")]
    UnknownPerk { ids: String },
    #[error("Multiple perks match. Be specific: {names}.")]
    AmbiguousPerk { names: String },
    #[error("Perk already acquired.")]
    PerkOwned,
    #[error("Unknown structure.")]
    UnknownStructure,
    #[error("Insufficient materials. Need {scrap} scrap and {electronics} electronics.")]
    InsufficientMaterials { scrap: u32, electronics: u32 },
    #[error("No food in inventory.")]
    NoFood,
    #[error("No water in inventory.")]
    NoWater,
    #[error("Cannot rest during combat.")]
    RestInCombat,
    #[error("Command not recognized.")]
    Unrecognized,
}

/// Echo the raw input, run the handler, and log any rejection.
pub(crate) fn execute<R>(
    state: &mut GameState,
    catalog: &Catalog,
    raw: &str,
    command: &Command,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    state.push_log(LogKind::Input, format!("> {raw}"));
    if let Err(err) = dispatch(state, catalog, command, rng) {
        log::debug!("{} rejected: {err}", command.verb());
        state.push_log(LogKind::Error, err.to_string());
    }
}

fn dispatch<R>(
    state: &mut GameState,
    catalog: &Catalog,
    command: &Command,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    match command {
        Command::Scavenge => scavenge::scavenge(state, catalog, rng),
        Command::Attack => combat::attack(state, catalog, rng),
        Command::Flee => combat::flee(state, catalog, rng),
        Command::Build(arg) => settlement::build(state, catalog, arg, rng),
        Command::Salvage => settlement::salvage(state, catalog, rng),
        Command::Equip(arg) => gear::equip(state, catalog, arg, rng),
        Command::Unequip(arg) => gear::unequip(state, catalog, arg, rng),
        Command::Travel(arg) => travel::travel(state, catalog, arg, rng),
        Command::Perks => {
            perks::list(state, catalog);
            Ok(())
        }
        Command::Perk(arg) => perks::choose(state, catalog, arg),
        Command::Eat => survival::eat(state),
        Command::Drink => survival::drink(state),
        Command::Rest => survival::rest(state),
        Command::Status => {
            reports::status(state);
            Ok(())
        }
        Command::Intel => {
            reports::intel(state, catalog);
            Ok(())
        }
        Command::Inventory => {
            reports::inventory(state);
            Ok(())
        }
        Command::Unknown(_) => Err(CommandError::Unrecognized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn parse_normalizes_case_and_spacing() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("  SCAVENGE "), Some(Command::Scavenge));
        assert_eq!(
            Command::parse("Build  Water   Purifier"),
            Some(Command::Build("waterpurifier".into()))
        );
        assert_eq!(
            Command::parse("equip head  Rusty Helmet"),
            Some(Command::Equip("head rusty helmet".into()))
        );
        assert_eq!(Command::parse("zone"), Some(Command::Travel(String::new())));
        assert_eq!(Command::parse("mission"), Some(Command::Intel));
        assert_eq!(Command::parse("perk"), Some(Command::Perks));
        assert_eq!(
            Command::parse("perk Field Medic"),
            Some(Command::Perk("field medic".into()))
        );
        assert_eq!(
            Command::parse("dance wildly"),
            Some(Command::Unknown("dance".into()))
        );
    }

    #[test]
    fn errors_render_player_text() {
        let err = CommandError::SlotMismatch {
            item: "Rusty Helmet".into(),
            slot: GearSlot::Head,
            requested: GearSlot::Hand,
        };
        assert_eq!(err.to_string(), "Rusty Helmet is a head item, not hand.");
        assert_eq!(
            CommandError::SalvageCost {
                scrap: 14,
                electronics: 5
            }
            .to_string(),
            "Need 14 scrap and 5 electronics to salvage."
        );
    }

    #[test]
    fn rejection_echoes_input_then_error() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let command = Command::parse("Dance").expect("command");
        execute(&mut state, catalog, "Dance", &command, &mut rng);

        let tail: Vec<_> = state.history.iter().skip(3).collect();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].kind, LogKind::Input);
        assert_eq!(tail[0].text, "> Dance");
        assert_eq!(tail[1].kind, LogKind::Error);
        assert_eq!(tail[1].text, "Command not recognized.");
    }
}
