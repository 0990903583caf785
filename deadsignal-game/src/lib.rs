//! Dead Signal Game Engine
//!
//! Platform-agnostic core logic for the Dead Signal survival terminal.
//! Every transition is a pure function of the previous snapshot, the action,
//! and an injected random source; presentation layers only read the result.

pub mod catalog;
pub mod commands;
pub mod constants;
pub mod effects;
pub mod engine;
pub mod loot;
pub mod numbers;
pub mod objectives;
pub mod progression;
pub mod rng;
pub mod session;
pub mod state;
pub mod tick;

// Re-export commonly used types
pub use catalog::{
    Affix, AffixKey, BaseItem, Building, Catalog, CatalogError, EnemyTemplate, MaterialCost, Perk,
    Rarity, ResourceProfile, Reward, RollRange, SideOpObjective, SideOpTemplate, Stage, StoryArc,
    Zone,
};
pub use commands::{Command, CommandError};
pub use effects::{PerkEffects, SettlementEffects};
pub use engine::{Action, apply, apply_with_catalog, reduce};
pub use loot::{describe_item, format_modifiers, generate_item};
pub use objectives::{GameEvent, describe_objective, record_event};
pub use progression::{LevelUpReport, apply_level_ups, max_health, xp_for_level};
pub use rng::{CountingRng, RngStreams, StreamDraws};
pub use session::TerminalSession;
pub use state::{
    ActiveEncounter, Attribute, Attributes, EncounterLoot, Equipped, EquipmentItem, GameState,
    GearSlot, Inventory, ItemKind, JournalEntry, LogEntry, LogKind, Mode, Objective,
    ObjectiveKind, Player, RarityId, Settlement, Story, TerminalHistory, Vitals, World,
    total_attributes,
};
pub use tick::tick;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn builtin_engine_boots_and_accepts_commands() {
        let state = GameState::default();
        let mut rng = ChaCha20Rng::seed_from_u64(0x5EED);
        let next = apply(&state, &Action::Command("status".into()), &mut rng);

        assert_eq!(state.history.len(), 3);
        assert!(next.history.len() > state.history.len());
        assert_eq!(next.player, state.player);
    }

    #[test]
    fn set_tab_round_trips_through_state() {
        let state = GameState::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let next = apply(&state, &Action::SetTab("Map".into()), &mut rng);
        assert_eq!(next.current_tab, "Map");
        assert_eq!(next.history, state.history);
    }
}
