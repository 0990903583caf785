use super::CommandError;
use crate::constants::{
    DRINK_RESTORE, EAT_RESTORE, REST_HEALTH, REST_HUNGER_COST, REST_STAMINA, REST_THIRST_COST,
    VITAL_CAP,
};
use crate::numbers::round_f32_to_u32;
use crate::state::{GameState, LogKind};

pub(super) fn eat(state: &mut GameState) -> Result<(), CommandError> {
    if state.inventory.food == 0 {
        return Err(CommandError::NoFood);
    }
    state.inventory.food -= 1;
    let vitals = &mut state.player.vitals;
    let gain = (VITAL_CAP - vitals.hunger).min(EAT_RESTORE);
    vitals.hunger = (vitals.hunger + gain).clamp(0.0, VITAL_CAP);
    let text = format!(
        "Consumed food (+{} satiation). {} food remaining.",
        round_f32_to_u32(gain),
        state.inventory.food
    );
    state.push_log(LogKind::System, text);
    Ok(())
}

pub(super) fn drink(state: &mut GameState) -> Result<(), CommandError> {
    if state.inventory.water == 0 {
        return Err(CommandError::NoWater);
    }
    state.inventory.water -= 1;
    let vitals = &mut state.player.vitals;
    let gain = (VITAL_CAP - vitals.thirst).min(DRINK_RESTORE);
    vitals.thirst = (vitals.thirst + gain).clamp(0.0, VITAL_CAP);
    let text = format!(
        "Consumed water (+{} hydration). {} water remaining.",
        round_f32_to_u32(gain),
        state.inventory.water
    );
    state.push_log(LogKind::System, text);
    Ok(())
}

/// Rest trades a little hunger and thirst for health and stamina.
pub(super) fn rest(state: &mut GameState) -> Result<(), CommandError> {
    if state.in_combat() {
        return Err(CommandError::RestInCombat);
    }
    state.set_health(state.player.vitals.health + REST_HEALTH);
    let vitals = &mut state.player.vitals;
    vitals.stamina = (vitals.stamina + REST_STAMINA).clamp(0.0, VITAL_CAP);
    vitals.hunger = (vitals.hunger + REST_HUNGER_COST).clamp(0.0, VITAL_CAP);
    vitals.thirst = (vitals.thirst + REST_THIRST_COST).clamp(0.0, VITAL_CAP);
    state.push_log(
        LogKind::System,
        format!(
            "Rested. Recovered +{} health, +{} stamina. (Hunger and thirst increased slightly.)",
            round_f32_to_u32(REST_HEALTH),
            round_f32_to_u32(REST_STAMINA)
        ),
    );
    Ok(())
}
