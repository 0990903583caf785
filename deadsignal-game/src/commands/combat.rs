use rand::Rng;

use super::{CommandError, Modifiers};
use crate::catalog::Catalog;
use crate::constants::{
    DAMAGE_AGILITY_FACTOR, DAMAGE_MAX, DAMAGE_MIN, DAMAGE_ROLL_MAX, DAMAGE_STRENGTH_FACTOR,
    FLEE_BASE_CHANCE, FLEE_CHANCE_MAX, FLEE_LUCK_FACTOR, KILL_XP_BASE, KILL_XP_PER_TIER,
    RETREAT_HEALTH, RETREAT_SCRAP_DIVISOR,
};
use crate::effects::PerkEffects;
use crate::loot::{describe_item, mint_item};
use crate::numbers::{floor_f32_to_i32, i32_to_u32, round_f32_to_u32, u32_to_f32};
use crate::objectives::{GameEvent, record_event};
use crate::progression::apply_level_ups;
use crate::state::{ActiveEncounter, GameState, GearSlot, LogKind, LogLines, Mode, total_attributes};

pub(super) fn attack<R>(
    state: &mut GameState,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    let encounter = match &state.active_encounter {
        Some(encounter) if state.in_combat() => encounter.clone(),
        _ => return Err(CommandError::NoEncounterToAttack),
    };

    let mods = Modifiers::of(state, catalog);
    let totals = total_attributes(state);
    let roll = rng.gen_range(0..=DAMAGE_ROLL_MAX);
    let raw = (u32_to_f32(totals.strength) * DAMAGE_STRENGTH_FACTOR
        + u32_to_f32(totals.agility) * DAMAGE_AGILITY_FACTOR
        + u32_to_f32(roll))
        * mods.perks.damage_mult;
    let damage = i32_to_u32(floor_f32_to_i32(raw).clamp(DAMAGE_MIN, DAMAGE_MAX));

    let mut lines = LogLines::new();
    lines.push((
        LogKind::Combat,
        format!("You strike {} for {damage} damage.", encounter.name),
    ));

    if damage < encounter.hp {
        let remaining = encounter.hp - damage;
        if let Some(active) = state.active_encounter.as_mut() {
            active.hp = remaining;
        }
        let hit = retaliation(state, &encounter, &mods.perks, rng);
        lines.push((
            LogKind::Combat,
            format!("{} retaliates for {hit} damage.", encounter.name),
        ));
        take_hit(state, hit, &mut lines);
        state.extend_log(lines);
        return Ok(());
    }

    state.mode = Mode::Explore;
    state.active_encounter = None;
    let xp = KILL_XP_BASE + u32::from(encounter.tier) * KILL_XP_PER_TIER;
    state.player.xp = state.player.xp.saturating_add(xp);
    state.inventory.scrap = state.inventory.scrap.saturating_add(encounter.loot.scrap);
    state.inventory.electronics = state
        .inventory
        .electronics
        .saturating_add(encounter.loot.electronics);
    lines.push((
        LogKind::Combat,
        format!("{} neutralized. +{xp} XP.", encounter.name),
    ));
    lines.push((
        LogKind::Loot,
        format!(
            "Loot acquired: {} scrap, {} electronics.",
            encounter.loot.scrap, encounter.loot.electronics
        ),
    ));

    if rng.gen_bool(f64::from(encounter.loot.item_chance.clamp(0.0, 1.0))) {
        let bias =
            mods.settlement.rare_loot_bonus + mods.zone.rare_loot_bonus + encounter.loot_bonus;
        let item = mint_item(state, catalog, bias, rng);
        lines.push((LogKind::Loot, format!("Recovered {}.", describe_item(&item))));
    }

    if mods.perks.on_kill_heal > 0.0 {
        state.set_health(state.player.vitals.health + mods.perks.on_kill_heal);
        lines.push((
            LogKind::System,
            format!("Field Medic restores {} HP.", mods.perks.on_kill_heal),
        ));
    }

    lines.extend(apply_level_ups(&mut state.player).log_lines());
    state.extend_log(lines);
    log::debug!("defeated {} (tier {})", encounter.name, encounter.tier);

    record_event(
        state,
        catalog,
        &GameEvent::Defeat {
            tier: encounter.tier,
        },
        rng,
    );
    Ok(())
}

pub(super) fn flee<R>(
    state: &mut GameState,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    let encounter = match &state.active_encounter {
        Some(encounter) if state.in_combat() => encounter.clone(),
        _ => return Err(CommandError::NoEncounterToFlee),
    };

    let perks = PerkEffects::for_player(&state.player, catalog);
    let luck = u32_to_f32(total_attributes(state).luck);
    let chance = (FLEE_BASE_CHANCE + luck * FLEE_LUCK_FACTOR + perks.flee_bonus)
        .clamp(FLEE_BASE_CHANCE, FLEE_CHANCE_MAX);

    if rng.gen_bool(f64::from(chance)) {
        state.mode = Mode::Explore;
        state.active_encounter = None;
        state.push_log(
            LogKind::System,
            "Escape successful. You return to the wasteland.",
        );
        return Ok(());
    }

    let hit = retaliation(state, &encounter, &perks, rng);
    let mut lines = LogLines::new();
    lines.push((
        LogKind::Combat,
        format!("Escape failed. {} hits for {hit}.", encounter.name),
    ));
    take_hit(state, hit, &mut lines);
    state.extend_log(lines);
    Ok(())
}

/// Enemy damage after armor. Armorsmith only helps while body armor is worn.
fn retaliation<R>(
    state: &GameState,
    encounter: &ActiveEncounter,
    perks: &PerkEffects,
    rng: &mut R,
) -> u32
where
    R: Rng + ?Sized,
{
    let rolled = encounter.damage.roll(rng);
    let armored = state.inventory.equipped.get(GearSlot::Body).is_some();
    if armored && perks.armor_bonus > 0.0 {
        let reduced = u32_to_f32(rolled) * (1.0 - perks.armor_bonus);
        round_f32_to_u32(reduced).max(1)
    } else {
        rolled
    }
}

fn take_hit(state: &mut GameState, damage: u32, lines: &mut LogLines) {
    state.set_health(state.player.vitals.health - u32_to_f32(damage));
    if state.player.vitals.health > 0.0 {
        return;
    }

    lines.push((
        LogKind::Error,
        "Vitals critical. Retreat immediately.".to_string(),
    ));
    let lost = state.inventory.scrap / RETREAT_SCRAP_DIVISOR;
    state.inventory.scrap -= lost;
    state.mode = Mode::Explore;
    state.active_encounter = None;
    state.set_health(RETREAT_HEALTH);
    lines.push((
        LogKind::System,
        format!("You drag yourself back to safety. Lost {lost} scrap in the retreat."),
    ));
    log::debug!("forced retreat, {lost} scrap lost");
}
