//! Clock tick: vitals decay, passive settlement production and narrative drip.

use rand::Rng;

use crate::catalog::Catalog;
use crate::constants::{
    DEHYDRATION_HEALTH_PENALTY, GARDEN_BASE_HARVEST, HUNGER_DECAY_PER_TICK, HYDROPONICS_BASE_HARVEST,
    HYDROPONICS_BUILDING, NARRATIVE_DRIP_CHANCE, NARRATIVE_DRIP_INTERVAL, PURIFIER_BUILDING,
    PURIFIER_INTERVAL_TICKS, RESOURCE_SOFT_CAP, SIDE_OPS_TAG, SMELTER_BUILDING,
    SMELTER_INTERVAL_TICKS, STAMINA_REGEN_PER_TICK, STARVATION_HEALTH_PENALTY,
    THIRST_DECAY_PER_TICK, VITAL_CAP,
};
use crate::effects::{PerkEffects, SettlementEffects};
use crate::numbers::{floor_f32_to_u32, u32_to_f32};
use crate::state::{GameState, LogKind};

/// Advance the clock by one tick in place.
pub fn tick<R>(state: &mut GameState, catalog: &Catalog, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let perks = PerkEffects::for_player(&state.player, catalog);
    let settlement = SettlementEffects::for_settlement(&state.settlement, catalog);

    state.time += 1;
    decay_vitals(state, &perks, &settlement);
    run_purifier(state);
    run_smelter(state);
    if run_garden(state, &settlement) {
        return;
    }
    narrative_drip(state, catalog, rng);
}

fn decay_vitals(state: &mut GameState, perks: &PerkEffects, settlement: &SettlementEffects) {
    let vitals = &mut state.player.vitals;
    let hunger_decay = HUNGER_DECAY_PER_TICK * perks.hunger_decay_mult;
    let thirst_decay =
        THIRST_DECAY_PER_TICK * settlement.thirst_decay_mult * perks.thirst_decay_mult;
    vitals.hunger = (vitals.hunger - hunger_decay).clamp(0.0, VITAL_CAP);
    vitals.thirst = (vitals.thirst - thirst_decay).clamp(0.0, VITAL_CAP);
    vitals.stamina = (vitals.stamina + STAMINA_REGEN_PER_TICK).clamp(0.0, VITAL_CAP);

    let mut penalty = 0.0;
    if vitals.hunger <= 0.0 {
        penalty += STARVATION_HEALTH_PENALTY;
    }
    if vitals.thirst <= 0.0 {
        penalty += DEHYDRATION_HEALTH_PENALTY;
    }
    if penalty > 0.0 {
        state.set_health(state.player.vitals.health - penalty);
    }
}

/// Add passive output without pushing past the soft cap. Stocks already
/// above the cap (from scavenging) are left alone.
fn produce(stock: &mut u32, amount: u32) {
    if *stock < RESOURCE_SOFT_CAP {
        *stock = stock.saturating_add(amount).min(RESOURCE_SOFT_CAP);
    }
}

fn run_purifier(state: &mut GameState) {
    if !state.settlement.has_building(PURIFIER_BUILDING) {
        return;
    }
    let progress = state.settlement.purifier_progress + 1;
    if progress >= PURIFIER_INTERVAL_TICKS {
        produce(&mut state.inventory.water, 1);
        state.settlement.purifier_progress = 0;
    } else {
        state.settlement.purifier_progress = progress;
    }
}

/// Progress keeps accruing while there is no scrap to feed in.
fn run_smelter(state: &mut GameState) {
    if !state.settlement.has_building(SMELTER_BUILDING) {
        return;
    }
    let progress = state.settlement.smelter_progress.saturating_add(1);
    if progress >= SMELTER_INTERVAL_TICKS && state.inventory.scrap >= 1 {
        state.inventory.scrap -= 1;
        produce(&mut state.inventory.electronics, 1);
        state.settlement.smelter_progress = 0;
    } else {
        state.settlement.smelter_progress = progress;
    }
}

/// Returns true when a harvest landed, which ends the tick.
fn run_garden(state: &mut GameState, settlement: &SettlementEffects) -> bool {
    let Some(interval) = settlement.food_interval else {
        return false;
    };
    let progress = state.settlement.garden_progress + 1;
    if progress < interval {
        state.settlement.garden_progress = progress;
        return false;
    }

    let base = if state.settlement.has_building(HYDROPONICS_BUILDING) {
        HYDROPONICS_BASE_HARVEST
    } else {
        GARDEN_BASE_HARVEST
    };
    let harvest = floor_f32_to_u32(u32_to_f32(base) * settlement.food_multiplier);
    produce(&mut state.inventory.food, harvest);
    state.settlement.garden_progress = 0;
    state.push_log(
        LogKind::System,
        format!("Garden harvest ready. +{harvest} food."),
    );
    log::trace!("garden harvest {harvest} at tick {}", state.time);
    true
}

fn narrative_drip<R>(state: &mut GameState, catalog: &Catalog, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let since = state.time.saturating_sub(state.story.last_transmission_at);
    if since < NARRATIVE_DRIP_INTERVAL || !rng.gen_bool(f64::from(NARRATIVE_DRIP_CHANCE)) {
        return;
    }
    let bark = &catalog.barks[rng.gen_range(0..catalog.barks.len())];
    let tag = if state.story.is_side_ops {
        SIDE_OPS_TAG
    } else {
        catalog
            .arc(state.story.arc_index)
            .map_or("TRANSMISSION", |arc| arc.title.as_str())
    };
    state.story.last_transmission_at = state.time;
    state.push_log(LogKind::System, format!("[{tag}] {bark}"));
}
