use rand::Rng;

use super::{CommandError, Modifiers};
use crate::catalog::{Catalog, RollRange, Zone};
use crate::constants::{
    ENCOUNTER_BASE_CHANCE, ENCOUNTER_CHANCE_MAX, ENCOUNTER_CHANCE_MIN, ENCOUNTER_LUCK_FACTOR,
    ENEMY_ELECTRONICS_PER_TIER_MAX, ENEMY_ELECTRONICS_PER_TIER_MIN, ENEMY_HIGH_TIER,
    ENEMY_ITEM_CHANCE_BASE, ENEMY_ITEM_CHANCE_MAX, ENEMY_ITEM_CHANCE_PER_TIER,
    ENEMY_LOOT_BIAS_HIGH, ENEMY_LOOT_BIAS_LOW, ENEMY_SCRAP_PER_TIER_MAX, ENEMY_SCRAP_PER_TIER_MIN,
    ENEMY_TIER_MAX, ENEMY_TIER_MIN, ITEM_CHANCE_BASE, ITEM_CHANCE_MAX,
};
use crate::loot::{describe_item, mint_item};
use crate::numbers::{round_f32_to_u32, u32_to_f32};
use crate::objectives::{GameEvent, record_event};
use crate::state::{
    ActiveEncounter, EncounterLoot, GameState, LogKind, LogLines, Mode, total_attributes,
};

pub(super) fn scavenge<R>(
    state: &mut GameState,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    if state.in_combat() {
        return Err(CommandError::ScavengeInCombat);
    }

    let mods = Modifiers::of(state, catalog);
    let encounter_chance = encounter_chance(state, &mods);
    log::trace!("scavenge encounter chance {encounter_chance:.3}");

    if rng.gen_bool(f64::from(encounter_chance)) {
        let encounter = spawn_encounter(state, catalog, mods.zone, rng);
        state.push_log(
            LogKind::Combat,
            format!("Encountered {}. Combat initiated.", encounter.name),
        );
        state.mode = Mode::Combat;
        state.active_encounter = Some(encounter);
        return Ok(());
    }

    let profile = mods.zone.resources.unwrap_or(catalog.scavenge_default);
    let scrap = boosted(profile.scrap.roll(rng), mods.perks.scrap_bonus);
    let electronics = boosted(profile.electronics.roll(rng), mods.perks.electronics_bonus);
    let food = boosted(profile.food.roll(rng), mods.perks.food_bonus);
    let water = boosted(profile.water.roll(rng), mods.perks.water_bonus);

    let item_chance = (ITEM_CHANCE_BASE
        + mods.settlement.rare_loot_bonus
        + mods.zone.item_bonus
        + mods.perks.item_bonus)
        .clamp(ITEM_CHANCE_BASE, ITEM_CHANCE_MAX);
    let found = rng.gen_bool(f64::from(item_chance));

    let inventory = &mut state.inventory;
    inventory.scrap = inventory.scrap.saturating_add(scrap);
    inventory.electronics = inventory.electronics.saturating_add(electronics);
    inventory.food = inventory.food.saturating_add(food);
    inventory.water = inventory.water.saturating_add(water);

    let mut lines = LogLines::new();
    lines.push((
        LogKind::Loot,
        format!(
            "Scavenge complete in {}. Recovered {scrap} scrap, {electronics} electronics, {food} food, {water} water.",
            mods.zone.name
        ),
    ));
    if found {
        let bias = mods.settlement.rare_loot_bonus
            + mods.zone.rare_loot_bonus
            + mods.perks.rare_loot_bonus;
        let item = mint_item(state, catalog, bias, rng);
        lines.push((LogKind::Loot, format!("Found {}.", describe_item(&item))));
    } else {
        lines.push((
            LogKind::System,
            "No notable equipment recovered.".to_string(),
        ));
    }
    state.extend_log(lines);

    let event = GameEvent::Scavenge {
        zone_id: mods.zone.id.clone(),
    };
    record_event(state, catalog, &event, rng);
    Ok(())
}

/// Luck, zone and perks shape the odds. Buildings play no part.
fn encounter_chance(state: &GameState, mods: &Modifiers<'_>) -> f32 {
    let luck = u32_to_f32(total_attributes(state).luck);
    (ENCOUNTER_BASE_CHANCE - luck * ENCOUNTER_LUCK_FACTOR
        + mods.zone.encounter_mod
        + mods.perks.encounter_mod)
        .clamp(ENCOUNTER_CHANCE_MIN, ENCOUNTER_CHANCE_MAX)
}

fn boosted(value: u32, bonus: f32) -> u32 {
    round_f32_to_u32(u32_to_f32(value) * (1.0 + bonus))
}

fn spawn_encounter<R>(
    state: &GameState,
    catalog: &Catalog,
    zone: &Zone,
    rng: &mut R,
) -> ActiveEncounter
where
    R: Rng + ?Sized,
{
    let level_tier = 1 + state.player.level / 2 + zone.enemy_tier_bonus;
    let tier_cap = u8::try_from(level_tier)
        .unwrap_or(ENEMY_TIER_MAX)
        .clamp(ENEMY_TIER_MIN, ENEMY_TIER_MAX);
    let candidates: Vec<_> = catalog
        .enemies
        .iter()
        .filter(|enemy| enemy.tier <= tier_cap + 1)
        .collect();
    // Validation guarantees tiers 1-2 exist, so the pool is never empty.
    let template = candidates[rng.gen_range(0..candidates.len())];
    let hp = template.hp.roll(rng);

    let tier = u32::from(template.tier);
    let scrap = RollRange::new(
        ENEMY_SCRAP_PER_TIER_MIN * tier,
        ENEMY_SCRAP_PER_TIER_MAX * tier,
    )
    .roll(rng);
    let electronics = RollRange::new(
        ENEMY_ELECTRONICS_PER_TIER_MIN * tier,
        ENEMY_ELECTRONICS_PER_TIER_MAX * tier,
    )
    .roll(rng);
    let item_chance = (ENEMY_ITEM_CHANCE_BASE + u32_to_f32(tier) * ENEMY_ITEM_CHANCE_PER_TIER)
        .clamp(ENEMY_ITEM_CHANCE_BASE, ENEMY_ITEM_CHANCE_MAX);
    let loot_bonus = if template.tier >= ENEMY_HIGH_TIER {
        ENEMY_LOOT_BIAS_HIGH
    } else {
        ENEMY_LOOT_BIAS_LOW
    };
    log::trace!(
        "spawned {} (tier {}, cap {tier_cap}) with {hp} hp",
        template.name,
        template.tier
    );

    ActiveEncounter {
        id: format!("enc-{}", state.history.next_id()),
        name: template.name.clone(),
        tier: template.tier,
        hp,
        max_hp: hp,
        damage: template.damage,
        loot: EncounterLoot {
            scrap,
            electronics,
            item_chance,
        },
        loot_bonus,
    }
}
