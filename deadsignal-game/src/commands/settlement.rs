use rand::Rng;

use super::{CommandError, Modifiers};
use crate::catalog::Catalog;
use crate::loot::{describe_item, mint_item};
use crate::numbers::{ceil_f32_to_u32, u32_to_f32};
use crate::objectives::{GameEvent, record_event};
use crate::state::{GameState, LogKind};

pub(super) fn build<R>(
    state: &mut GameState,
    catalog: &Catalog,
    arg: &str,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    let building = catalog
        .resolve_building(arg)
        .ok_or(CommandError::UnknownStructure)?;
    if state.settlement.has_building(&building.id) {
        state.push_log(LogKind::System, "Structure already built.");
        return Ok(());
    }

    let cost = building.cost;
    let inventory = &mut state.inventory;
    if inventory.scrap < cost.scrap || inventory.electronics < cost.electronics {
        return Err(CommandError::InsufficientMaterials {
            scrap: cost.scrap,
            electronics: cost.electronics,
        });
    }
    inventory.scrap -= cost.scrap;
    inventory.electronics -= cost.electronics;
    state.settlement.buildings.push(building.id.clone());
    state.push_log(LogKind::System, format!("{} constructed.", building.name));
    log::debug!("built {} at tick {}", building.id, state.time);

    let event = GameEvent::Build {
        building_id: building.id.clone(),
    };
    record_event(state, catalog, &event, rng);
    Ok(())
}

pub(super) fn salvage<R>(
    state: &mut GameState,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    if state.in_combat() {
        return Err(CommandError::SalvageInCombat);
    }

    let mods = Modifiers::of(state, catalog);
    let mult = mods.perks.salvage_cost_mult;
    let scrap = ceil_f32_to_u32(u32_to_f32(catalog.salvage_cost.scrap) * mult);
    let electronics = ceil_f32_to_u32(u32_to_f32(catalog.salvage_cost.electronics) * mult);
    if state.inventory.scrap < scrap || state.inventory.electronics < electronics {
        return Err(CommandError::SalvageCost { scrap, electronics });
    }

    state.inventory.scrap -= scrap;
    state.inventory.electronics -= electronics;
    let bias = mods.settlement.rare_loot_bonus + mods.zone.rare_loot_bonus;
    let item = mint_item(state, catalog, bias, rng);
    state.push_log(
        LogKind::Loot,
        format!("Salvage complete. Assembled {}.", describe_item(&item)),
    );

    record_event(state, catalog, &GameEvent::Salvage, rng);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn build_by_display_name_deducts_cost() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        build(&mut state, catalog, "waterpurifier", &mut rng).expect("build");

        assert_eq!(state.settlement.buildings, vec!["waterPurifier".to_string()]);
        assert_eq!(state.inventory.scrap, 5);
        assert_eq!(state.inventory.electronics, 0);
        assert_eq!(
            state.history.last().map(|e| e.text.as_str()),
            Some("Water Purifier constructed.")
        );

        build(&mut state, catalog, "waterPurifier", &mut rng).expect("duplicate is a notice");
        assert_eq!(state.settlement.buildings.len(), 1);
        assert_eq!(
            state.history.last().map(|e| e.text.as_str()),
            Some("Structure already built.")
        );
    }

    #[test]
    fn build_rejects_unknown_and_unaffordable() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        let before = state.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        assert_eq!(
            build(&mut state, catalog, "moonbase", &mut rng),
            Err(CommandError::UnknownStructure)
        );
        assert_eq!(
            build(&mut state, catalog, "hydroponicslab", &mut rng),
            Err(CommandError::InsufficientMaterials {
                scrap: 55,
                electronics: 25
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn salvage_mints_an_item() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        salvage(&mut state, catalog, &mut rng).expect("salvage");
        assert_eq!(state.inventory.scrap, 25 - 14);
        assert_eq!(state.inventory.electronics, 8 - 5);
        assert_eq!(state.inventory.items.len(), 1);
        assert_eq!(state.inventory.items[0].id, "itm-0001");
        assert_eq!(state.history.last().map(|e| e.kind), Some(LogKind::Loot));
    }

    #[test]
    fn salvage_cost_honors_discounts() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        state.player.perks.push("scrapper".into());
        state.settlement.buildings.push("workshop".into());
        state.inventory.scrap = 7;
        state.inventory.electronics = 2;
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        // Only perks discount salvage: ceil(14 * 0.7) = 10, ceil(5 * 0.7) = 4.
        assert_eq!(
            salvage(&mut state, catalog, &mut rng),
            Err(CommandError::SalvageCost {
                scrap: 10,
                electronics: 4
            })
        );

        state.mode = Mode::Combat;
        assert_eq!(
            salvage(&mut state, catalog, &mut rng),
            Err(CommandError::SalvageInCombat)
        );
    }
}
