use rand::Rng;

use super::CommandError;
use crate::catalog::Catalog;
use crate::objectives::{GameEvent, record_event};
use crate::state::{EquipmentItem, GameState, GearSlot, LogKind};

/// `equip <id> [slot]`, `equip <slot> <name>` or `equip <name>`.
pub(super) fn equip<R>(
    state: &mut GameState,
    catalog: &Catalog,
    arg: &str,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    let item = find_item(&state.inventory.items, arg)?.clone();
    let slot = item.slot;

    let previous = state
        .inventory
        .equipped
        .set(slot, Some(item.id.clone()));
    let text = match previous.filter(|id| *id != item.id) {
        Some(previous_id) => {
            let replaced = state
                .inventory
                .item(&previous_id)
                .map_or("previous gear", |old| old.name.as_str());
            format!("Equipped {}. Replaced {replaced}.", item.name)
        }
        None => format!("Equipped {}.", item.name),
    };
    state.push_log(LogKind::System, text);

    record_event(state, catalog, &GameEvent::Equip { slot }, rng);
    Ok(())
}

fn find_item<'a>(items: &'a [EquipmentItem], arg: &str) -> Result<&'a EquipmentItem, CommandError> {
    let mut parts = arg.split_whitespace();
    let first = parts.next().ok_or(CommandError::EquipWhich)?;

    if let Some(item) = items.iter().find(|item| item.id == first) {
        let requested = parts.next().and_then(|word| word.parse::<GearSlot>().ok());
        return check_slot(item, requested);
    }

    let requested = first.parse::<GearSlot>().ok();
    let name = if requested.is_some() {
        parts.collect::<Vec<_>>().join(" ")
    } else {
        arg.to_string()
    };
    if name.is_empty() {
        return Err(CommandError::EquipWhich);
    }

    let needle = name.to_lowercase();
    let matches: Vec<&EquipmentItem> = items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .collect();
    match matches.as_slice() {
        [] => Err(CommandError::ItemNotFound),
        [item] => check_slot(*item, requested),
        many => Err(CommandError::AmbiguousItem {
            names: many
                .iter()
                .map(|item| item.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

fn check_slot(
    item: &EquipmentItem,
    requested: Option<GearSlot>,
) -> Result<&EquipmentItem, CommandError> {
    match requested {
        Some(requested) if requested != item.slot => Err(CommandError::SlotMismatch {
            item: item.name.clone(),
            slot: item.slot,
            requested,
        }),
        _ => Ok(item),
    }
}

/// `unequip <slot>` or `unequip all`.
pub(super) fn unequip<R>(
    state: &mut GameState,
    catalog: &Catalog,
    arg: &str,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    if arg.is_empty() {
        return Err(CommandError::UnequipWhich);
    }
    if arg == "all" {
        state.inventory.equipped.clear();
        state.push_log(LogKind::System, "All gear unequipped.");
        return Ok(());
    }

    let slot = arg
        .parse::<GearSlot>()
        .map_err(|()| CommandError::UnknownSlot)?;
    if state.inventory.equipped.set(slot, None).is_none() {
        state.push_log(LogKind::System, format!("{slot} slot already empty."));
        return Ok(());
    }
    state.push_log(LogKind::System, format!("{slot} slot unequipped."));

    record_event(state, catalog, &GameEvent::Unequip { slot }, rng);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Attribute, ItemKind, Objective, ObjectiveKind, RarityId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::BTreeMap;

    fn item(id: &str, name: &str, slot: GearSlot) -> EquipmentItem {
        EquipmentItem {
            id: id.into(),
            name: name.into(),
            slot,
            kind: ItemKind::Gear,
            rarity: RarityId::Common,
            modifiers: BTreeMap::from([(Attribute::Agi, 1)]),
            value: 24,
        }
    }

    fn stocked() -> GameState {
        let mut state = GameState::new(Catalog::builtin());
        state.inventory.items = vec![
            item("itm-0001", "Rusty Helmet", GearSlot::Head),
            item("itm-0002", "Rusty Blade", GearSlot::Hand),
            item("itm-0003", "Gas Mask", GearSlot::Head),
        ];
        state
    }

    #[test]
    fn equip_resolves_ids_names_and_slots() {
        let catalog = Catalog::builtin();
        let mut state = stocked();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        equip(&mut state, catalog, "itm-0002", &mut rng).expect("by id");
        assert_eq!(state.inventory.equipped.get(GearSlot::Hand), Some("itm-0002"));

        equip(&mut state, catalog, "head rusty helmet", &mut rng).expect("slot and name");
        assert_eq!(state.inventory.equipped.get(GearSlot::Head), Some("itm-0001"));

        equip(&mut state, catalog, "gas mask", &mut rng).expect("name");
        assert_eq!(state.inventory.equipped.get(GearSlot::Head), Some("itm-0003"));
        assert_eq!(
            state.history.last().map(|e| e.text.as_str()),
            Some("Equipped Gas Mask. Replaced Rusty Helmet.")
        );
    }

    #[test]
    fn equip_rejections_leave_state_alone() {
        let catalog = Catalog::builtin();
        let mut state = stocked();
        let before = state.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        assert_eq!(
            equip(&mut state, catalog, "", &mut rng),
            Err(CommandError::EquipWhich)
        );
        assert_eq!(
            equip(&mut state, catalog, "head", &mut rng),
            Err(CommandError::EquipWhich)
        );
        assert_eq!(
            equip(&mut state, catalog, "plasma rifle", &mut rng),
            Err(CommandError::ItemNotFound)
        );
        assert_eq!(
            equip(&mut state, catalog, "rusty", &mut rng),
            Err(CommandError::AmbiguousItem {
                names: "Rusty Helmet, Rusty Blade".into()
            })
        );
        assert_eq!(
            equip(&mut state, catalog, "itm-0001 hand", &mut rng),
            Err(CommandError::SlotMismatch {
                item: "Rusty Helmet".into(),
                slot: GearSlot::Head,
                requested: GearSlot::Hand,
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn equip_then_unequip_restores_slot() {
        let catalog = Catalog::builtin();
        let mut state = stocked();
        let original = state.inventory.equipped.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        equip(&mut state, catalog, "itm-0001", &mut rng).expect("equip");
        unequip(&mut state, catalog, "head", &mut rng).expect("unequip");
        assert_eq!(state.inventory.equipped, original);
        assert_eq!(
            state.history.last().map(|e| e.text.as_str()),
            Some("head slot unequipped.")
        );

        unequip(&mut state, catalog, "head", &mut rng).expect("empty slot");
        assert_eq!(
            state.history.last().map(|e| e.text.as_str()),
            Some("head slot already empty.")
        );
        assert_eq!(
            unequip(&mut state, catalog, "tail", &mut rng),
            Err(CommandError::UnknownSlot)
        );
        assert_eq!(
            unequip(&mut state, catalog, "", &mut rng),
            Err(CommandError::UnequipWhich)
        );
    }

    #[test]
    fn equipping_head_gear_completes_optics_stage() {
        let catalog = Catalog::builtin();
        let mut state = stocked();
        state.story.arc_index = 1;
        state.story.stage_index = 1;
        state.story.objective =
            Objective::new(ObjectiveKind::EquipSlot { slot: GearSlot::Head }, 1);
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        equip(&mut state, catalog, "gas mask", &mut rng).expect("equip");
        assert_eq!(state.story.stage_index, 2);
        assert_eq!(state.story.journal[0].stage, "Calibrate Optics");

        unequip(&mut state, catalog, "all", &mut rng).expect("unequip all");
        assert!(state.inventory.equipped.iter().all(|(_, id)| id.is_none()));
        assert_eq!(state.story.stage_index, 2);
    }
}
