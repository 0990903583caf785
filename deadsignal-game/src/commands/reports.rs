//! Read-only read-outs. None of these touch anything but the history.

use crate::catalog::Catalog;
use crate::constants::SIDE_OPS_ARC_LABEL;
use crate::loot::describe_item;
use crate::numbers::round_f32_to_u32;
use crate::objectives::describe_objective;
use crate::progression::xp_for_level;
use crate::state::{GameState, GearSlot, LogKind, total_attributes};

pub(super) fn status(state: &mut GameState) {
    let vitals = state.player.vitals;
    let attrs = total_attributes(state);
    let level = state.player.level;
    state.extend_log([
        (
            LogKind::System,
            format!(
                "Vitals - HP {}, Hunger {}, Thirst {}.",
                round_f32_to_u32(vitals.health),
                round_f32_to_u32(vitals.hunger),
                round_f32_to_u32(vitals.thirst)
            ),
        ),
        (
            LogKind::System,
            format!(
                "Attributes - STR {}, AGI {}, LUK {}.",
                attrs.strength, attrs.agility, attrs.luck
            ),
        ),
        (
            LogKind::System,
            format!(
                "Level {level} - XP {}/{}.",
                state.player.xp,
                xp_for_level(level)
            ),
        ),
    ]);
}

pub(super) fn intel(state: &mut GameState, catalog: &Catalog) {
    let story = &state.story;
    let (arc, stage) = if story.is_side_ops {
        (SIDE_OPS_ARC_LABEL, "Ongoing")
    } else {
        match catalog.stage(story.arc_index, story.stage_index) {
            Some((arc, stage)) => (arc.title.as_str(), stage.title.as_str()),
            None => ("Unknown", "Unknown"),
        }
    };
    let directive = describe_objective(&story.objective, catalog);
    state.extend_log([
        (LogKind::System, format!("Arc: {arc}.")),
        (LogKind::System, format!("Stage: {stage}.")),
        (LogKind::System, format!("Directive: {directive}")),
    ]);
}

pub(super) fn inventory(state: &mut GameState) {
    let inventory = &state.inventory;
    let equipped = GearSlot::ALL
        .iter()
        .map(|slot| {
            let name = inventory
                .equipped
                .get(*slot)
                .and_then(|id| inventory.item(id))
                .map_or("Empty", |item| item.name.as_str());
            format!("{}: {name}", slot.label())
        })
        .collect::<Vec<_>>()
        .join(" | ");
    let supplies = format!(
        "Supplies - Scrap {}, Electronics {}, Food {}, Water {}.",
        inventory.scrap, inventory.electronics, inventory.food, inventory.water
    );
    let items = if inventory.items.is_empty() {
        "Inventory empty.".to_string()
    } else {
        let listing = inventory
            .items
            .iter()
            .map(|item| {
                let tag = if inventory.equipped.contains(&item.id) {
                    " [EQUIPPED]"
                } else {
                    ""
                };
                format!("{}{tag}", describe_item(item))
            })
            .collect::<Vec<_>>()
            .join(" | ");
        format!("Inventory: {listing}")
    };

    state.extend_log([
        (LogKind::System, format!("Equipped: {equipped}")),
        (LogKind::System, supplies),
        (LogKind::System, items),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Attribute, EquipmentItem, ItemKind, RarityId};
    use std::collections::BTreeMap;

    fn texts(state: &GameState) -> Vec<&str> {
        state.history.iter().skip(3).map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn status_reports_rounded_vitals() {
        let mut state = GameState::default();
        state.player.vitals.hunger = 72.6;
        status(&mut state);
        assert_eq!(
            texts(&state),
            vec![
                "Vitals - HP 100, Hunger 73, Thirst 100.",
                "Attributes - STR 5, AGI 5, LUK 4.",
                "Level 1 - XP 0/100.",
            ]
        );
    }

    #[test]
    fn intel_names_arc_and_stage() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        intel(&mut state, catalog);
        assert_eq!(
            texts(&state),
            vec![
                "Arc: Signal in the Noise.",
                "Stage: Trace the Static.",
                "Directive: Scavenge 0/3 sites.",
            ]
        );

        state.story.is_side_ops = true;
        intel(&mut state, catalog);
        assert_eq!(texts(&state)[3], "Arc: Side Ops.");
        assert_eq!(texts(&state)[4], "Stage: Ongoing.");
    }

    #[test]
    fn inventory_tags_equipped_items() {
        let mut state = GameState::default();
        inventory(&mut state);
        assert_eq!(
            texts(&state)[0],
            "Equipped: Head: Empty | Body: Empty | Hand: Empty | Trinket: Empty"
        );
        assert_eq!(texts(&state)[2], "Inventory empty.");

        state.inventory.items.push(EquipmentItem {
            id: "itm-0001".into(),
            name: "Kevlar Vest".into(),
            slot: GearSlot::Body,
            kind: ItemKind::Armor,
            rarity: RarityId::Uncommon,
            modifiers: BTreeMap::from([(Attribute::Agi, 2)]),
            value: 50,
        });
        state
            .inventory
            .equipped
            .set(GearSlot::Body, Some("itm-0001".into()));
        inventory(&mut state);
        let lines = texts(&state);
        assert_eq!(
            lines[3],
            "Equipped: Head: Empty | Body: Kevlar Vest | Hand: Empty | Trinket: Empty"
        );
        assert_eq!(lines[4], "Supplies - Scrap 25, Electronics 8, Food 3, Water 2.");
        assert_eq!(lines[5], "Inventory: Uncommon Kevlar Vest (+2 AGI) [EQUIPPED]");
    }
}
