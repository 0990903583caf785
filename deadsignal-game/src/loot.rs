//! Procedural equipment generation.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use crate::catalog::{Affix, Catalog, Rarity};
use crate::constants::{
    ITEM_VALUE_FACTOR, MAX_ROLLED_MODIFIERS, MODIFIER_CAP, PREFIX_CHANCE, SUFFIX_CHANCE,
};
use crate::numbers::{round_f32_to_u32, u32_to_f32};
use crate::state::{Attribute, EquipmentItem, GameState};

/// Roll a new item.
///
/// `rare_loot_bonus` is the probability of re-rolling the rarity among the
/// non-common tiers; zero or less skips the extra roll entirely.
pub fn generate_item<R>(
    catalog: &Catalog,
    rare_loot_bonus: f32,
    id: String,
    rng: &mut R,
) -> EquipmentItem
where
    R: Rng + ?Sized,
{
    let base = &catalog.base_items[rng.gen_range(0..catalog.base_items.len())];
    let rarity = pick_rarity(catalog, rare_loot_bonus, rng);
    let prefix = roll_affix(&catalog.prefixes, PREFIX_CHANCE, rng);
    let suffix = roll_affix(&catalog.suffixes, SUFFIX_CHANCE, rng);

    let mut candidates: Vec<Attribute> = Vec::with_capacity(base.stats.len());
    for stat in &base.stats {
        if !candidates.contains(stat) {
            candidates.push(*stat);
        }
    }
    let count = rng.gen_range(1..=candidates.len().min(MAX_ROLLED_MODIFIERS));
    let (chosen, _) = candidates.partial_shuffle(rng, count);

    let mut raw: BTreeMap<Attribute, i32> = BTreeMap::new();
    for stat in chosen.iter() {
        let rolled = rarity.stat_range.roll(rng);
        raw.insert(*stat, i32::try_from(rolled).unwrap_or(i32::MAX));
    }
    for affix in prefix.iter().chain(suffix.iter()) {
        for (key, delta) in &affix.stats {
            for attribute in key.targets() {
                *raw.entry(*attribute).or_insert(0) += i32::from(*delta);
            }
        }
    }
    let modifiers = raw
        .into_iter()
        .map(|(attribute, value)| {
            let clamped = value.clamp(0, i32::from(MODIFIER_CAP));
            (attribute, u8::try_from(clamped).unwrap_or(MODIFIER_CAP))
        })
        .collect();

    let name = [
        prefix.map(|affix| affix.name.as_str()),
        Some(base.name.as_str()),
        suffix.map(|affix| affix.name.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    let spread = u32_to_f32(rarity.stat_range.min + rarity.stat_range.max + 2);
    let value = round_f32_to_u32(spread * ITEM_VALUE_FACTOR * rarity.value_mult);

    EquipmentItem {
        id,
        name,
        slot: base.slot,
        kind: base.kind,
        rarity: rarity.id,
        modifiers,
        value,
    }
}

/// Generate an item, assign it the next id, and add it to the inventory.
pub(crate) fn mint_item<R>(
    state: &mut GameState,
    catalog: &Catalog,
    rare_loot_bonus: f32,
    rng: &mut R,
) -> EquipmentItem
where
    R: Rng + ?Sized,
{
    let id = state.allocate_item_id();
    let item = generate_item(catalog, rare_loot_bonus, id, rng);
    log::trace!("minted {} ({:?}, bias {rare_loot_bonus:.2})", item.id, item.rarity);
    state.inventory.items.push(item.clone());
    item
}

/// `+2 STR, +1 AGI`
#[must_use]
pub fn format_modifiers(modifiers: &BTreeMap<Attribute, u8>) -> String {
    modifiers
        .iter()
        .map(|(attribute, value)| format!("+{value} {}", attribute.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Rare Heavy Rusty Blade (+2 STR)`
#[must_use]
pub fn describe_item(item: &EquipmentItem) -> String {
    format!(
        "{} {} ({})",
        item.rarity.label(),
        item.name,
        format_modifiers(&item.modifiers)
    )
}

fn pick_rarity<'a, R>(catalog: &'a Catalog, rare_loot_bonus: f32, rng: &mut R) -> &'a Rarity
where
    R: Rng + ?Sized,
{
    let base = weighted_pick(&catalog.rarities, |rarity| rarity.weight, rng);
    if rare_loot_bonus > 0.0 && rng.gen_bool(f64::from(rare_loot_bonus.min(1.0))) {
        if let Some(upgraded) =
            weighted_pick(catalog.rarities.get(1..).unwrap_or(&[]), |r| r.weight, rng)
        {
            return upgraded;
        }
    }
    base.unwrap_or(&catalog.rarities[0])
}

fn roll_affix<'a, R>(affixes: &'a [Affix], chance: f64, rng: &mut R) -> Option<&'a Affix>
where
    R: Rng + ?Sized,
{
    if rng.gen_bool(chance) {
        weighted_pick(affixes, |affix| affix.weight, rng)
    } else {
        None
    }
}

/// Integer-weighted pick; zero-weight entries are never chosen unless all are zero.
pub(crate) fn weighted_pick<'a, T, R>(
    entries: &'a [T],
    weight: impl Fn(&T) -> u32,
    rng: &mut R,
) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let total = entries
        .iter()
        .fold(0_u32, |sum, entry| sum.saturating_add(weight(entry)));
    if total == 0 {
        return entries.first();
    }
    let mut roll = rng.gen_range(0..total);
    for entry in entries {
        let entry_weight = weight(entry);
        if roll < entry_weight {
            return Some(entry);
        }
        roll -= entry_weight;
    }
    entries.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GearSlot, RarityId};
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn generated_items_respect_bounds() {
        let catalog = Catalog::builtin();
        let mut rng = ChaCha20Rng::seed_from_u64(0x10_07);
        for idx in 0..500 {
            let item = generate_item(catalog, 0.1, format!("itm-{idx:04}"), &mut rng);
            assert!(!item.modifiers.is_empty());
            assert!(item.modifiers.values().all(|v| *v <= MODIFIER_CAP));
            assert!(GearSlot::ALL.contains(&item.slot));

            let base = catalog
                .base_items
                .iter()
                .find(|b| item.name.contains(b.name.as_str()))
                .expect("name embeds base");
            assert_eq!(base.slot, item.slot);

            let rarity = catalog
                .rarities
                .iter()
                .find(|r| r.id == item.rarity)
                .expect("rarity");
            let spread = u32_to_f32(rarity.stat_range.min + rarity.stat_range.max + 2);
            assert_eq!(item.value, round_f32_to_u32(spread * 12.0 * rarity.value_mult));
        }
    }

    #[test]
    fn full_bonus_never_yields_common() {
        let catalog = Catalog::builtin();
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        for idx in 0..200 {
            let item = generate_item(catalog, 1.0, format!("itm-{idx}"), &mut rng);
            assert_ne!(item.rarity, RarityId::Common);
        }
    }

    #[test]
    fn legendary_value_matches_formula() {
        // (4 + 6 + 2) * 12 * 4
        let catalog = Catalog::builtin();
        let legendary = &catalog.rarities[4];
        let spread = u32_to_f32(legendary.stat_range.min + legendary.stat_range.max + 2);
        assert_eq!(round_f32_to_u32(spread * ITEM_VALUE_FACTOR * legendary.value_mult), 576);
    }

    #[test]
    fn weighted_pick_walks_cumulative_weights() {
        let weights = [55_u32, 25, 12, 6, 2];
        let mut low = StepRng::new(0, 0);
        assert_eq!(weighted_pick(&weights, |w| *w, &mut low), Some(&55));
        // 4_252_017_624 / 2^32 ~= 0.99, so the roll lands on 99 of 100.
        let mut high = StepRng::new(4_252_017_624, 0);
        assert_eq!(weighted_pick(&weights, |w| *w, &mut high), Some(&2));
        let empty: [u32; 0] = [];
        assert_eq!(weighted_pick(&empty, |w| *w, &mut low), None);
    }

    #[test]
    fn formatting_uses_attribute_order() {
        let modifiers = BTreeMap::from([(Attribute::Luk, 1), (Attribute::Str, 2)]);
        assert_eq!(format_modifiers(&modifiers), "+2 STR, +1 LUK");
    }

    #[test]
    fn mint_assigns_sequential_ids() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let first = mint_item(&mut state, catalog, 0.0, &mut rng);
        let second = mint_item(&mut state, catalog, 0.0, &mut rng);
        assert_eq!(first.id, "itm-0001");
        assert_eq!(second.id, "itm-0002");
        assert_eq!(state.inventory.items.len(), 2);
    }
}
