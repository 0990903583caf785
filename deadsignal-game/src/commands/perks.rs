use super::CommandError;
use crate::catalog::{Catalog, Perk};
use crate::state::{GameState, LogKind, LogLines};

pub(super) fn list(state: &mut GameState, catalog: &Catalog) {
    let player = &state.player;
    let owned = catalog
        .perks
        .iter()
        .filter(|perk| player.has_perk(&perk.id))
        .map(|perk| perk.name.as_str())
        .collect::<Vec<_>>();
    let owned_text = if owned.is_empty() {
        "None".to_string()
    } else {
        owned.join(" | ")
    };

    let mut lines = LogLines::new();
    lines.push((
        LogKind::System,
        format!("Perk points: {}.", player.perk_points),
    ));
    lines.push((LogKind::System, format!("Owned perks: {owned_text}.")));
    let mut available = catalog
        .perks
        .iter()
        .filter(|perk| !player.has_perk(&perk.id))
        .peekable();
    if available.peek().is_some() {
        lines.push((LogKind::System, "Available perks:".to_string()));
        lines.extend(available.map(|perk| {
            (
                LogKind::System,
                format!("  [{}] {} - {}", perk.id, perk.name, perk.description),
            )
        }));
    } else {
        lines.push((LogKind::System, "All perks acquired!".to_string()));
    }
    state.extend_log(lines);
}

pub(super) fn choose(
    state: &mut GameState,
    catalog: &Catalog,
    arg: &str,
) -> Result<(), CommandError> {
    if state.player.perk_points == 0 {
        return Err(CommandError::NoPerkPoints);
    }
    let perk = resolve(catalog, arg)?;
    if state.player.has_perk(&perk.id) {
        return Err(CommandError::PerkOwned);
    }

    let player = &mut state.player;
    player.perk_points -= 1;
    player.perks.push(perk.id.clone());
    for (attribute, amount) in &perk.attribute_grant {
        player.attributes.add(*attribute, *amount);
    }
    state.push_log(LogKind::System, format!("Perk acquired: {}.", perk.name));
    log::debug!("perk {} acquired", perk.id);
    Ok(())
}

/// Exact id, then words joined in camelCase, then a name substring. A
/// substring that hits more than one perk is rejected.
fn resolve<'c>(catalog: &'c Catalog, arg: &str) -> Result<&'c Perk, CommandError> {
    let needle = arg.to_lowercase();
    let camel: String = needle
        .split_whitespace()
        .enumerate()
        .map(|(idx, word)| {
            if idx == 0 {
                return word.to_string();
            }
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect();

    if let Some(perk) = catalog
        .perks
        .iter()
        .find(|perk| perk.id.to_lowercase() == needle || perk.id == camel)
        .filter(|_| !needle.is_empty())
    {
        return Ok(perk);
    }

    let matches: Vec<&Perk> = catalog
        .perks
        .iter()
        .filter(|perk| perk.name.to_lowercase().contains(&needle))
        .collect();
    match matches.as_slice() {
        [perk] => Ok(*perk),
        [] => Err(CommandError::UnknownPerk {
            ids: catalog
                .perks
                .iter()
                .map(|perk| perk.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
        many => Err(CommandError::AmbiguousPerk {
            names: many
                .iter()
                .map(|perk| perk.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choosing_without_points_is_rejected() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        let before = state.clone();
        assert_eq!(
            choose(&mut state, catalog, "scavenger"),
            Err(CommandError::NoPerkPoints)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn resolution_order() {
        let catalog = Catalog::builtin();
        let id = |arg: &str| resolve(catalog, arg).ok().map(|perk| perk.id.as_str());
        assert_eq!(id("fieldmedic"), Some("fieldMedic"));
        assert_eq!(id("field medic"), Some("fieldMedic"));
        assert_eq!(id("whisperer"), Some("circuitWhisperer"));
        assert_eq!(id("teleport"), None);
    }

    #[test]
    fn ambiguous_name_keeps_the_point() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        state.player.perk_points = 1;
        let before = state.clone();
        assert_eq!(
            choose(&mut state, catalog, "master"),
            Err(CommandError::AmbiguousPerk {
                names: "Canteen Master, Master Scrapper".into()
            })
        );
        assert_eq!(state, before);

        choose(&mut state, catalog, "master scrapper").expect("unique name");
        assert_eq!(state.player.perks, vec!["scrapper".to_string()]);
        assert_eq!(state.player.perk_points, 0);
    }

    #[test]
    fn acquisition_spends_a_point_and_applies_grants() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        state.player.perk_points = 2;
        choose(&mut state, catalog, "tactician").expect("perk");
        assert_eq!(state.player.perk_points, 1);
        assert_eq!(state.player.perks, vec!["tactician".to_string()]);
        assert_eq!(state.player.attributes.strength, 7);
        assert_eq!(state.player.attributes.agility, 7);
        assert_eq!(state.player.attributes.luck, 4);
        assert_eq!(
            state.history.last().map(|e| e.text.as_str()),
            Some("Perk acquired: Tactician.")
        );

        assert_eq!(
            choose(&mut state, catalog, "tactician"),
            Err(CommandError::PerkOwned)
        );
        let err = choose(&mut state, catalog, "teleport").expect_err("unknown");
        assert!(err.to_string().starts_with("Perk id not recognized. Try: scavenger, "));
    }

    #[test]
    fn listing_reports_points_and_availability() {
        let catalog = Catalog::builtin();
        let mut state = GameState::new(catalog);
        state.player.perks.push("scavenger".into());
        list(&mut state, catalog);
        let lines: Vec<&str> = state.history.iter().skip(3).map(|e| e.text.as_str()).collect();
        assert_eq!(lines[0], "Perk points: 0.");
        assert_eq!(lines[1], "Owned perks: Scavenger Instincts.");
        assert_eq!(lines[2], "Available perks:");
        assert_eq!(lines.len(), 3 + catalog.perks.len() - 1);
        assert!(lines[3].starts_with("  [circuitWhisperer] Circuit Whisperer - "));
    }
}
