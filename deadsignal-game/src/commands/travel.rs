use rand::Rng;

use super::CommandError;
use crate::catalog::Catalog;
use crate::objectives::{GameEvent, record_event};
use crate::state::{GameState, LogKind};

pub(super) fn travel<R>(
    state: &mut GameState,
    catalog: &Catalog,
    arg: &str,
    rng: &mut R,
) -> Result<(), CommandError>
where
    R: Rng + ?Sized,
{
    if arg.is_empty() || arg == "list" {
        list_zones(state, catalog);
        return Ok(());
    }

    let zone = catalog.resolve_zone(arg).ok_or(CommandError::UnknownZone)?;
    state.world.current_zone.clone_from(&zone.id);
    state.push_log(LogKind::System, format!("Travel route set to {}.", zone.name));

    let event = GameEvent::Travel {
        zone_id: zone.id.clone(),
    };
    record_event(state, catalog, &event, rng);
    Ok(())
}

fn list_zones(state: &mut GameState, catalog: &Catalog) {
    let current = catalog.active_zone(&state.world.current_zone);
    let directory = catalog
        .zones
        .iter()
        .map(|zone| format!("{}: {}", zone.name, zone.description))
        .collect::<Vec<_>>()
        .join(" | ");
    state.extend_log([
        (LogKind::System, format!("Current zone: {}.", current.name)),
        (LogKind::System, format!("Zones: {directory}")),
    ]);
}
