//! The reducer: one action in, one new snapshot out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::commands::{self, Command};
use crate::state::GameState;
use crate::tick;

/// Everything a presentation layer can send to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Raw terminal input, echoed verbatim into the history.
    Command(String),
    Tick,
    /// UI view selector; no game effect.
    SetTab(String),
}

/// Apply an action against the embedded catalog.
#[must_use]
pub fn apply<R>(state: &GameState, action: &Action, rng: &mut R) -> GameState
where
    R: Rng + ?Sized,
{
    apply_with_catalog(state, Catalog::builtin(), action, rng)
}

/// Apply an action and return the resulting snapshot. `state` is never modified.
#[must_use]
pub fn apply_with_catalog<R>(
    state: &GameState,
    catalog: &Catalog,
    action: &Action,
    rng: &mut R,
) -> GameState
where
    R: Rng + ?Sized,
{
    let mut next = state.clone();
    reduce(&mut next, catalog, action, rng);
    next
}

/// In-place form of [`apply_with_catalog`] for owners of a working copy.
pub fn reduce<R>(state: &mut GameState, catalog: &Catalog, action: &Action, rng: &mut R)
where
    R: Rng + ?Sized,
{
    match action {
        Action::Command(raw) => {
            let Some(command) = Command::parse(raw) else {
                return;
            };
            log::debug!("t={} command {}", state.time, command.verb());
            commands::execute(state, catalog, raw, &command, rng);
        }
        Action::Tick => tick::tick(state, catalog, rng),
        Action::SetTab(tab) => state.current_tab.clone_from(tab),
    }
}
