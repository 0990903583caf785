use std::hash::Hasher;

use twox_hash::XxHash64;

use crate::catalog::Catalog;
use crate::engine::{Action, reduce};
use crate::rng::{RngStreams, StreamDraws};
use crate::state::{GameState, LogEntry};

/// High-level session binding a game state to its seeded random streams.
///
/// Commands draw from the `command` stream and ticks from the `tick` stream,
/// so the same seed and input script always reproduce the same snapshot.
#[derive(Debug, Clone)]
pub struct TerminalSession<'c> {
    catalog: &'c Catalog,
    streams: RngStreams,
    state: GameState,
}

impl TerminalSession<'static> {
    /// Fresh run on the embedded catalog.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_catalog(Catalog::builtin(), seed)
    }
}

impl<'c> TerminalSession<'c> {
    #[must_use]
    pub fn with_catalog(catalog: &'c Catalog, seed: u64) -> Self {
        Self {
            catalog,
            streams: RngStreams::from_user_seed(seed),
            state: GameState::new(catalog),
        }
    }

    /// Resume from an existing snapshot.
    #[must_use]
    pub fn from_state(catalog: &'c Catalog, state: GameState, seed: u64) -> Self {
        Self {
            catalog,
            streams: RngStreams::from_user_seed(seed),
            state,
        }
    }

    /// Submit a line of terminal input and return the entries it appended.
    pub fn submit(&mut self, raw: &str) -> Vec<LogEntry> {
        let first_new = self.state.history.next_id();
        let action = Action::Command(raw.to_string());
        reduce(&mut self.state, self.catalog, &action, self.streams.command());
        self.state.history.since(first_new).cloned().collect()
    }

    /// Advance one tick and return the entries it appended.
    pub fn tick(&mut self) -> Vec<LogEntry> {
        self.tick_n(1)
    }

    /// Advance `n` ticks and return everything they appended.
    pub fn tick_n(&mut self, n: u32) -> Vec<LogEntry> {
        let first_new = self.state.history.next_id();
        for _ in 0..n {
            reduce(&mut self.state, self.catalog, &Action::Tick, self.streams.tick());
        }
        self.state.history.since(first_new).cloned().collect()
    }

    pub fn set_tab(&mut self, tab: &str) {
        let action = Action::SetTab(tab.to_string());
        reduce(&mut self.state, self.catalog, &action, self.streams.command());
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.streams.seed()
    }

    /// Deterministically reseed both streams. The snapshot is kept.
    pub fn reseed(&mut self, seed: u64) {
        self.streams = RngStreams::from_user_seed(seed);
    }

    #[must_use]
    pub const fn draws(&self) -> StreamDraws {
        self.streams.draws()
    }

    /// XxHash64 of the canonical JSON snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let bytes = serde_json::to_vec(&self.state).unwrap_or_default();
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&bytes);
        hasher.finish()
    }
}
