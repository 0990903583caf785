//! Story and side-op objective tracking.
//!
//! The tracker walks the scripted arcs stage by stage and, once the last arc
//! closes, switches permanently into procedurally rolled side ops. Handlers
//! report what happened as a [`GameEvent`]; progress only ever moves forward.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Reward, SideOpObjective};
use crate::constants::{SIDE_OPS_ARC_LABEL, SIDE_OP_FALLBACK_TITLE};
use crate::loot::{describe_item, mint_item};
use crate::progression::apply_level_ups;
use crate::state::{GameState, GearSlot, JournalEntry, LogKind, LogLines, Objective, ObjectiveKind};

/// Something a handler did that objectives may care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Scavenge { zone_id: String },
    Travel { zone_id: String },
    Defeat { tier: u8 },
    Build { building_id: String },
    Salvage,
    Equip { slot: GearSlot },
    Unequip { slot: GearSlot },
}

/// Player-facing directive text for an objective.
#[must_use]
pub fn describe_objective(objective: &Objective, catalog: &Catalog) -> String {
    let progress = objective.progress;
    let required = objective.required;
    match &objective.kind {
        ObjectiveKind::ScavengeCount => format!("Scavenge {progress}/{required} sites."),
        ObjectiveKind::ZoneScavenge { zone_id } => {
            format!("Scavenge {} ({progress}/{required}).", zone_name(catalog, zone_id))
        }
        ObjectiveKind::TravelZone { zone_id } => {
            format!("Travel to {}.", zone_name(catalog, zone_id))
        }
        ObjectiveKind::DefeatTier { tier } => {
            format!("Defeat tier {tier}+ threats ({progress}/{required}).")
        }
        ObjectiveKind::BuildStructure { building_id } => {
            let name = catalog
                .building(building_id)
                .map_or("required structure", |b| b.name.as_str());
            format!("Construct {name}.")
        }
        ObjectiveKind::SalvageCount => format!("Salvage gear ({progress}/{required})."),
        ObjectiveKind::EquipSlot { slot } => {
            format!("Equip a {} item ({progress}/{required}).", slot.label())
        }
    }
}

fn zone_name<'a>(catalog: &'a Catalog, zone_id: &str) -> &'a str {
    catalog
        .zone(zone_id)
        .map_or("target zone", |zone| zone.name.as_str())
}

/// Feed an event to the active objective and advance the story if it completes.
pub fn record_event<R>(state: &mut GameState, catalog: &Catalog, event: &GameEvent, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if !apply_progress(&mut state.story.objective, event) {
        return;
    }
    log::trace!(
        "objective progress {}/{} after {event:?}",
        state.story.objective.progress,
        state.story.objective.required
    );
    if !state.story.objective.is_complete() {
        return;
    }

    if advance(state, catalog, rng) {
        // The first side op is checked against the zone the player stands in.
        let zone_id = catalog.active_zone(&state.world.current_zone).id.clone();
        let bootstrap = GameEvent::Scavenge { zone_id };
        if apply_progress(&mut state.story.objective, &bootstrap)
            && state.story.objective.is_complete()
        {
            advance(state, catalog, rng);
        }
    }
}

/// Returns whether progress moved.
fn apply_progress(objective: &mut Objective, event: &GameEvent) -> bool {
    let step = objective.progress.saturating_add(1);
    let next = match (&objective.kind, event) {
        (ObjectiveKind::ScavengeCount, GameEvent::Scavenge { .. })
        | (ObjectiveKind::SalvageCount, GameEvent::Salvage) => step,
        (ObjectiveKind::ZoneScavenge { zone_id }, GameEvent::Scavenge { zone_id: at })
            if zone_id == at =>
        {
            step
        }
        (ObjectiveKind::DefeatTier { tier }, GameEvent::Defeat { tier: defeated })
            if defeated >= tier =>
        {
            step
        }
        (ObjectiveKind::TravelZone { zone_id }, GameEvent::Travel { zone_id: to })
            if zone_id == to =>
        {
            objective.required
        }
        (ObjectiveKind::BuildStructure { building_id }, GameEvent::Build { building_id: built })
            if building_id == built =>
        {
            objective.required
        }
        (ObjectiveKind::EquipSlot { slot }, GameEvent::Equip { slot: equipped })
            if slot == equipped =>
        {
            objective.required
        }
        _ => return false,
    };

    let clamped = next.min(objective.required).max(objective.progress);
    if clamped == objective.progress {
        return false;
    }
    objective.progress = clamped;
    true
}

/// Close out the completed objective and issue the next one.
/// Returns true when this call switched the story into side ops.
fn advance<R>(state: &mut GameState, catalog: &Catalog, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    let story = &state.story;
    let (arc_label, completed, summary, reward) = if story.is_side_ops {
        let title = story
            .side_op_title
            .clone()
            .unwrap_or_else(|| SIDE_OP_FALLBACK_TITLE.to_string());
        let reward = catalog
            .side_op(&title)
            .map(|op| op.reward.clone())
            .unwrap_or_default();
        let summary = describe_objective(&story.objective, catalog);
        (SIDE_OPS_ARC_LABEL.to_string(), title, summary, reward)
    } else {
        let Some((arc, stage)) = catalog.stage(story.arc_index, story.stage_index) else {
            return false;
        };
        (
            arc.title.clone(),
            stage.title.clone(),
            stage.message.clone(),
            stage.reward.clone(),
        )
    };

    let journal = JournalEntry {
        id: state.allocate_journal_id(),
        time: state.time,
        arc: arc_label,
        stage: completed.clone(),
        summary,
    };
    let mut lines = LogLines::new();
    lines.push((LogKind::System, format!("Objective complete: {completed}.")));
    let reward_text = grant_reward(state, catalog, &reward, rng);
    if !reward_text.is_empty() {
        lines.push((LogKind::Loot, format!("Reward: {reward_text}.")));
    }
    lines.extend(apply_level_ups(&mut state.player).log_lines());
    state.story.journal.insert(0, journal);
    log::debug!("objective complete: {completed}");

    if state.story.is_side_ops {
        let (title, objective) = roll_side_op(catalog, rng);
        lines.push((LogKind::System, format!("{title}.")));
        issue(state, catalog, objective, &mut lines);
        state.story.side_op_title = Some(title);
        state.story.side_ops_count += 1;
        state.extend_log(lines);
        return false;
    }

    let arc_index = state.story.arc_index;
    let next_stage = state.story.stage_index + 1;
    if let Some((_, stage)) = catalog.stage(arc_index, next_stage) {
        state.story.stage_index = next_stage;
        lines.push((LogKind::System, format!("Transmission: {}", stage.message)));
        issue(state, catalog, stage.objective.fresh(), &mut lines);
        state.extend_log(lines);
        return false;
    }

    let arc_title = catalog.arc(arc_index).map_or("Unknown", |arc| arc.title.as_str());
    lines.push((LogKind::System, format!("Arc complete: {arc_title}.")));
    if let Some((next_arc, first)) = catalog.stage(arc_index + 1, 0) {
        state.story.arc_index = arc_index + 1;
        state.story.stage_index = 0;
        lines.push((
            LogKind::System,
            format!("New arc unlocked: {}.", next_arc.title),
        ));
        lines.push((LogKind::System, format!("Transmission: {}", first.message)));
        issue(state, catalog, first.objective.fresh(), &mut lines);
        state.extend_log(lines);
        return false;
    }

    let (title, objective) = roll_side_op(catalog, rng);
    state.story.is_side_ops = true;
    state.story.side_op_title = Some(title);
    lines.push((
        LogKind::System,
        "Main arcs complete. Side ops now active.".to_string(),
    ));
    issue(state, catalog, objective, &mut lines);
    state.extend_log(lines);
    true
}

fn issue(state: &mut GameState, catalog: &Catalog, objective: Objective, lines: &mut LogLines) {
    lines.push((
        LogKind::System,
        format!("Directive: {}", describe_objective(&objective, catalog)),
    ));
    state.story.objective = objective;
}

/// Apply a reward and return its summary text (empty when nothing was granted).
fn grant_reward<R>(state: &mut GameState, catalog: &Catalog, reward: &Reward, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let mut parts: Vec<String> = Vec::new();
    let inventory = &mut state.inventory;
    if reward.xp > 0 {
        state.player.xp = state.player.xp.saturating_add(reward.xp);
        parts.push(format!("+{} XP", reward.xp));
    }
    for (amount, counter, label) in [
        (reward.scrap, &mut inventory.scrap, "scrap"),
        (reward.electronics, &mut inventory.electronics, "electronics"),
        (reward.food, &mut inventory.food, "food"),
        (reward.water, &mut inventory.water, "water"),
    ] {
        if amount > 0 {
            *counter = counter.saturating_add(amount);
            parts.push(format!("+{amount} {label}"));
        }
    }
    if reward.item {
        let item = mint_item(state, catalog, reward.rare_loot_bonus, rng);
        parts.push(describe_item(&item));
    }
    parts.join(", ")
}

fn roll_side_op<R>(catalog: &Catalog, rng: &mut R) -> (String, Objective)
where
    R: Rng + ?Sized,
{
    let zone_id = catalog.zones[rng.gen_range(0..catalog.zones.len())]
        .id
        .clone();
    let template = &catalog.side_ops[rng.gen_range(0..catalog.side_ops.len())];
    let objective = match &template.objective {
        SideOpObjective::ScavengeCount { required } => {
            Objective::new(ObjectiveKind::ScavengeCount, required.roll(rng))
        }
        SideOpObjective::ZoneScavenge { required } => {
            Objective::new(ObjectiveKind::ZoneScavenge { zone_id }, required.roll(rng))
        }
        SideOpObjective::DefeatTier { tier, required } => {
            let tier = u8::try_from(tier.roll(rng)).unwrap_or(u8::MAX);
            Objective::new(ObjectiveKind::DefeatTier { tier }, required.roll(rng))
        }
        SideOpObjective::SalvageCount { required } => {
            Objective::new(ObjectiveKind::SalvageCount, required.roll(rng))
        }
        SideOpObjective::TravelZone { required } => {
            Objective::new(ObjectiveKind::TravelZone { zone_id }, required.roll(rng))
        }
    };
    (template.title.clone(), objective)
}
