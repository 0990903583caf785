use std::io::Write;

use anyhow::Result;
use colored::{ColoredString, Colorize};
use deadsignal_game::{LogEntry, LogKind, StreamDraws, TerminalSession, total_attributes};
use serde::Serialize;

/// Style a history line by kind.
pub fn styled(entry: &LogEntry) -> ColoredString {
    let text = entry.text.as_str();
    match entry.kind {
        LogKind::Input => text.bright_white().bold(),
        LogKind::System => text.cyan(),
        LogKind::Loot => text.green(),
        LogKind::Combat => text.yellow(),
        LogKind::Error => text.red(),
    }
}

pub fn write_entries(out: &mut dyn Write, entries: &[LogEntry]) -> Result<()> {
    for entry in entries {
        writeln!(out, "{}", styled(entry))?;
    }
    Ok(())
}

/// End-of-run summary written by `--report json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub commands: usize,
    pub time: u64,
    pub level: u32,
    pub xp: u32,
    pub health: f32,
    pub scrap: u32,
    pub electronics: u32,
    pub arc_index: usize,
    pub stage_index: usize,
    pub side_ops: bool,
    pub side_ops_completed: u32,
    pub strength: u32,
    pub agility: u32,
    pub luck: u32,
    pub draws: StreamDraws,
    pub fingerprint: String,
}

impl RunReport {
    pub fn from_session(session: &TerminalSession<'_>, commands: usize) -> Self {
        let state = session.state();
        let attrs = total_attributes(state);
        Self {
            seed: session.seed(),
            commands,
            time: state.time,
            level: state.player.level,
            xp: state.player.xp,
            health: state.player.vitals.health,
            scrap: state.inventory.scrap,
            electronics: state.inventory.electronics,
            arc_index: state.story.arc_index,
            stage_index: state.story.stage_index,
            side_ops: state.story.is_side_ops,
            side_ops_completed: state.story.side_ops_count,
            strength: attrs.strength,
            agility: attrs.agility,
            luck: attrs.luck,
            draws: session.draws(),
            fingerprint: format!("{:016x}", session.fingerprint()),
        }
    }

    pub fn write_json(&self, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write_console(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", "-".repeat(30).bright_black())?;
        writeln!(
            out,
            "{} seed {} after {} commands, {} ticks",
            "Run summary:".bright_cyan().bold(),
            self.seed,
            self.commands,
            self.time
        )?;
        writeln!(
            out,
            "Level {} ({} XP), HP {:.0}, scrap {}, electronics {}",
            self.level, self.xp, self.health, self.scrap, self.electronics
        )?;
        let story = if self.side_ops {
            format!("side ops ({} completed)", self.side_ops_completed)
        } else {
            format!("arc {} stage {}", self.arc_index + 1, self.stage_index + 1)
        };
        writeln!(out, "Story: {story}")?;
        writeln!(
            out,
            "Draws: command {}, tick {}",
            self.draws.command, self.draws.tick
        )?;
        writeln!(out, "Fingerprint: {}", self.fingerprint)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_carries_fingerprint() {
        let mut session = TerminalSession::new(5);
        session.submit("status");
        let report = RunReport::from_session(&session, 1);
        let mut buf = Vec::new();
        report.write_json(&mut buf).expect("json");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("parse");
        assert_eq!(value["seed"], 5);
        assert_eq!(value["commands"], 1);
        assert_eq!(
            value["fingerprint"],
            format!("{:016x}", session.fingerprint())
        );
    }

    #[test]
    fn console_report_names_story_position() {
        let session = TerminalSession::new(1);
        let report = RunReport::from_session(&session, 0);
        let mut buf = Vec::new();
        report.write_console(&mut buf).expect("console");
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("Story: arc 1 stage 1"));
        assert!(text.contains("Draws: command 0, tick 0"));
    }
}
