//! XP curve, level-ups and perk point grants.

use serde::{Deserialize, Serialize};

use crate::constants::{
    HEALTH_BASE, HEALTH_PER_LEVEL, LEVEL_CAP, LEVEL_UP_HEAL, PERK_POINT_LEVEL_INTERVAL, XP_BASE,
    XP_PER_LEVEL,
};
use crate::state::{LogKind, Player};

pub(crate) const LEVEL_UP_LINE: &str = "Level up. Attributes increased.";
pub(crate) const PERK_POINT_LINE: &str = "Perk point available. Use perk [id].";

/// XP needed to advance out of `level`.
#[must_use]
pub const fn xp_for_level(level: u32) -> u32 {
    XP_BASE + level.saturating_sub(1) * XP_PER_LEVEL
}

#[must_use]
pub const fn max_health(level: u32) -> u32 {
    HEALTH_BASE + level.saturating_sub(1) * HEALTH_PER_LEVEL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub perk_points_gained: u32,
}

impl LevelUpReport {
    /// Terminal lines announcing the level-up, if any.
    #[must_use]
    pub fn log_lines(&self) -> Vec<(LogKind, String)> {
        let mut lines = Vec::new();
        if self.levels_gained > 0 {
            lines.push((LogKind::System, LEVEL_UP_LINE.to_string()));
            if self.perk_points_gained > 0 {
                lines.push((LogKind::System, PERK_POINT_LINE.to_string()));
            }
        }
        lines
    }
}

/// Consume banked XP into levels until the next threshold is out of reach.
///
/// Each level grants +1 to every base attribute and heals 10 (capped at the
/// new maximum). Every third level grants a perk point. At the level cap the
/// XP pool is clamped just below the cap threshold.
pub fn apply_level_ups(player: &mut Player) -> LevelUpReport {
    let mut report = LevelUpReport::default();

    while player.level < LEVEL_CAP && player.xp >= xp_for_level(player.level) {
        player.xp -= xp_for_level(player.level);
        player.level += 1;
        player.attributes.add_all(1);
        if player.level % PERK_POINT_LEVEL_INTERVAL == 0 {
            player.perk_points += 1;
            report.perk_points_gained += 1;
        }
        let cap = player.max_health();
        player.vitals.health = (player.vitals.health + LEVEL_UP_HEAL).clamp(0.0, cap);
        report.levels_gained += 1;
    }

    if player.level >= LEVEL_CAP {
        player.level = LEVEL_CAP;
        player.xp = player.xp.min(xp_for_level(LEVEL_CAP) - 1);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_matches_thresholds() {
        assert_eq!(xp_for_level(1), 100);
        assert_eq!(xp_for_level(2), 150);
        assert_eq!(xp_for_level(50), 2550);
        assert_eq!(max_health(1), 120);
        assert_eq!(max_health(10), 174);
    }

    #[test]
    fn multi_level_gain_walks_each_threshold() {
        let mut player = Player {
            level: 2,
            xp: 500,
            ..Player::default()
        };
        let report = apply_level_ups(&mut player);
        // 500 - 150 - 200 = 150, short of the 250 needed at level 4.
        assert_eq!(player.level, 4);
        assert_eq!(player.xp, 150);
        assert_eq!(report.levels_gained, 2);
        assert_eq!(report.perk_points_gained, 1);
        assert_eq!(player.perk_points, 1);
        assert_eq!(player.attributes.strength, 7);
        assert_eq!(player.attributes.luck, 6);
        assert_eq!(report.log_lines().len(), 2);
    }

    #[test]
    fn heal_is_capped_by_new_maximum() {
        let mut player = Player {
            xp: 100,
            ..Player::default()
        };
        player.vitals.health = 119.0;
        apply_level_ups(&mut player);
        assert_eq!(player.level, 2);
        assert!((player.vitals.health - 126.0).abs() < f32::EPSILON);
    }

    #[test]
    fn cap_clamps_surplus_xp() {
        let mut player = Player {
            level: 49,
            xp: 100_000,
            ..Player::default()
        };
        let report = apply_level_ups(&mut player);
        assert_eq!(player.level, LEVEL_CAP);
        assert_eq!(player.xp, xp_for_level(LEVEL_CAP) - 1);
        assert_eq!(report.levels_gained, 1);
    }

    #[test]
    fn no_level_means_no_lines() {
        let mut player = Player {
            xp: 99,
            ..Player::default()
        };
        let report = apply_level_ups(&mut player);
        assert_eq!(report, LevelUpReport::default());
        assert!(report.log_lines().is_empty());
    }
}
