use thiserror::Error;

use super::{Catalog, RollRange};
use crate::constants::{ENEMY_TIER_MAX, ENEMY_TIER_MIN, MODIFIER_CAP};
use crate::state::{ObjectiveKind, RarityId};

/// Errors raised when a content catalog fails to load or violates a table invariant.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog table `{table}` is empty")]
    EmptyTable { table: &'static str },
    #[error("rarity table must list common through legendary in order (mismatch at index {index})")]
    RarityOrder { index: usize },
    #[error("{context} range is inverted (min {min} > max {max})")]
    InvertedRange {
        context: String,
        min: u32,
        max: u32,
    },
    #[error("{context} range exceeds the modifier cap of {cap} (got {max})")]
    RangeAboveCap { context: String, cap: u8, max: u32 },
    #[error("`{entry}` in `{table}` has zero weight")]
    ZeroWeight { table: &'static str, entry: String },
    #[error("{context} references unknown {kind} `{reference}`")]
    UnknownReference {
        context: String,
        kind: &'static str,
        reference: String,
    },
    #[error("base item `{item}` lists no candidate modifiers")]
    NoModifiers { item: String },
    #[error("enemy `{enemy}` tier {tier} is outside {min}..={max}")]
    TierOutOfRange {
        enemy: String,
        tier: u8,
        min: u8,
        max: u8,
    },
    #[error("{context} must require at least one step")]
    ZeroRequired { context: String },
}

impl Catalog {
    /// Check table invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.validate_tables_present()?;
        self.validate_rarities()?;
        self.validate_items()?;
        self.validate_world()?;
        self.validate_enemies()?;
        self.validate_story()?;
        Ok(())
    }

    fn validate_tables_present(&self) -> Result<(), CatalogError> {
        let tables: [(&'static str, bool); 9] = [
            ("rarities", self.rarities.is_empty()),
            ("base_items", self.base_items.is_empty()),
            ("prefixes", self.prefixes.is_empty()),
            ("suffixes", self.suffixes.is_empty()),
            ("zones", self.zones.is_empty()),
            ("enemies", self.enemies.is_empty()),
            ("barks", self.barks.is_empty()),
            ("arcs", self.arcs.is_empty()),
            ("side_ops", self.side_ops.is_empty()),
        ];
        match tables.into_iter().find(|(_, empty)| *empty) {
            Some((table, _)) => Err(CatalogError::EmptyTable { table }),
            None => Ok(()),
        }
    }

    fn validate_rarities(&self) -> Result<(), CatalogError> {
        if self.rarities.len() != RarityId::ALL.len() {
            return Err(CatalogError::RarityOrder {
                index: self.rarities.len().min(RarityId::ALL.len()),
            });
        }
        for (index, (rarity, expected)) in self.rarities.iter().zip(RarityId::ALL).enumerate() {
            if rarity.id != expected {
                return Err(CatalogError::RarityOrder { index });
            }
            if rarity.weight == 0 {
                return Err(CatalogError::ZeroWeight {
                    table: "rarities",
                    entry: expected.label().to_string(),
                });
            }
            let context = format!("rarity `{}` stat", expected.label());
            check_range(&context, rarity.stat_range)?;
            if rarity.stat_range.max > u32::from(MODIFIER_CAP) {
                return Err(CatalogError::RangeAboveCap {
                    context,
                    cap: MODIFIER_CAP,
                    max: rarity.stat_range.max,
                });
            }
        }
        Ok(())
    }

    fn validate_items(&self) -> Result<(), CatalogError> {
        if let Some(item) = self.base_items.iter().find(|item| item.stats.is_empty()) {
            return Err(CatalogError::NoModifiers {
                item: item.name.clone(),
            });
        }
        for (table, affixes) in [("prefixes", &self.prefixes), ("suffixes", &self.suffixes)] {
            if let Some(affix) = affixes.iter().find(|affix| affix.weight == 0) {
                return Err(CatalogError::ZeroWeight {
                    table,
                    entry: affix.id.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_world(&self) -> Result<(), CatalogError> {
        if self.zone(&self.start_zone).is_none() {
            return Err(CatalogError::UnknownReference {
                context: "start_zone".to_string(),
                kind: "zone",
                reference: self.start_zone.clone(),
            });
        }
        for range in self.scavenge_default.ranges() {
            check_range("scavenge_default", range)?;
        }
        for zone in &self.zones {
            if let Some(profile) = &zone.resources {
                for range in profile.ranges() {
                    check_range(&format!("zone `{}` resource", zone.id), range)?;
                }
            }
        }
        Ok(())
    }

    fn validate_enemies(&self) -> Result<(), CatalogError> {
        for enemy in &self.enemies {
            if !(ENEMY_TIER_MIN..=ENEMY_TIER_MAX).contains(&enemy.tier) {
                return Err(CatalogError::TierOutOfRange {
                    enemy: enemy.name.clone(),
                    tier: enemy.tier,
                    min: ENEMY_TIER_MIN,
                    max: ENEMY_TIER_MAX,
                });
            }
            check_range(&format!("enemy `{}` hp", enemy.name), enemy.hp)?;
            check_range(&format!("enemy `{}` damage", enemy.name), enemy.damage)?;
        }
        // The lowest possible tier cap is 1, which admits tiers up to 2.
        if !self
            .enemies
            .iter()
            .any(|enemy| enemy.tier <= ENEMY_TIER_MIN + 1)
        {
            return Err(CatalogError::EmptyTable {
                table: "enemies (tier 1-2)",
            });
        }
        Ok(())
    }

    fn validate_story(&self) -> Result<(), CatalogError> {
        for arc in &self.arcs {
            if arc.stages.is_empty() {
                return Err(CatalogError::EmptyTable {
                    table: "arc stages",
                });
            }
            for stage in &arc.stages {
                let context = format!("stage `{}`", stage.title);
                if stage.objective.required == 0 {
                    return Err(CatalogError::ZeroRequired { context });
                }
                self.check_objective_refs(&context, &stage.objective.kind)?;
            }
        }
        for op in &self.side_ops {
            let context = format!("side op `{}`", op.title);
            let required = op.objective.required();
            check_range(&context, required)?;
            if required.min == 0 {
                return Err(CatalogError::ZeroRequired { context });
            }
            if let super::SideOpObjective::DefeatTier { tier, .. } = op.objective {
                check_range(&format!("{context} tier"), tier)?;
            }
        }
        Ok(())
    }

    fn check_objective_refs(&self, context: &str, kind: &ObjectiveKind) -> Result<(), CatalogError> {
        match kind {
            ObjectiveKind::ZoneScavenge { zone_id } | ObjectiveKind::TravelZone { zone_id } => {
                if self.zone(zone_id).is_none() {
                    return Err(CatalogError::UnknownReference {
                        context: context.to_string(),
                        kind: "zone",
                        reference: zone_id.clone(),
                    });
                }
            }
            ObjectiveKind::BuildStructure { building_id } => {
                if self.building(building_id).is_none() {
                    return Err(CatalogError::UnknownReference {
                        context: context.to_string(),
                        kind: "building",
                        reference: building_id.clone(),
                    });
                }
            }
            ObjectiveKind::ScavengeCount
            | ObjectiveKind::DefeatTier { .. }
            | ObjectiveKind::SalvageCount
            | ObjectiveKind::EquipSlot { .. } => {}
        }
        Ok(())
    }
}

fn check_range(context: &str, range: RollRange) -> Result<(), CatalogError> {
    if range.is_ordered() {
        Ok(())
    } else {
        Err(CatalogError::InvertedRange {
            context: context.to_string(),
            min: range.min,
            max: range.max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_json() -> serde_json::Value {
        serde_json::from_str(include_str!("../../assets/data/catalog.json")).expect("asset parses")
    }

    fn load(value: &serde_json::Value) -> Result<Catalog, CatalogError> {
        Catalog::from_json(&value.to_string())
    }

    #[test]
    fn builtin_asset_validates() {
        assert!(load(&builtin_json()).is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn rejects_unknown_story_zone() {
        let mut json = builtin_json();
        json["arcs"][0]["stages"][1]["objective"]["zone_id"] = "atlantis".into();
        let err = load(&json).expect_err("unknown zone");
        assert!(matches!(
            err,
            CatalogError::UnknownReference { kind: "zone", ref reference, .. } if reference == "atlantis"
        ));
    }

    #[test]
    fn rejects_inverted_enemy_range() {
        let mut json = builtin_json();
        json["enemies"][0]["hp"] = serde_json::json!([30, 10]);
        assert!(matches!(
            load(&json),
            Err(CatalogError::InvertedRange { min: 30, max: 10, .. })
        ));
    }

    #[test]
    fn rejects_out_of_order_rarities() {
        let mut json = builtin_json();
        json["rarities"][1]["id"] = "epic".into();
        assert!(matches!(
            load(&json),
            Err(CatalogError::RarityOrder { index: 1 })
        ));
    }

    #[test]
    fn rejects_zero_weight_affix_and_empty_barks() {
        let mut json = builtin_json();
        json["suffixes"][2]["weight"] = 0.into();
        assert!(matches!(
            load(&json),
            Err(CatalogError::ZeroWeight { table: "suffixes", .. })
        ));

        let mut json = builtin_json();
        json["barks"] = serde_json::json!([]);
        assert!(matches!(
            load(&json),
            Err(CatalogError::EmptyTable { table: "barks" })
        ));
    }

    #[test]
    fn rejects_tier_outside_bounds() {
        let mut json = builtin_json();
        json["enemies"][3]["tier"] = 9.into();
        let err = load(&json).expect_err("tier 9");
        assert!(err.to_string().contains("tier 9"));
    }
}
