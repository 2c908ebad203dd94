//! One-call fight analysis
//!
//! Ties the engine together for a decoded [`FightInput`]:
//!
//! - friendly buffs + debuffs on players  → mitigation summaries (roster order)
//! - debuffs on enemies                    → status-effect uptimes (by enemy)
//! - hostile buffs on roster players       → status-effect uptimes (by player)
//!
//! Hostile-buff events name the affected player in `sourceID` and the enemy
//! in `targetID`. They are flipped before reconstruction so every
//! `TargetUptimes` is keyed by whoever carries the effect.

use bulwark_types::{
    AppConfig, CombatEvent, FightInput, FightReport, MitigationSettings, PlayerInfo,
    TargetUptimes, TrackedAbility, default_tracked_status_effects,
};
use hashbrown::HashSet;

use crate::intervals::reconstruct_intervals;
use crate::mitigation::{
    ComputedRegistry, Conversion, ConversionError, MitigationSampler, SourceCatalog,
};
use crate::uptime::{UptimeAggregator, sort_by_uptime};

/// Configured engine: catalog, computed rules, conversion, tracked effects
#[derive(Debug, Clone)]
pub struct FightAnalyzer {
    sampler: MitigationSampler,
    uptime: UptimeAggregator,
}

impl Default for FightAnalyzer {
    fn default() -> Self {
        Self::new(
            MitigationSampler::default(),
            UptimeAggregator::new(default_tracked_status_effects()),
        )
    }
}

impl FightAnalyzer {
    pub fn new(sampler: MitigationSampler, uptime: UptimeAggregator) -> Self {
        Self { sampler, uptime }
    }

    /// Analyzer with the given catalog and settings, built-in computed rules
    pub fn from_settings(
        catalog: SourceCatalog,
        settings: &MitigationSettings,
        tracked: Vec<TrackedAbility>,
    ) -> Result<Self, ConversionError> {
        let sampler = MitigationSampler::from_settings(catalog, ComputedRegistry::builtin(), settings)?;
        Ok(Self::new(sampler, UptimeAggregator::new(tracked)))
    }

    /// Analyzer from persisted settings and an already-resolved catalog
    pub fn from_config(config: &AppConfig, catalog: SourceCatalog) -> Result<Self, ConversionError> {
        Self::from_settings(
            catalog,
            &config.mitigation,
            config.tracked_status_effects.clone(),
        )
    }

    pub fn sampler(&self) -> &MitigationSampler {
        &self.sampler
    }

    pub fn uptime(&self) -> &UptimeAggregator {
        &self.uptime
    }

    pub fn conversion(&self) -> &Conversion {
        self.sampler.conversion()
    }

    pub fn analyze(&self, input: &FightInput) -> FightReport {
        let fight = input.fight;
        let buffs = reconstruct_intervals(&input.buff_events, fight.end_time);
        let debuffs = reconstruct_intervals(&input.debuff_events, fight.end_time);

        let mitigation = self.sampler.summarize_roster(
            &fight,
            &input.players,
            &input.combatant_info,
            &buffs,
            &debuffs,
        );
        let status_effects = self.status_effects(input);

        tracing::debug!(
            players = mitigation.len(),
            targets = status_effects.len(),
            duration_ms = fight.duration_ms(),
            "Fight analyzed"
        );

        FightReport {
            fight,
            mitigation,
            status_effects,
        }
    }

    /// Tracked debuffs and hostile buffs per target, ascending target id.
    ///
    /// The two streams are reconstructed separately so an id appearing in
    /// both never merges windows across streams. Hostile buffs land on the
    /// affected player.
    pub fn status_effects(&self, input: &FightInput) -> Vec<TargetUptimes> {
        let debuffs = self
            .uptime
            .compute_all_targets(&input.debuff_events, &input.fight);
        let hostile_events = hostile_buffs_by_player(&input.hostile_buff_events, &input.players);
        let hostile = self
            .uptime
            .compute_all_targets(&hostile_events, &input.fight);
        merge_targets(debuffs, hostile)
    }
}

/// Hostile buffs keyed by the roster player carrying them, enemy as source.
///
/// An empty roster keeps every event.
fn hostile_buffs_by_player(events: &[CombatEvent], players: &[PlayerInfo]) -> Vec<CombatEvent> {
    let roster: HashSet<i64> = players.iter().map(|p| p.id).collect();
    let flipped: Vec<CombatEvent> = events
        .iter()
        .filter(|e| roster.is_empty() || roster.contains(&e.source_id))
        .map(|e| CombatEvent {
            target_id: e.source_id,
            source_id: e.target_id,
            ..*e
        })
        .collect();

    let dropped = events.len() - flipped.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Ignored hostile buffs on actors outside the roster");
    }
    flipped
}

fn merge_targets(left: Vec<TargetUptimes>, right: Vec<TargetUptimes>) -> Vec<TargetUptimes> {
    let mut merged = left;
    for entry in right {
        match merged.binary_search_by_key(&entry.target_id, |t| t.target_id) {
            Ok(i) => {
                merged[i].uptimes.extend(entry.uptimes);
                sort_by_uptime(&mut merged[i].uptimes);
            }
            Err(i) => merged.insert(i, entry),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bulwark_types::{CombatantInfo, Fight, Role, StatusEffectUptime};

    use super::*;
    use crate::mitigation::MAJOR_RESOLVE;

    const BURNING: i64 = 18_084;
    const OVERCHARGED: i64 = 178_118;

    fn uptime(ability_id: i64, pct: f64) -> StatusEffectUptime {
        StatusEffectUptime {
            ability_id,
            ability_name: String::new(),
            total_duration_ms: 0,
            applications: 1,
            uptime_percentage: pct,
            by_source: Vec::new(),
        }
    }

    fn target(target_id: i64, uptimes: Vec<StatusEffectUptime>) -> TargetUptimes {
        TargetUptimes { target_id, uptimes }
    }

    #[test]
    fn merge_interleaves_targets_and_resorts() {
        let merged = merge_targets(
            vec![target(1, vec![uptime(10, 20.0)]), target(4, vec![uptime(11, 5.0)])],
            vec![target(2, vec![uptime(12, 1.0)]), target(4, vec![uptime(13, 50.0)])],
        );
        let ids: Vec<i64> = merged.iter().map(|t| t.target_id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        let last: Vec<i64> = merged[2].uptimes.iter().map(|u| u.ability_id).collect();
        assert_eq!(last, vec![13, 11]);
    }

    fn roster() -> Vec<PlayerInfo> {
        vec![
            PlayerInfo {
                id: 1,
                name: "Tank".to_string(),
                role: Role::Tank,
                class_name: "Dragonknight".to_string(),
            },
            PlayerInfo {
                id: 2,
                name: "Ghost".to_string(),
                role: Role::Dps,
                class_name: "Sorcerer".to_string(),
            },
        ]
    }

    #[test]
    fn hostile_buffs_flip_to_receiving_player() {
        let events = [
            CombatEvent::apply(0, 100, OVERCHARGED).with_source(2),
            CombatEvent::apply(0, 100, OVERCHARGED).with_source(77),
        ];
        let flipped = hostile_buffs_by_player(&events, &roster());

        assert_eq!(flipped.len(), 1);
        assert_eq!(flipped[0].target_id, 2);
        assert_eq!(flipped[0].source_id, 100);
    }

    #[test]
    fn hostile_buffs_unfiltered_without_roster() {
        let events = [CombatEvent::apply(0, 100, OVERCHARGED).with_source(77)];
        let flipped = hostile_buffs_by_player(&events, &[]);
        assert_eq!(flipped.len(), 1);
        assert_eq!(flipped[0].target_id, 77);
    }

    #[test]
    fn analyze_covers_mitigation_and_status_effects() {
        let input = FightInput {
            fight: Fight::new(0, 10_000),
            players: roster(),
            combatant_info: HashMap::from([(1, CombatantInfo::default())]),
            buff_events: vec![CombatEvent::apply(0, 1, MAJOR_RESOLVE)],
            debuff_events: vec![
                CombatEvent::apply(0, 100, BURNING).with_source(2),
                CombatEvent::remove(4_000, 100, BURNING).with_source(2),
            ],
            hostile_buff_events: vec![CombatEvent::apply(5_000, 100, OVERCHARGED).with_source(1)],
        };

        let report = FightAnalyzer::default().analyze(&input);

        assert_eq!(report.mitigation.len(), 1);
        assert_eq!(report.mitigation[0].player_id, 1);
        assert_eq!(report.mitigation[0].max_dynamic_resistance, 5_948);

        let targets: Vec<i64> = report.status_effects.iter().map(|t| t.target_id).collect();
        assert_eq!(targets, vec![1, 100]);

        let player = &report.status_effects[0].uptimes;
        assert_eq!(player[0].ability_id, OVERCHARGED);
        assert_eq!(player[0].by_source[0].source_id, 100);

        let enemy = &report.status_effects[1].uptimes;
        assert_eq!(enemy[0].ability_id, BURNING);
        assert_eq!(enemy[0].by_source[0].source_id, 2);
    }
}
