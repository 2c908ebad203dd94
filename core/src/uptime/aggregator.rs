use bulwark_types::{
    CombatEvent, Fight, SourceUptime, StatusEffectUptime, TargetUptimes, TrackedAbility,
};
use hashbrown::{HashMap, HashSet};

use crate::intervals::{Interval, IntervalKey, IntervalSet, reconstruct_intervals};

/// Display name used when a tracked ability has none
pub fn fallback_ability_name(ability_id: i64) -> String {
    format!("Ability {ability_id}")
}

/// Highest uptime first; equal uptimes keep their current order
pub fn sort_by_uptime(uptimes: &mut [StatusEffectUptime]) {
    uptimes.sort_by(|a, b| b.uptime_percentage.total_cmp(&a.uptime_percentage));
}

fn percent_of(duration_ms: i64, fight_ms: i64) -> f64 {
    if fight_ms > 0 {
        duration_ms as f64 / fight_ms as f64 * 100.0
    } else {
        0.0
    }
}

/// Split clipped windows by the source that opened them.
///
/// Highest uptime first, ties by ascending source id.
fn uptime_by_source(clipped: &[Interval], fight_ms: i64) -> Vec<SourceUptime> {
    let mut totals: HashMap<i64, (i64, u32)> = HashMap::new();
    for interval in clipped.iter().filter(|i| i.duration_ms() > 0) {
        let entry = totals.entry(interval.source_id).or_default();
        entry.0 += interval.duration_ms();
        entry.1 += 1;
    }

    let mut by_source: Vec<SourceUptime> = totals
        .into_iter()
        .map(|(source_id, (total_duration_ms, applications))| SourceUptime {
            source_id,
            total_duration_ms,
            applications,
            uptime_percentage: percent_of(total_duration_ms, fight_ms),
        })
        .collect();
    by_source.sort_by_key(|s| s.source_id);
    by_source.sort_by(|a, b| b.total_duration_ms.cmp(&a.total_duration_ms));
    by_source
}

/// Uptime of a fixed allow-list of status effects.
///
/// Output order for equal uptimes follows the allow-list order.
#[derive(Debug, Clone, Default)]
pub struct UptimeAggregator {
    tracked: Vec<TrackedAbility>,
    tracked_ids: HashSet<i64>,
}

impl UptimeAggregator {
    pub fn new(tracked: Vec<TrackedAbility>) -> Self {
        // First occurrence wins for duplicate ids
        let mut tracked_ids = HashSet::with_capacity(tracked.len());
        let tracked = tracked
            .into_iter()
            .filter(|t| tracked_ids.insert(t.ability_id))
            .collect();
        Self {
            tracked,
            tracked_ids,
        }
    }

    pub fn tracked(&self) -> &[TrackedAbility] {
        &self.tracked
    }

    pub fn is_tracked(&self, ability_id: i64) -> bool {
        self.tracked_ids.contains(&ability_id)
    }

    /// Uptimes of tracked abilities on one target, highest first
    pub fn compute(
        &self,
        events: &[CombatEvent],
        target_id: i64,
        fight: &Fight,
    ) -> Vec<StatusEffectUptime> {
        let relevant: Vec<CombatEvent> = events
            .iter()
            .filter(|e| e.target_id == target_id && self.is_tracked(e.ability_id))
            .copied()
            .collect();
        let set = reconstruct_intervals(&relevant, fight.end_time);
        self.uptimes_for(&set, target_id, fight)
    }

    /// Uptimes for every target seen in the tracked events, ascending target id
    pub fn compute_all_targets(&self, events: &[CombatEvent], fight: &Fight) -> Vec<TargetUptimes> {
        let relevant: Vec<CombatEvent> = events
            .iter()
            .filter(|e| self.is_tracked(e.ability_id))
            .copied()
            .collect();

        let mut targets: Vec<i64> = relevant.iter().map(|e| e.target_id).collect();
        targets.sort_unstable();
        targets.dedup();

        let set = reconstruct_intervals(&relevant, fight.end_time);
        tracing::debug!(
            targets = targets.len(),
            tracked = self.tracked.len(),
            "Computing status effect uptimes"
        );

        targets
            .into_iter()
            .map(|target_id| TargetUptimes {
                target_id,
                uptimes: self.uptimes_for(&set, target_id, fight),
            })
            .collect()
    }

    fn uptimes_for(&self, set: &IntervalSet, target_id: i64, fight: &Fight) -> Vec<StatusEffectUptime> {
        let fight_ms = fight.duration_ms();

        let mut uptimes: Vec<StatusEffectUptime> = self
            .tracked
            .iter()
            .filter_map(|tracked| {
                let group = set.get(&IntervalKey::new(target_id, tracked.ability_id))?;
                let clipped: Vec<Interval> = group
                    .intervals
                    .iter()
                    .filter_map(|i| i.clipped(fight.start_time, fight.end_time))
                    .collect();
                let total_duration_ms: i64 = clipped.iter().map(Interval::duration_ms).sum();
                if total_duration_ms <= 0 {
                    return None;
                }

                let ability_name = if tracked.name.is_empty() {
                    fallback_ability_name(tracked.ability_id)
                } else {
                    tracked.name.clone()
                };

                Some(StatusEffectUptime {
                    ability_id: tracked.ability_id,
                    ability_name,
                    total_duration_ms,
                    applications: group.applications,
                    uptime_percentage: percent_of(total_duration_ms, fight_ms),
                    by_source: uptime_by_source(&clipped, fight_ms),
                })
            })
            .collect();

        sort_by_uptime(&mut uptimes);
        uptimes
    }
}
