//! Activation queries over a reconstructed interval set

use super::{Interval, IntervalKey, IntervalSet};

/// Inclusive time window in log milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

/// Read-only "was this active" view over an [`IntervalSet`].
///
/// Intervals per pair are sorted and non-overlapping, so both their starts
/// and their ends are ascending and every query is a binary search.
#[derive(Debug, Clone, Copy)]
pub struct ActivationLookup<'a> {
    set: &'a IntervalSet,
}

impl<'a> ActivationLookup<'a> {
    pub fn new(set: &'a IntervalSet) -> Self {
        Self { set }
    }

    /// Sorted intervals for a pair (empty if it was never active)
    pub fn intervals_for(&self, target_id: i64, ability_id: i64) -> &'a [Interval] {
        self.set
            .get(&IntervalKey::new(target_id, ability_id))
            .map(|g| g.intervals.as_slice())
            .unwrap_or(&[])
    }

    /// True iff some interval for the pair contains `timestamp` (bounds inclusive)
    pub fn is_active_at(&self, target_id: i64, ability_id: i64, timestamp: i64) -> bool {
        let intervals = self.intervals_for(target_id, ability_id);
        let after = intervals.partition_point(|i| i.start <= timestamp);
        after > 0 && intervals[after - 1].end >= timestamp
    }

    /// True iff any interval for the pair intersects `window`.
    /// `None` means the whole fight.
    pub fn was_ever_active_on(
        &self,
        target_id: i64,
        ability_id: i64,
        window: Option<TimeWindow>,
    ) -> bool {
        let intervals = self.intervals_for(target_id, ability_id);
        match window {
            None => !intervals.is_empty(),
            Some(w) => {
                let first = intervals.partition_point(|i| i.end < w.start);
                intervals.get(first).is_some_and(|i| i.start <= w.end)
            }
        }
    }

    /// Targets with at least one interval for `ability_id`, ascending
    pub fn targets_with(&self, ability_id: i64) -> Vec<i64> {
        let mut targets: Vec<i64> = self
            .set
            .iter()
            .filter(|(key, _)| key.ability_id == ability_id)
            .map(|(key, _)| key.target_id)
            .collect();
        targets.sort_unstable();
        targets
    }
}
