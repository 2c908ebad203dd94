//! Interval reconstruction
//!
//! Each (target, ability) pair is scanned in timestamp order with a single
//! "open start" cursor:
//!
//! - `apply` with nothing open opens a window and counts one application
//! - `apply` while a window is open is ignored (no refresh, no restart)
//! - `remove` closes the open window; an orphan `remove` is ignored
//! - a window still open after the scan closes at the fight end
//!
//! Stacks are not modeled: `apply_stack` acts as `apply`, `remove_stack`
//! never closes anything.

use bulwark_types::CombatEvent;
use hashbrown::HashMap;

use super::ActivationLookup;

/// Identifies one reconstructed effect stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalKey {
    pub target_id: i64,
    pub ability_id: i64,
}

impl IntervalKey {
    pub fn new(target_id: i64, ability_id: i64) -> Self {
        Self {
            target_id,
            ability_id,
        }
    }

    fn of(event: &CombatEvent) -> Self {
        Self::new(event.target_id, event.ability_id)
    }
}

/// A closed window `[start, end]` during which an ability was active on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub ability_id: i64,
    pub target_id: i64,
    /// Source of the apply that opened this window
    pub source_id: i64,
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn duration_ms(&self) -> i64 {
        self.end - self.start
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Portion of this interval inside `[start, end]`, if any
    pub fn clipped(&self, start: i64, end: i64) -> Option<Interval> {
        let clipped_start = self.start.max(start);
        let clipped_end = self.end.min(end);
        (clipped_start <= clipped_end).then_some(Interval {
            start: clipped_start,
            end: clipped_end,
            ..*self
        })
    }
}

/// Reconstruction output for one (target, ability) pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalGroup {
    /// Time-ordered, non-overlapping
    pub intervals: Vec<Interval>,
    /// Number of applies that opened a window
    pub applications: u32,
}

impl IntervalGroup {
    pub fn total_duration_ms(&self) -> i64 {
        self.intervals.iter().map(Interval::duration_ms).sum()
    }
}

/// All reconstructed intervals for one event stream.
///
/// Pairs that never produced a window (no events, or only orphan removes)
/// have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    groups: HashMap<IntervalKey, IntervalGroup>,
    fight_end: i64,
}

impl IntervalSet {
    pub fn fight_end(&self) -> i64 {
        self.fight_end
    }

    pub fn get(&self, key: &IntervalKey) -> Option<&IntervalGroup> {
        self.groups.get(key)
    }

    pub fn applications(&self, key: &IntervalKey) -> u32 {
        self.groups.get(key).map(|g| g.applications).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IntervalKey, &IntervalGroup)> {
        self.groups.iter()
    }

    /// Keys in ascending (target, ability) order
    pub fn sorted_keys(&self) -> Vec<IntervalKey> {
        let mut keys: Vec<_> = self.groups.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn interval_count(&self) -> usize {
        self.groups.values().map(|g| g.intervals.len()).sum()
    }

    pub fn lookup(&self) -> ActivationLookup<'_> {
        ActivationLookup::new(self)
    }
}

/// Reconstruct active windows for every (target, ability) pair in `events`.
///
/// Events may arrive in any order. Pure: the same input always yields the
/// same set.
pub fn reconstruct_intervals(events: &[CombatEvent], fight_end: i64) -> IntervalSet {
    let mut streams: HashMap<IntervalKey, Vec<&CombatEvent>> = HashMap::new();
    for event in events {
        streams.entry(IntervalKey::of(event)).or_default().push(event);
    }

    let mut groups = HashMap::with_capacity(streams.len());
    for (key, mut stream) in streams {
        // Stable: equal timestamps keep log order
        stream.sort_by_key(|e| e.timestamp);

        let group = scan_stream(key, &stream, fight_end);
        if !group.intervals.is_empty() {
            groups.insert(key, group);
        }
    }

    let set = IntervalSet { groups, fight_end };
    tracing::debug!(
        events = events.len(),
        groups = set.len(),
        intervals = set.interval_count(),
        "Reconstructed effect intervals"
    );
    set
}

fn scan_stream(key: IntervalKey, stream: &[&CombatEvent], fight_end: i64) -> IntervalGroup {
    let mut group = IntervalGroup::default();
    // (start, source_id) of the currently open window
    let mut open: Option<(i64, i64)> = None;

    for event in stream {
        if event.kind.opens() {
            if open.is_some() {
                tracing::trace!(?key, timestamp = event.timestamp, "Ignoring reapply while active");
                continue;
            }
            if event.timestamp > fight_end {
                tracing::trace!(?key, timestamp = event.timestamp, "Ignoring apply after fight end");
                continue;
            }
            open = Some((event.timestamp, event.source_id));
            group.applications += 1;
        } else if event.kind.closes() {
            match open.take() {
                Some((start, source_id)) => {
                    push_interval(&mut group, key, source_id, start, event.timestamp.min(fight_end));
                }
                None => {
                    tracing::trace!(?key, timestamp = event.timestamp, "Ignoring orphan remove");
                }
            }
        }
    }

    if let Some((start, source_id)) = open {
        push_interval(&mut group, key, source_id, start, fight_end);
    }

    group
}

fn push_interval(group: &mut IntervalGroup, key: IntervalKey, source_id: i64, start: i64, end: i64) {
    group.intervals.push(Interval {
        ability_id: key.ability_id,
        target_id: key.target_id,
        source_id,
        start,
        end,
    });
}
