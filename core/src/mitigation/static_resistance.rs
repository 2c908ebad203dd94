//! Fight-invariant resistance

use bulwark_types::{SourceKind, SourceState};

/// Sums the static part of a player's evaluated sources.
///
/// Aura and gear entries always count when active. Computed entries count
/// only when `include_computed` is set. Buffs and debuffs never count here.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticResistanceCalculator {
    include_computed: bool,
}

impl StaticResistanceCalculator {
    pub fn new(include_computed: bool) -> Self {
        Self { include_computed }
    }

    pub fn counts(&self, kind: SourceKind) -> bool {
        kind.is_static() || (self.include_computed && kind == SourceKind::Computed)
    }

    pub fn total(&self, states: &[SourceState]) -> u32 {
        states
            .iter()
            .filter(|s| s.is_active && self.counts(s.kind))
            .fold(0u32, |acc, s| acc.saturating_add(s.resistance_value))
    }
}
