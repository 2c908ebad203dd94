//! Time-sampled mitigation
//!
//! ```text
//!   fight.start                                       fight.end
//!       │ tick 0   tick 1   tick 2          tick n      │
//!       ▼    │        │        │      ...      │        ▼
//!       ├────┼────────┼────────┼───────────────┼────────┤
//!
//!   static  = Σ active aura/gear               (constant per player)
//!   dynamic = Σ buff/debuff active at tick t   (per tick)
//!   percent = convert(static + dynamic)
//! ```
//!
//! Ticks are 1 s apart and include both endpoints, so a fight of `d` seconds
//! (rounded up) yields `d + 1` samples. Max and average are reduced over the
//! raw dynamic series; the headline percentages convert *after* reducing.

use std::collections::HashMap;

use bulwark_types::{
    CombatantInfo, Fight, MitigationSettings, PlayerInfo, PlayerMitigationSummary, PlayerSample,
    SourceKind,
};

use super::computed::ComputedRegistry;
use super::conversion::Conversion;
use super::error::ConversionError;
use super::evaluator::SourceActivationEvaluator;
use super::source::SourceCatalog;
use super::static_resistance::StaticResistanceCalculator;
use crate::intervals::{ActivationLookup, IntervalSet};

const TICK_MS: i64 = 1000;

/// Produces per-player mitigation summaries for a fight.
#[derive(Debug, Clone)]
pub struct MitigationSampler {
    catalog: SourceCatalog,
    computed: ComputedRegistry,
    conversion: Conversion,
    static_calculator: StaticResistanceCalculator,
}

impl Default for MitigationSampler {
    fn default() -> Self {
        Self::new(
            SourceCatalog::builtin(),
            ComputedRegistry::builtin(),
            Conversion::default(),
        )
    }
}

impl MitigationSampler {
    pub fn new(catalog: SourceCatalog, computed: ComputedRegistry, conversion: Conversion) -> Self {
        Self {
            catalog,
            computed,
            conversion,
            static_calculator: StaticResistanceCalculator::default(),
        }
    }

    /// Build from persisted settings, validating the conversion model
    pub fn from_settings(
        catalog: SourceCatalog,
        computed: ComputedRegistry,
        settings: &MitigationSettings,
    ) -> Result<Self, ConversionError> {
        let conversion = Conversion::from_config(&settings.conversion)?;
        Ok(Self::new(catalog, computed, conversion)
            .include_computed_in_static(settings.include_computed_in_static))
    }

    pub fn include_computed_in_static(mut self, include: bool) -> Self {
        self.static_calculator = StaticResistanceCalculator::new(include);
        self
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    /// Summaries for every roster player with character data, roster order.
    /// Players without `CombatantInfo` are skipped.
    pub fn summarize_roster(
        &self,
        fight: &Fight,
        players: &[PlayerInfo],
        combatant_info: &HashMap<i64, CombatantInfo>,
        buffs: &IntervalSet,
        debuffs: &IntervalSet,
    ) -> Vec<PlayerMitigationSummary> {
        players
            .iter()
            .filter_map(|player| {
                let Some(info) = combatant_info.get(&player.id) else {
                    tracing::debug!(
                        player_id = player.id,
                        player = %player.name,
                        "No combatant info, skipping mitigation"
                    );
                    return None;
                };
                Some(self.summarize(fight, player, info, buffs, debuffs))
            })
            .collect()
    }

    pub fn summarize(
        &self,
        fight: &Fight,
        player: &PlayerInfo,
        info: &CombatantInfo,
        buffs: &IntervalSet,
        debuffs: &IntervalSet,
    ) -> PlayerMitigationSummary {
        let buff_lookup = buffs.lookup();
        let debuff_lookup = debuffs.lookup();

        let sources =
            SourceActivationEvaluator::new(&self.catalog, &self.computed, buff_lookup, debuff_lookup)
                .evaluate(player, info);
        let static_resistance = self.static_calculator.total(&sources);

        let samples =
            self.sample(fight, player.id, static_resistance, buff_lookup, debuff_lookup);
        let (max_dynamic_resistance, average_dynamic_resistance) = reduce_dynamic(&samples);

        PlayerMitigationSummary {
            player_id: player.id,
            player_name: player.name.clone(),
            samples,
            sources,
            static_resistance,
            max_dynamic_resistance,
            average_dynamic_resistance,
        }
    }

    fn sample(
        &self,
        fight: &Fight,
        player_id: i64,
        static_resistance: u32,
        buffs: ActivationLookup<'_>,
        debuffs: ActivationLookup<'_>,
    ) -> Vec<PlayerSample> {
        let dynamic_sources = self.catalog.dynamic_sources();
        let ticks = fight.duration_secs_ceil();

        (0..=ticks)
            .map(|i| {
                let timestamp = fight.start_time + i * TICK_MS;
                let dynamic_resistance = dynamic_sources
                    .iter()
                    .filter(|(kind, ability_id, _)| {
                        let lookup = match kind {
                            SourceKind::Debuff => debuffs,
                            _ => buffs,
                        };
                        lookup.is_active_at(player_id, *ability_id, timestamp)
                    })
                    .fold(0u32, |acc, (_, _, value)| acc.saturating_add(*value));

                let mut sample = PlayerSample {
                    timestamp,
                    relative_time_seconds: i,
                    static_resistance,
                    dynamic_resistance,
                    damage_reduction_percent: 0.0,
                };
                sample.damage_reduction_percent =
                    self.conversion.convert(sample.total_resistance() as f64);
                sample
            })
            .collect()
    }
}

/// `(max, average)` of the raw dynamic series; `(0, 0.0)` when empty
fn reduce_dynamic(samples: &[PlayerSample]) -> (u32, f64) {
    if samples.is_empty() {
        return (0, 0.0);
    }
    let max = samples
        .iter()
        .map(|s| s.dynamic_resistance)
        .max()
        .unwrap_or(0);
    let sum: f64 = samples.iter().map(|s| s.dynamic_resistance as f64).sum();
    (max, sum / samples.len() as f64)
}

/// Headline percentages of a summary, converted after reduction
pub trait MitigationHeadline {
    fn static_percent(&self, conversion: &Conversion) -> f64;
    fn max_percent(&self, conversion: &Conversion) -> f64;
    fn average_percent(&self, conversion: &Conversion) -> f64;
}

impl MitigationHeadline for PlayerMitigationSummary {
    fn static_percent(&self, conversion: &Conversion) -> f64 {
        conversion.convert(self.static_resistance as f64)
    }

    fn max_percent(&self, conversion: &Conversion) -> f64 {
        conversion.convert(self.static_resistance as f64 + self.max_dynamic_resistance as f64)
    }

    fn average_percent(&self, conversion: &Conversion) -> f64 {
        conversion.convert(self.static_resistance as f64 + self.average_dynamic_resistance)
    }
}
