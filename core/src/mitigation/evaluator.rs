//! Per-player activation of catalog entries

use bulwark_types::{CombatantInfo, PlayerInfo, SourceState};

use super::computed::{ComputedRegistry, PlayerContext};
use super::source::{CatalogEntry, MitigationSource, SourceCatalog};
use crate::intervals::ActivationLookup;

/// Decides, for one player, which catalog entries contribute and how much.
///
/// Buff and debuff entries answer "did it ever occur in this fight" and are
/// only used for display; the per-tick curve is the sampler's job.
#[derive(Debug, Clone, Copy)]
pub struct SourceActivationEvaluator<'a> {
    catalog: &'a SourceCatalog,
    computed: &'a ComputedRegistry,
    buffs: ActivationLookup<'a>,
    debuffs: ActivationLookup<'a>,
}

impl<'a> SourceActivationEvaluator<'a> {
    pub fn new(
        catalog: &'a SourceCatalog,
        computed: &'a ComputedRegistry,
        buffs: ActivationLookup<'a>,
        debuffs: ActivationLookup<'a>,
    ) -> Self {
        Self {
            catalog,
            computed,
            buffs,
            debuffs,
        }
    }

    /// One state per catalog entry, in catalog order
    pub fn evaluate(&self, player: &PlayerInfo, info: &CombatantInfo) -> Vec<SourceState> {
        let ctx = PlayerContext::new(player, info);
        self.catalog
            .iter()
            .map(|entry| self.evaluate_entry(entry, &ctx))
            .collect()
    }

    pub fn evaluate_entry(&self, entry: &CatalogEntry, ctx: &PlayerContext<'_>) -> SourceState {
        let (is_active, resistance_value) = match &entry.source {
            MitigationSource::Aura {
                ability_id,
                resistance_value,
            } => (ctx.info.has_aura(*ability_id), *resistance_value),
            MitigationSource::Gear {
                set_id,
                number_of_pieces,
                resistance_value,
            } => (
                ctx.info.pieces_of_set(*set_id) >= *number_of_pieces as usize,
                *resistance_value,
            ),
            MitigationSource::Computed { key } => {
                self.computed.evaluate(key, ctx).unwrap_or_else(|| {
                    tracing::debug!(key = %key, source = %entry.name, "No computed rule registered");
                    (false, 0)
                })
            }
            MitigationSource::Buff {
                ability_id,
                resistance_value,
            } => (
                self.buffs
                    .was_ever_active_on(ctx.player.id, *ability_id, None),
                *resistance_value,
            ),
            MitigationSource::Debuff {
                ability_id,
                resistance_value,
            } => (
                self.debuffs
                    .was_ever_active_on(ctx.player.id, *ability_id, None),
                *resistance_value,
            ),
        };

        SourceState {
            name: entry.name.clone(),
            kind: entry.kind(),
            is_active,
            resistance_value,
        }
    }
}
