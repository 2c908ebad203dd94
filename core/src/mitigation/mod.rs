//! Player mitigation over a fight
//!
//! This module provides:
//! - **Catalog**: Named resistance sources, each with one activation kind
//! - **Computed rules**: Injected predicate/formula pairs for `computed` entries
//! - **Evaluation**: Which sources a player has, static resistance total
//! - **Sampling**: 1 Hz dynamic resistance curve and its reductions
//! - **Conversion**: Resistance to damage-reduction percentage
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐   ┌─────────────────────────────────────┐
//! │ SourceCatalog         │   │ CombatantInfo + PlayerInfo          │
//! │ aura│gear│computed│.. │   │ gear, auras, role, class            │
//! └───────────────────────┘   └─────────────────────────────────────┘
//!             │                                │
//!             └──────────────┬─────────────────┘
//!                            ▼
//!              SourceActivationEvaluator ──► StaticResistanceCalculator
//!                            │                          │
//!      buff/debuff IntervalSets                         │
//!                            ▼                          ▼
//!                    MitigationSampler ◄────────────────┘
//!                            │
//!                            ▼
//!                PlayerMitigationSummary (samples, sources, max, avg)
//! ```

mod computed;
mod conversion;
mod error;
mod evaluator;
mod sampler;
mod source;
mod static_resistance;

#[cfg(test)]
mod sampler_tests;

pub use computed::{
    ARMOR_FOCUS, ARMOR_RESISTANCE, ComputedRegistry, HEAVY_ARMOR_CONSTITUTION, PlayerContext,
};
pub use conversion::{
    Conversion, DiminishingConversion, LinearConversion, ResistanceConversion,
};
pub use error::ConversionError;
pub use evaluator::SourceActivationEvaluator;
pub use sampler::{MitigationHeadline, MitigationSampler};
pub use source::{CatalogEntry, MAJOR_RESOLVE, MINOR_RESOLVE, MitigationSource, SourceCatalog};
pub use static_resistance::StaticResistanceCalculator;
