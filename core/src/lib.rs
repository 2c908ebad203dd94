pub mod analysis;
pub mod catalog;
pub mod intervals;
pub mod mitigation;
pub mod uptime;

// Re-exports for convenience
pub use analysis::FightAnalyzer;
pub use catalog::{CatalogError, load_catalog_file, load_catalog_str};
pub use intervals::{
    ActivationLookup, Interval, IntervalGroup, IntervalKey, IntervalSet, TimeWindow,
    reconstruct_intervals,
};
pub use mitigation::{
    CatalogEntry, ComputedRegistry, Conversion, ConversionError, DiminishingConversion,
    LinearConversion, MitigationHeadline, MitigationSampler, MitigationSource, PlayerContext,
    ResistanceConversion, SourceActivationEvaluator, SourceCatalog, StaticResistanceCalculator,
};
pub use uptime::UptimeAggregator;

pub use bulwark_types as types;
