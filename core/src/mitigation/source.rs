//! Mitigation source catalog
//!
//! A catalog is a fixed, ordered list of named contributors to a player's
//! resistance. Each entry declares exactly one activation kind; the kind's
//! fields say what to look for (an aura, a set bonus, a named rule, a buff or
//! a debuff) and how much resistance it grants.
//!
//! Catalogs are plain values: build one in code, start from
//! [`SourceCatalog::builtin`], or load one from TOML (see `crate::catalog`).

use bulwark_types::SourceKind;
use serde::{Deserialize, Serialize};

use super::computed::{ARMOR_FOCUS, ARMOR_RESISTANCE, HEAVY_ARMOR_CONSTITUTION};

/// Major Resolve buff ability id
pub const MAJOR_RESOLVE: i64 = 61694;
/// Minor Resolve buff ability id
pub const MINOR_RESOLVE: i64 = 61693;

/// Activation condition and resistance of one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum MitigationSource {
    /// Active iff the player carries the aura
    Aura {
        ability_id: i64,
        resistance_value: u32,
    },
    /// Active iff at least `number_of_pieces` items of the set are equipped
    Gear {
        set_id: i64,
        number_of_pieces: u32,
        resistance_value: u32,
    },
    /// Active and valued by a named rule from the computed registry
    Computed {
        #[serde(alias = "predicate_key")]
        key: String,
    },
    /// Friendly buff on the player
    Buff {
        ability_id: i64,
        resistance_value: u32,
    },
    /// Debuff on the player
    Debuff {
        ability_id: i64,
        resistance_value: u32,
    },
}

impl MitigationSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            MitigationSource::Aura { .. } => SourceKind::Aura,
            MitigationSource::Gear { .. } => SourceKind::Gear,
            MitigationSource::Computed { .. } => SourceKind::Computed,
            MitigationSource::Buff { .. } => SourceKind::Buff,
            MitigationSource::Debuff { .. } => SourceKind::Debuff,
        }
    }

    /// Declared resistance (computed sources have none; their rule decides)
    pub fn fixed_resistance(&self) -> Option<u32> {
        match self {
            MitigationSource::Aura {
                resistance_value, ..
            }
            | MitigationSource::Gear {
                resistance_value, ..
            }
            | MitigationSource::Buff {
                resistance_value, ..
            }
            | MitigationSource::Debuff {
                resistance_value, ..
            } => Some(*resistance_value),
            MitigationSource::Computed { .. } => None,
        }
    }

    /// Ability referenced by the entry, if any
    pub fn ability_id(&self) -> Option<i64> {
        match self {
            MitigationSource::Aura { ability_id, .. }
            | MitigationSource::Buff { ability_id, .. }
            | MitigationSource::Debuff { ability_id, .. } => Some(*ability_id),
            MitigationSource::Gear { .. } | MitigationSource::Computed { .. } => None,
        }
    }
}

/// Named catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub source: MitigationSource,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, source: MitigationSource) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            source,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }
}

/// Immutable, ordered list of mitigation sources
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceCatalog {
    entries: Vec<CatalogEntry>,
}

impl SourceCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buff/debuff entries as (kind, ability, resistance), catalog order
    pub fn dynamic_sources(&self) -> Vec<(SourceKind, i64, u32)> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.source {
                MitigationSource::Buff {
                    ability_id,
                    resistance_value,
                } => Some((SourceKind::Buff, ability_id, resistance_value)),
                MitigationSource::Debuff {
                    ability_id,
                    resistance_value,
                } => Some((SourceKind::Debuff, ability_id, resistance_value)),
                _ => None,
            })
            .collect()
    }

    /// Default catalog: armor rules from the built-in computed registry plus
    /// the Resolve buffs.
    pub fn builtin() -> Self {
        Self::new(vec![
            CatalogEntry::new(
                "Armor Resistance",
                MitigationSource::Computed {
                    key: ARMOR_RESISTANCE.to_string(),
                },
            )
            .with_description("Base resistance from equipped armor pieces"),
            CatalogEntry::new(
                "Constitution",
                MitigationSource::Computed {
                    key: HEAVY_ARMOR_CONSTITUTION.to_string(),
                },
            )
            .with_description("Heavy Armor passive: +1320 resistance per heavy piece"),
            CatalogEntry::new(
                "Armor Focus",
                MitigationSource::Computed {
                    key: ARMOR_FOCUS.to_string(),
                },
            )
            .with_description("Heavy Armor passive: +3960 resistance with 5+ heavy pieces"),
            CatalogEntry::new(
                "Major Resolve",
                MitigationSource::Buff {
                    ability_id: MAJOR_RESOLVE,
                    resistance_value: 5948,
                },
            )
            .with_description("+5948 Physical and Spell Resistance"),
            CatalogEntry::new(
                "Minor Resolve",
                MitigationSource::Buff {
                    ability_id: MINOR_RESOLVE,
                    resistance_value: 2974,
                },
            )
            .with_description("+2974 Physical and Spell Resistance"),
        ])
    }
}

impl FromIterator<CatalogEntry> for SourceCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
