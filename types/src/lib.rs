//! Shared fight and report types for Bulwark
//!
//! This crate contains the serializable types that cross the boundary between
//! the analysis engine (bulwark-core) and whatever presents its results
//! (bulwark-cli, or a chart front end reading the JSON report).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Combat Log Input
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of buff/debuff log entry.
///
/// Stack events are accepted so raw log streams can be passed through
/// unfiltered. Stacks themselves are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[serde(alias = "applybuff", alias = "applydebuff")]
    Apply,
    /// Behaves like `Apply`
    #[serde(alias = "applybuffstack", alias = "applydebuffstack")]
    ApplyStack,
    #[serde(alias = "removebuff", alias = "removedebuff")]
    Remove,
    /// Losing a stack does not end the effect
    #[serde(alias = "removebuffstack", alias = "removedebuffstack")]
    RemoveStack,
}

impl EventKind {
    /// Returns true if this event can open an active window
    pub fn opens(&self) -> bool {
        matches!(self, EventKind::Apply | EventKind::ApplyStack)
    }

    /// Returns true if this event closes an active window
    pub fn closes(&self) -> bool {
        matches!(self, EventKind::Remove)
    }
}

/// A single apply/remove entry from a fight's buff or debuff stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatEvent {
    #[serde(alias = "type")]
    pub kind: EventKind,
    /// Milliseconds, same clock as the fight window
    pub timestamp: i64,
    #[serde(alias = "targetID")]
    pub target_id: i64,
    #[serde(alias = "abilityGameID")]
    pub ability_id: i64,
    /// Who applied the effect (0 when the log does not say)
    #[serde(default, alias = "sourceID")]
    pub source_id: i64,
}

impl CombatEvent {
    pub fn apply(timestamp: i64, target_id: i64, ability_id: i64) -> Self {
        Self {
            kind: EventKind::Apply,
            timestamp,
            target_id,
            ability_id,
            source_id: 0,
        }
    }

    pub fn remove(timestamp: i64, target_id: i64, ability_id: i64) -> Self {
        Self {
            kind: EventKind::Remove,
            timestamp,
            target_id,
            ability_id,
            source_id: 0,
        }
    }

    pub fn with_source(mut self, source_id: i64) -> Self {
        self.source_id = source_id;
        self
    }
}

/// Fight window in log milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fight {
    pub start_time: i64,
    pub end_time: i64,
}

impl Fight {
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Duration in milliseconds, never negative
    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).max(0)
    }

    /// Number of whole seconds covered by the fight, rounding a partial
    /// trailing second up.
    pub fn duration_secs_ceil(&self) -> i64 {
        (self.duration_ms() + 999) / 1000
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Roster & Character Data
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Healer,
    #[default]
    Dps,
}

/// Player roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, alias = "type")]
    pub class_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorType {
    #[default]
    None,
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearSlot {
    Head,
    Neck,
    Chest,
    Shoulders,
    MainHand,
    OffHand,
    Waist,
    Legs,
    Feet,
    Ring,
    Hands,
}

impl GearSlot {
    /// Slots that carry armor resistance (no jewelry or weapons)
    pub fn is_armor(&self) -> bool {
        matches!(
            self,
            GearSlot::Head
                | GearSlot::Chest
                | GearSlot::Shoulders
                | GearSlot::Waist
                | GearSlot::Hands
                | GearSlot::Legs
                | GearSlot::Feet
        )
    }
}

/// One equipped item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearPiece {
    #[serde(alias = "setID")]
    pub set_id: i64,
    #[serde(default)]
    pub armor_type: ArmorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<GearSlot>,
}

impl GearPiece {
    pub fn of_set(set_id: i64) -> Self {
        Self {
            set_id,
            ..Default::default()
        }
    }
}

/// Permanent aura (passive) present on the character for the whole fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aura {
    #[serde(alias = "ability")]
    pub ability_id: i64,
}

/// Fight-invariant character snapshot for one player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantInfo {
    #[serde(default)]
    pub gear: Vec<GearPiece>,
    #[serde(default)]
    pub auras: Vec<Aura>,
}

impl CombatantInfo {
    pub fn has_aura(&self, ability_id: i64) -> bool {
        self.auras.iter().any(|a| a.ability_id == ability_id)
    }

    pub fn pieces_of_set(&self, set_id: i64) -> usize {
        self.gear.iter().filter(|g| g.set_id == set_id).count()
    }

    /// Equipped armor pieces (slot known and armor-bearing)
    pub fn armor_pieces(&self) -> impl Iterator<Item = &GearPiece> {
        self.gear
            .iter()
            .filter(|g| g.slot.is_some_and(|s| s.is_armor()))
    }
}

/// Everything the engine needs for one fight, as decoded from a report export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightInput {
    pub fight: Fight,
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
    /// Keyed by player id
    #[serde(default)]
    pub combatant_info: HashMap<i64, CombatantInfo>,
    /// Friendly buffs (targets are players)
    #[serde(default)]
    pub buff_events: Vec<CombatEvent>,
    /// Debuffs (targets are players for mitigation, enemies for status effects)
    #[serde(default)]
    pub debuff_events: Vec<CombatEvent>,
    /// Buffs cast by enemies
    #[serde(default)]
    pub hostile_buff_events: Vec<CombatEvent>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Mitigation Sources
// ─────────────────────────────────────────────────────────────────────────────

/// Activation kind of a mitigation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Aura,
    Gear,
    Computed,
    Buff,
    Debuff,
}

impl SourceKind {
    /// Fight-invariant kinds that always feed the static total
    pub fn is_static(&self) -> bool {
        matches!(self, SourceKind::Aura | SourceKind::Gear)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Aura => "aura",
            SourceKind::Gear => "gear",
            SourceKind::Computed => "computed",
            SourceKind::Buff => "buff",
            SourceKind::Debuff => "debuff",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Report Types
// ─────────────────────────────────────────────────────────────────────────────

/// One 1 Hz sample of a player's mitigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSample {
    pub timestamp: i64,
    pub relative_time_seconds: i64,
    pub static_resistance: u32,
    pub dynamic_resistance: u32,
    /// 0-100
    pub damage_reduction_percent: f64,
}

impl PlayerSample {
    pub fn total_resistance(&self) -> u32 {
        self.static_resistance.saturating_add(self.dynamic_resistance)
    }
}

/// Activation result of a single catalog entry for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceState {
    pub name: String,
    pub kind: SourceKind,
    pub is_active: bool,
    pub resistance_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMitigationSummary {
    pub player_id: i64,
    pub player_name: String,
    pub samples: Vec<PlayerSample>,
    pub sources: Vec<SourceState>,
    pub static_resistance: u32,
    pub max_dynamic_resistance: u32,
    pub average_dynamic_resistance: f64,
}

/// Uptime of one tracked status effect on one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffectUptime {
    pub ability_id: i64,
    pub ability_name: String,
    pub total_duration_ms: i64,
    pub applications: u32,
    /// 0-100
    pub uptime_percentage: f64,
    /// Windows split by whoever applied them, highest uptime first
    #[serde(default)]
    pub by_source: Vec<SourceUptime>,
}

/// Share of a status effect's windows opened by one source.
///
/// For debuffs the source is the applying player; for hostile buffs it is
/// the enemy that applied the buff to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUptime {
    pub source_id: i64,
    pub total_duration_ms: i64,
    pub applications: u32,
    /// 0-100
    pub uptime_percentage: f64,
}

/// Uptime list for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetUptimes {
    pub target_id: i64,
    pub uptimes: Vec<StatusEffectUptime>,
}

/// Full output of a fight analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightReport {
    pub fight: Fight,
    pub mitigation: Vec<PlayerMitigationSummary>,
    pub status_effects: Vec<TargetUptimes>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// An ability whose uptime should be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAbility {
    pub ability_id: i64,
    #[serde(default)]
    pub name: String,
}

impl TrackedAbility {
    pub fn new(ability_id: i64, name: impl Into<String>) -> Self {
        Self {
            ability_id,
            name: name.into(),
        }
    }
}

/// Resistance to damage-reduction conversion model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ConversionConfig {
    /// `min(cap_percent, resistance / resistance_per_percent)`
    Linear {
        #[serde(default = "default_resistance_per_percent")]
        resistance_per_percent: f64,
        #[serde(default = "default_cap_percent")]
        cap_percent: f64,
    },
    /// `100 * r / (r + half_reduction_at)`
    Diminishing { half_reduction_at: f64 },
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig::Linear {
            resistance_per_percent: default_resistance_per_percent(),
            cap_percent: default_cap_percent(),
        }
    }
}

fn default_resistance_per_percent() -> f64 {
    660.0
}

fn default_cap_percent() -> f64 {
    50.0
}

/// Engine knobs that are not part of the catalog itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MitigationSettings {
    #[serde(default)]
    pub conversion: ConversionConfig,
    /// Count active computed sources toward static resistance
    #[serde(default)]
    pub include_computed_in_static: bool,
}

/// Persisted CLI/application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog TOML to use instead of the built-in catalog
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub mitigation: MitigationSettings,
    #[serde(default = "default_tracked_status_effects")]
    pub tracked_status_effects: Vec<TrackedAbility>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            mitigation: MitigationSettings::default(),
            tracked_status_effects: default_tracked_status_effects(),
        }
    }
}

/// Status effects tracked out of the box (debuffs first, then hostile buffs).
pub fn default_tracked_status_effects() -> Vec<TrackedAbility> {
    vec![
        TrackedAbility::new(18084, "Burning"),
        TrackedAbility::new(21929, "Poisoned"),
        TrackedAbility::new(148801, "Hemorrhaging"),
        TrackedAbility::new(178118, "Overcharged"),
        TrackedAbility::new(178123, "Sundered"),
        TrackedAbility::new(95134, "Concussion"),
        TrackedAbility::new(95136, "Chill"),
        TrackedAbility::new(178127, "Diseased"),
    ]
}
