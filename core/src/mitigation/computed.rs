//! Computed mitigation rules
//!
//! `computed` catalog entries carry only a key. The registry maps that key to
//! a predicate (is the source active?) and a formula (how much resistance?),
//! both evaluated against the player's character data and roster entry.
//!
//! The engine fixes no rule logic. [`ComputedRegistry::builtin`] is a default
//! table of heavy-armor rules that callers may extend, override, or replace.

use std::fmt;
use std::sync::Arc;

use bulwark_types::{ArmorType, CombatantInfo, GearSlot, PlayerInfo};
use hashbrown::HashMap;

pub const ARMOR_RESISTANCE: &str = "armor_resistance";
pub const HEAVY_ARMOR_CONSTITUTION: &str = "heavy_armor_constitution";
pub const ARMOR_FOCUS: &str = "armor_focus";

const CONSTITUTION_PER_PIECE: u32 = 1320;
const ARMOR_FOCUS_VALUE: u32 = 3960;
const ARMOR_FOCUS_PIECES: usize = 5;

/// Everything a rule may look at for one player
#[derive(Debug, Clone, Copy)]
pub struct PlayerContext<'a> {
    pub player: &'a PlayerInfo,
    pub info: &'a CombatantInfo,
}

impl<'a> PlayerContext<'a> {
    pub fn new(player: &'a PlayerInfo, info: &'a CombatantInfo) -> Self {
        Self { player, info }
    }
}

type Predicate = Arc<dyn Fn(&PlayerContext<'_>) -> bool + Send + Sync>;
type Formula = Arc<dyn Fn(&PlayerContext<'_>) -> u32 + Send + Sync>;

#[derive(Clone)]
struct ComputedRule {
    predicate: Predicate,
    formula: Formula,
}

/// Keyed table of predicate/formula pairs for `computed` sources
#[derive(Clone, Default)]
pub struct ComputedRegistry {
    rules: HashMap<String, ComputedRule>,
}

impl fmt::Debug for ComputedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.rules.keys().collect();
        keys.sort();
        f.debug_struct("ComputedRegistry").field("keys", &keys).finish()
    }
}

impl ComputedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the rule for `key`
    pub fn register<P, F>(&mut self, key: impl Into<String>, predicate: P, formula: F)
    where
        P: Fn(&PlayerContext<'_>) -> bool + Send + Sync + 'static,
        F: Fn(&PlayerContext<'_>) -> u32 + Send + Sync + 'static,
    {
        self.rules.insert(
            key.into(),
            ComputedRule {
                predicate: Arc::new(predicate),
                formula: Arc::new(formula),
            },
        );
    }

    pub fn with_rule<P, F>(mut self, key: impl Into<String>, predicate: P, formula: F) -> Self
    where
        P: Fn(&PlayerContext<'_>) -> bool + Send + Sync + 'static,
        F: Fn(&PlayerContext<'_>) -> u32 + Send + Sync + 'static,
    {
        self.register(key, predicate, formula);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// `(is_active, resistance_value)` for `key`, or `None` if no rule is registered
    pub fn evaluate(&self, key: &str, ctx: &PlayerContext<'_>) -> Option<(bool, u32)> {
        let rule = self.rules.get(key)?;
        Some(((rule.predicate)(ctx), (rule.formula)(ctx)))
    }

    /// Heavy-armor rules: per-slot armor resistance, Constitution, Armor Focus
    pub fn builtin() -> Self {
        Self::new()
            .with_rule(
                ARMOR_RESISTANCE,
                |ctx| ctx.info.armor_pieces().next().is_some(),
                |ctx| ctx.info.armor_pieces().map(armor_piece_resistance).sum(),
            )
            .with_rule(
                HEAVY_ARMOR_CONSTITUTION,
                |ctx| heavy_pieces(ctx.info) > 0,
                |ctx| heavy_pieces(ctx.info) as u32 * CONSTITUTION_PER_PIECE,
            )
            .with_rule(
                ARMOR_FOCUS,
                |ctx| heavy_pieces(ctx.info) >= ARMOR_FOCUS_PIECES,
                |ctx| {
                    if heavy_pieces(ctx.info) >= ARMOR_FOCUS_PIECES {
                        ARMOR_FOCUS_VALUE
                    } else {
                        0
                    }
                },
            )
    }
}

fn heavy_pieces(info: &CombatantInfo) -> usize {
    info.armor_pieces()
        .filter(|g| g.armor_type == ArmorType::Heavy)
        .count()
}

/// Base resistance of one armor piece by weight and slot
fn armor_piece_resistance(piece: &bulwark_types::GearPiece) -> u32 {
    use GearSlot::*;

    let Some(slot) = piece.slot else {
        return 0;
    };
    match (piece.armor_type, slot) {
        (ArmorType::Heavy, Chest) => 2772,
        (ArmorType::Heavy, Head | Shoulders | Legs | Feet) => 2425,
        (ArmorType::Heavy, Hands) => 1386,
        (ArmorType::Heavy, Waist) => 1039,
        (ArmorType::Medium, Chest) => 2084,
        (ArmorType::Medium, Head | Shoulders | Legs | Feet) => 1823,
        (ArmorType::Medium, Hands) => 1042,
        (ArmorType::Medium, Waist) => 781,
        (ArmorType::Light, Chest) => 1396,
        (ArmorType::Light, Head | Shoulders | Legs | Feet) => 1221,
        (ArmorType::Light, Hands) => 698,
        (ArmorType::Light, Waist) => 523,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use bulwark_types::{GearPiece, Role};

    use super::*;

    fn player() -> PlayerInfo {
        PlayerInfo {
            id: 1,
            name: "Tank".to_string(),
            role: Role::Tank,
            class_name: "Dragonknight".to_string(),
        }
    }

    fn armor(armor_type: ArmorType, slot: GearSlot) -> GearPiece {
        GearPiece {
            set_id: 0,
            armor_type,
            slot: Some(slot),
        }
    }

    fn heavy_set(pieces: usize) -> CombatantInfo {
        let slots = [
            GearSlot::Head,
            GearSlot::Chest,
            GearSlot::Shoulders,
            GearSlot::Waist,
            GearSlot::Hands,
            GearSlot::Legs,
            GearSlot::Feet,
        ];
        CombatantInfo {
            gear: slots
                .iter()
                .take(pieces)
                .map(|&s| armor(ArmorType::Heavy, s))
                .collect(),
            auras: vec![],
        }
    }

    #[test]
    fn unknown_key_has_no_rule() {
        let registry = ComputedRegistry::builtin();
        let player = player();
        let info = CombatantInfo::default();
        assert_eq!(
            registry.evaluate("block_mitigation", &PlayerContext::new(&player, &info)),
            None
        );
    }

    #[test]
    fn armor_focus_needs_five_heavy_pieces() {
        let registry = ComputedRegistry::builtin();
        let player = player();

        let four = heavy_set(4);
        assert_eq!(
            registry.evaluate(ARMOR_FOCUS, &PlayerContext::new(&player, &four)),
            Some((false, 0))
        );

        let five = heavy_set(5);
        assert_eq!(
            registry.evaluate(ARMOR_FOCUS, &PlayerContext::new(&player, &five)),
            Some((true, ARMOR_FOCUS_VALUE))
        );
    }

    #[test]
    fn constitution_scales_per_heavy_piece() {
        let registry = ComputedRegistry::builtin();
        let player = player();
        let info = heavy_set(3);
        assert_eq!(
            registry.evaluate(HEAVY_ARMOR_CONSTITUTION, &PlayerContext::new(&player, &info)),
            Some((true, 3 * CONSTITUTION_PER_PIECE))
        );
    }

    #[test]
    fn armor_resistance_sums_slots_and_skips_jewelry() {
        let registry = ComputedRegistry::builtin();
        let player = player();
        let info = CombatantInfo {
            gear: vec![
                armor(ArmorType::Heavy, GearSlot::Chest),
                armor(ArmorType::Medium, GearSlot::Head),
                armor(ArmorType::Light, GearSlot::Waist),
                armor(ArmorType::None, GearSlot::Ring),
            ],
            auras: vec![],
        };
        assert_eq!(
            registry.evaluate(ARMOR_RESISTANCE, &PlayerContext::new(&player, &info)),
            Some((true, 2772 + 1823 + 523))
        );
    }

    #[test]
    fn registered_rule_overrides_builtin() {
        let registry = ComputedRegistry::builtin().with_rule(
            ARMOR_FOCUS,
            |ctx| ctx.player.role == Role::Tank,
            |_| 100,
        );
        let player = player();
        let info = CombatantInfo::default();
        assert_eq!(
            registry.evaluate(ARMOR_FOCUS, &PlayerContext::new(&player, &info)),
            Some((true, 100))
        );
    }
}
