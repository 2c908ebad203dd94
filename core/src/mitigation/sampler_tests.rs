//! Tests for mitigation sampling
//!
//! Verifies that:
//! - Sampling covers every second of the fight, both endpoints included
//! - Dynamic resistance follows buff/debuff windows tick by tick
//! - Max/average reduce the raw series and headlines convert afterwards

use std::collections::HashMap;

use bulwark_types::{
    CombatEvent, CombatantInfo, Fight, GearPiece, MitigationSettings, PlayerInfo, Role,
};

use super::*;
use crate::intervals::{IntervalSet, reconstruct_intervals};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

const PLAYER: i64 = 1;
const SET: i64 = 7;
const BREACH: i64 = 17_906;

fn player(id: i64) -> PlayerInfo {
    PlayerInfo {
        id,
        name: format!("Player {id}"),
        role: Role::Tank,
        class_name: "Nightblade".to_string(),
    }
}

fn full_set() -> CombatantInfo {
    CombatantInfo {
        gear: (0..5).map(|_| GearPiece::of_set(SET)).collect(),
        auras: vec![],
    }
}

/// 5-piece set worth 2000, Major Resolve buff, Breach debuff (negative effect
/// is not modeled, it just contributes its value).
fn catalog() -> SourceCatalog {
    SourceCatalog::new(vec![
        CatalogEntry::new(
            "Set",
            MitigationSource::Gear {
                set_id: SET,
                number_of_pieces: 5,
                resistance_value: 2_000,
            },
        ),
        CatalogEntry::new(
            "Major Resolve",
            MitigationSource::Buff {
                ability_id: MAJOR_RESOLVE,
                resistance_value: 5_948,
            },
        ),
        CatalogEntry::new(
            "Breach",
            MitigationSource::Debuff {
                ability_id: BREACH,
                resistance_value: 1_000,
            },
        ),
    ])
}

fn sampler(conversion: Conversion) -> MitigationSampler {
    MitigationSampler::new(catalog(), ComputedRegistry::new(), conversion)
}

fn linear() -> Conversion {
    Conversion::new(LinearConversion::default())
}

fn windows(events: &[CombatEvent], fight: &Fight) -> IntervalSet {
    reconstruct_intervals(events, fight.end_time)
}

// ═══════════════════════════════════════════════════════════════════════════
// Tick Layout
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_samples_include_both_endpoints() {
    let fight = Fight::new(1_000, 11_000);
    let none = IntervalSet::default();
    let summary = sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &none, &none);

    assert_eq!(summary.samples.len(), 11);
    assert_eq!(summary.samples[0].timestamp, 1_000);
    assert_eq!(summary.samples[0].relative_time_seconds, 0);
    assert_eq!(summary.samples[10].timestamp, 11_000);
    assert_eq!(summary.samples[10].relative_time_seconds, 10);
}

#[test]
fn test_partial_second_rounds_up() {
    let fight = Fight::new(0, 10_500);
    let none = IntervalSet::default();
    let summary = sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &none, &none);
    assert_eq!(summary.samples.len(), 12);
}

#[test]
fn test_zero_length_fight_yields_single_sample() {
    let fight = Fight::new(5_000, 5_000);
    let none = IntervalSet::default();
    let summary = sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &none, &none);

    assert_eq!(summary.samples.len(), 1);
    assert_eq!(summary.max_dynamic_resistance, 0);
    assert_eq!(summary.average_dynamic_resistance, 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Static & Dynamic Components
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_static_resistance_constant_across_ticks() {
    let fight = Fight::new(0, 5_000);
    let none = IntervalSet::default();
    let summary = sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &none, &none);

    assert_eq!(summary.static_resistance, 2_000);
    assert!(summary.samples.iter().all(|s| s.static_resistance == 2_000));
    assert!(summary.samples.iter().all(|s| s.dynamic_resistance == 0));
}

#[test]
fn test_dynamic_follows_buff_window() {
    let fight = Fight::new(0, 10_000);
    let buffs = windows(
        &[
            CombatEvent::apply(2_000, PLAYER, MAJOR_RESOLVE),
            CombatEvent::remove(5_000, PLAYER, MAJOR_RESOLVE),
        ],
        &fight,
    );
    let none = IntervalSet::default();
    let summary = sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &buffs, &none);

    let dynamic: Vec<u32> = summary.samples.iter().map(|s| s.dynamic_resistance).collect();
    assert_eq!(
        dynamic,
        vec![0, 0, 5_948, 5_948, 5_948, 5_948, 0, 0, 0, 0, 0]
    );
    assert_eq!(summary.max_dynamic_resistance, 5_948);
    assert!((summary.average_dynamic_resistance - 4.0 * 5_948.0 / 11.0).abs() < 1e-9);
}

#[test]
fn test_debuff_sources_read_debuff_stream() {
    let fight = Fight::new(0, 2_000);
    // Breach shows up in the buff stream too; only the debuff stream counts
    let buffs = windows(&[CombatEvent::apply(0, PLAYER, BREACH)], &fight);
    let debuffs = reconstruct_intervals(&[CombatEvent::apply(1_000, PLAYER, BREACH)], fight.end_time);

    let summary =
        sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &buffs, &debuffs);
    let dynamic: Vec<u32> = summary.samples.iter().map(|s| s.dynamic_resistance).collect();
    assert_eq!(dynamic, vec![0, 1_000, 1_000]);
}

#[test]
fn test_other_players_buffs_do_not_count() {
    let fight = Fight::new(0, 3_000);
    let buffs = windows(&[CombatEvent::apply(0, PLAYER + 1, MAJOR_RESOLVE)], &fight);
    let none = IntervalSet::default();
    let summary = sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &buffs, &none);
    assert_eq!(summary.max_dynamic_resistance, 0);
}

#[test]
fn test_sample_percent_converts_total() {
    let fight = Fight::new(0, 1_000);
    let buffs = windows(&[CombatEvent::apply(1_000, PLAYER, MAJOR_RESOLVE)], &fight);
    let none = IntervalSet::default();
    let summary = sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &buffs, &none);

    assert!((summary.samples[0].damage_reduction_percent - 2_000.0 / 660.0).abs() < 1e-9);
    assert_eq!(summary.samples[1].total_resistance(), 7_948);
    assert!((summary.samples[1].damage_reduction_percent - 7_948.0 / 660.0).abs() < 1e-9);
}

// ═══════════════════════════════════════════════════════════════════════════
// Reductions & Headlines
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_max_at_least_average() {
    let fight = Fight::new(0, 20_000);
    let buffs = windows(
        &[
            CombatEvent::apply(0, PLAYER, MAJOR_RESOLVE),
            CombatEvent::remove(3_000, PLAYER, MAJOR_RESOLVE),
            CombatEvent::apply(9_000, PLAYER, MAJOR_RESOLVE),
        ],
        &fight,
    );
    let debuffs = reconstruct_intervals(&[CombatEvent::apply(4_000, PLAYER, BREACH)], fight.end_time);
    let summary =
        sampler(linear()).summarize(&fight, &player(PLAYER), &full_set(), &buffs, &debuffs);

    assert!(summary.max_dynamic_resistance as f64 >= summary.average_dynamic_resistance);
    assert!(summary.average_dynamic_resistance >= 0.0);
}

#[test]
fn test_headline_converts_after_reduction() {
    // Strongly non-linear: square root curve
    let conversion = Conversion::new(|r: f64| (r.max(0.0).sqrt() / 2.0).min(99.0));
    let fight = Fight::new(0, 3_000);
    let buffs = windows(
        &[
            CombatEvent::apply(0, PLAYER, MAJOR_RESOLVE),
            CombatEvent::remove(1_000, PLAYER, MAJOR_RESOLVE),
        ],
        &fight,
    );
    let none = IntervalSet::default();
    let summary = sampler(conversion.clone()).summarize(
        &fight,
        &player(PLAYER),
        &full_set(),
        &buffs,
        &none,
    );

    let expected_avg = conversion.convert(2_000.0 + summary.average_dynamic_resistance);
    let mean_of_percents = summary
        .samples
        .iter()
        .map(|s| s.damage_reduction_percent)
        .sum::<f64>()
        / summary.samples.len() as f64;

    assert!((summary.average_percent(&conversion) - expected_avg).abs() < 1e-9);
    assert!((summary.average_percent(&conversion) - mean_of_percents).abs() > 1e-6);
    assert!(
        (summary.max_percent(&conversion) - conversion.convert(2_000.0 + 5_948.0)).abs() < 1e-9
    );
    assert!((summary.static_percent(&conversion) - conversion.convert(2_000.0)).abs() < 1e-9);
}

// ═══════════════════════════════════════════════════════════════════════════
// Roster
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_roster_skips_players_without_info() {
    let fight = Fight::new(0, 2_000);
    let players = vec![player(3), player(1), player(2)];
    let info: HashMap<i64, CombatantInfo> =
        [(1, full_set()), (3, CombatantInfo::default())].into_iter().collect();
    let none = IntervalSet::default();

    let summaries = sampler(linear()).summarize_roster(&fight, &players, &info, &none, &none);
    let ids: Vec<i64> = summaries.iter().map(|s| s.player_id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(summaries[0].static_resistance, 0);
    assert_eq!(summaries[1].static_resistance, 2_000);
}

#[test]
fn test_settings_reject_invalid_conversion() {
    let settings = MitigationSettings {
        conversion: bulwark_types::ConversionConfig::Linear {
            resistance_per_percent: -1.0,
            cap_percent: 50.0,
        },
        include_computed_in_static: false,
    };
    let result = MitigationSampler::from_settings(catalog(), ComputedRegistry::new(), &settings);
    assert!(matches!(result, Err(ConversionError::NonPositiveRatio(_))));
}

#[test]
fn test_computed_sources_opt_into_static() {
    let catalog = SourceCatalog::builtin();
    let info = CombatantInfo {
        gear: (0..5)
            .map(|i| GearPiece {
                set_id: 0,
                armor_type: bulwark_types::ArmorType::Heavy,
                slot: Some(
                    [
                        bulwark_types::GearSlot::Head,
                        bulwark_types::GearSlot::Chest,
                        bulwark_types::GearSlot::Legs,
                        bulwark_types::GearSlot::Feet,
                        bulwark_types::GearSlot::Hands,
                    ][i],
                ),
            })
            .collect(),
        auras: vec![],
    };
    let fight = Fight::new(0, 1_000);
    let none = IntervalSet::default();

    let default = MitigationSampler::new(catalog.clone(), ComputedRegistry::builtin(), linear());
    let summary = default.summarize(&fight, &player(PLAYER), &info, &none, &none);
    assert_eq!(summary.static_resistance, 0);

    let opted_in = MitigationSampler::new(catalog, ComputedRegistry::builtin(), linear())
        .include_computed_in_static(true);
    let summary = opted_in.summarize(&fight, &player(PLAYER), &info, &none, &none);
    // Armor 2425*3 + 2772 + 1386, Constitution 5*1320, Armor Focus 3960
    assert_eq!(summary.static_resistance, 11_433 + 6_600 + 3_960);
}
