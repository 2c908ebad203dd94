use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bulwark_core::{FightAnalyzer, MitigationHeadline};
use bulwark_types::{AppConfig, FightReport, SourceKind, StatusEffectUptime};
use rayon::prelude::*;

use crate::config::{AppConfigExt, config_path};
use crate::error::CliError;
use crate::input::{list_fight_files, load_fight};

fn analyzer(config: &AppConfig, catalog_override: Option<&str>) -> Result<FightAnalyzer, CliError> {
    let catalog = config.resolve_catalog(catalog_override)?;
    Ok(FightAnalyzer::from_config(config, catalog)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::Serialize)?;
    println!("{json}");
    Ok(())
}

pub fn analyze(
    path: &Path,
    catalog: Option<&str>,
    json: bool,
    config: &AppConfig,
) -> Result<(), CliError> {
    let analyzer = analyzer(config, catalog)?;
    let input = load_fight(path)?;

    let timer = Instant::now();
    let report = analyzer.analyze(&input);
    tracing::info!(
        path = %path.display(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Analyzed fight"
    );

    if json {
        return print_json(&report);
    }
    print_report(&report, &analyzer);
    if let Some(note) =
        excluded_computed_note(&report, config.mitigation.include_computed_in_static)
    {
        println!();
        println!("{note}");
    }
    Ok(())
}

pub fn uptime(path: &Path, target: i64, json: bool, config: &AppConfig) -> Result<(), CliError> {
    let analyzer = analyzer(config, None)?;
    let input = load_fight(path)?;

    let uptimes = analyzer
        .status_effects(&input)
        .into_iter()
        .find(|t| t.target_id == target)
        .map(|t| t.uptimes)
        .unwrap_or_default();

    if json {
        return print_json(&uptimes);
    }
    if uptimes.is_empty() {
        println!("No tracked status effects on target {target}");
        return Ok(());
    }
    println!("Target {target}");
    print_uptimes(&uptimes);
    Ok(())
}

/// Analyze every `*.json` fight in `dir` in parallel
pub fn batch(dir: &Path, config: &AppConfig) -> Result<(), CliError> {
    let analyzer = analyzer(config, None)?;
    let files = list_fight_files(dir)?;
    if files.is_empty() {
        println!("No fight files in {}", dir.display());
        return Ok(());
    }

    let timer = Instant::now();
    let results: Vec<(PathBuf, Result<FightReport, CliError>)> = files
        .into_par_iter()
        .map(|path| {
            let result = load_fight(&path)
                .map(|input| analyzer.analyze(&input))
                .map_err(CliError::from);
            (path, result)
        })
        .collect();

    println!("{:<40} {:>8} {:>8} {:>10}", "File", "Players", "Targets", "Duration");
    println!("{}", "-".repeat(70));
    let mut failed = 0;
    for (path, result) in &results {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match result {
            Ok(report) => println!(
                "{:<40} {:>8} {:>8} {:>9.1}s",
                name,
                report.mitigation.len(),
                report.status_effects.len(),
                report.fight.duration_ms() as f64 / 1000.0
            ),
            Err(err) => {
                failed += 1;
                tracing::warn!(path = %path.display(), error = %err, "Fight analysis failed");
                println!("{:<40} error: {err}", name);
            }
        }
    }

    tracing::info!(
        fights = results.len(),
        failed,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Batch complete"
    );
    Ok(())
}

pub fn show_settings(config: &AppConfig) -> Result<(), CliError> {
    if let Some(path) = config_path() {
        println!("Config file: {path}");
    }
    println!(
        "Catalog: {}",
        config.catalog_path.as_deref().unwrap_or("(built-in)")
    );
    println!("Conversion: {:?}", config.mitigation.conversion);
    println!(
        "Computed sources in static: {}",
        config.mitigation.include_computed_in_static
    );
    if !config.mitigation.include_computed_in_static {
        println!("  (active computed sources such as armor are listed but not summed into Static)");
    }
    println!("Tracked status effects:");
    for tracked in &config.tracked_status_effects {
        println!("  {:>8}  {}", tracked.ability_id, tracked.name);
    }
    Ok(())
}

pub fn exit() {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "quitting...");
    let _ = stdout.flush();
}

fn print_report(report: &FightReport, analyzer: &FightAnalyzer) {
    let conversion = analyzer.conversion();

    println!(
        "Fight {}..{} ({:.1}s)",
        report.fight.start_time,
        report.fight.end_time,
        report.fight.duration_ms() as f64 / 1000.0
    );
    println!();
    println!(
        "{:<24} {:>8} {:>8} {:>10} {:>8} {:>8} {:>8}",
        "Player", "Static", "MaxDyn", "AvgDyn", "Static%", "Max%", "Avg%"
    );
    println!("{}", "-".repeat(82));
    for summary in &report.mitigation {
        println!(
            "{:<24} {:>8} {:>8} {:>10.1} {:>7.2}% {:>7.2}% {:>7.2}%",
            summary.player_name,
            summary.static_resistance,
            summary.max_dynamic_resistance,
            summary.average_dynamic_resistance,
            summary.static_percent(conversion),
            summary.max_percent(conversion),
            summary.average_percent(conversion),
        );
        let active: Vec<String> = summary
            .sources
            .iter()
            .filter(|s| s.is_active)
            .map(|s| format!("{} [{}] {}", s.name, s.kind.label(), s.resistance_value))
            .collect();
        if !active.is_empty() {
            println!("    {}", active.join(", "));
        }
    }

    for target in &report.status_effects {
        if target.uptimes.is_empty() {
            continue;
        }
        println!();
        println!("Target {}", target.target_id);
        print_uptimes(&target.uptimes);
    }
}

/// Names of active computed sources that the static column leaves out
fn excluded_computed_note(report: &FightReport, include_computed: bool) -> Option<String> {
    if include_computed {
        return None;
    }
    let mut names: Vec<&str> = report
        .mitigation
        .iter()
        .flat_map(|m| &m.sources)
        .filter(|s| s.is_active && s.kind == SourceKind::Computed)
        .map(|s| s.name.as_str())
        .collect();
    if names.is_empty() {
        return None;
    }
    names.sort_unstable();
    names.dedup();
    Some(format!(
        "Note: Static excludes active computed sources ({}). Set include_computed_in_static to count them.",
        names.join(", ")
    ))
}

fn print_uptimes(uptimes: &[StatusEffectUptime]) {
    println!(
        "{:<24} {:>8} {:>10} {:>6}  {}",
        "Effect", "Uptime", "Active", "Apps", "By source"
    );
    for uptime in uptimes {
        let sources: Vec<String> = uptime
            .by_source
            .iter()
            .map(|s| format!("{}:{:.1}%", s.source_id, s.uptime_percentage))
            .collect();
        println!(
            "{:<24} {:>7.1}% {:>9.1}s {:>6}  {}",
            uptime.ability_name,
            uptime.uptime_percentage,
            uptime.total_duration_ms as f64 / 1000.0,
            uptime.applications,
            sources.join(" ")
        );
    }
}
