//! Fight input files

use std::fs;
use std::path::{Path, PathBuf};

use bulwark_types::FightInput;

use crate::error::InputError;

/// Read and decode one fight JSON file
pub fn load_fight(path: &Path) -> Result<FightInput, InputError> {
    let content = fs::read_to_string(path).map_err(|source| InputError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let input: FightInput =
        serde_json::from_str(&content).map_err(|source| InputError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        path = %path.display(),
        players = input.players.len(),
        buff_events = input.buff_events.len(),
        debuff_events = input.debuff_events.len(),
        hostile_buff_events = input.hostile_buff_events.len(),
        "Loaded fight"
    );
    Ok(input)
}

/// `*.json` files directly inside `dir`, sorted by path
pub fn list_fight_files(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let entries = fs::read_dir(dir).map_err(|source| InputError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| InputError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
