use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::mitigation::{CatalogEntry, MitigationSource, SourceCatalog};

/// Top-level shape of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default, rename = "source")]
    pub sources: Vec<CatalogEntry>,
}

/// Load a catalog from a TOML file
pub fn load_catalog_file(path: &Path) -> Result<SourceCatalog, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse(&content, path)?;
    tracing::info!(path = %path.display(), sources = catalog.len(), "Loaded source catalog");
    Ok(catalog)
}

/// Load a catalog from TOML text (errors report `<inline>` as the path)
pub fn load_catalog_str(content: &str) -> Result<SourceCatalog, CatalogError> {
    parse(content, Path::new("<inline>"))
}

fn parse(content: &str, path: &Path) -> Result<SourceCatalog, CatalogError> {
    let file: CatalogFile = toml::from_str(content).map_err(|source| CatalogError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    for (index, entry) in file.sources.iter().enumerate() {
        validate(entry).map_err(|reason| CatalogError::InvalidDefinition {
            path: PathBuf::from(path),
            reason: format!("source #{} ({:?}): {reason}", index + 1, entry.name),
        })?;
    }

    Ok(SourceCatalog::new(file.sources))
}

fn validate(entry: &CatalogEntry) -> Result<(), String> {
    if entry.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    match &entry.source {
        MitigationSource::Gear {
            number_of_pieces: 0,
            ..
        } => Err("number_of_pieces must be at least 1".to_string()),
        MitigationSource::Computed { key } if key.trim().is_empty() => {
            Err("computed key must not be empty".to_string())
        }
        _ => Ok(()),
    }
}
