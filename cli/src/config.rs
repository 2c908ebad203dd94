//! Persisted CLI settings

use bulwark_core::{SourceCatalog, load_catalog_file};
use bulwark_types::AppConfig;
use std::path::Path;

use crate::error::{CliError, ConfigError};

const APP_NAME: &str = "bulwark";
const CONFIG_NAME: &str = "config";

pub trait AppConfigExt {
    fn load() -> Self;
    /// Catalog named by `override_path`, else the configured one, else built-in
    fn resolve_catalog(&self, override_path: Option<&str>) -> Result<SourceCatalog, CliError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load::<AppConfig>(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %ConfigError::from(err), "Using default configuration");
                AppConfig::default()
            }
        }
    }

    fn resolve_catalog(&self, override_path: Option<&str>) -> Result<SourceCatalog, CliError> {
        match override_path.or(self.catalog_path.as_deref()) {
            Some(path) => Ok(load_catalog_file(Path::new(path))?),
            None => Ok(SourceCatalog::builtin()),
        }
    }
}

/// Where confy keeps the settings file, for display
pub fn config_path() -> Option<String> {
    confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
        .ok()
        .map(|p| p.display().to_string())
}
