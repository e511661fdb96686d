//! Configuration file handling.
//!
//! This module provides loading and parsing of `.model_ddl.json` configuration files.
//! Every setting is optional; command-line values take precedence.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ddl::EmitOptions;

pub const CONFIG_FILE_NAME: &str = ".model_ddl.json";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default backend when none is given on the command line
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub exclude: ExcludeConfig,
    /// tracing filter directive, used when RUST_LOG is unset
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// Statement categories to leave out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    pub tables: bool,
    pub constraints: bool,
    pub indexes: bool,
}

impl ConfigFile {
    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file doesn't exist
    /// - The file cannot be read
    /// - The JSON is invalid
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            return Err(format!(
                "Configuration file not found: {}\n\n\
                 Example:\n\
                 {{\n  \
                   \"dialect\": \"postgresql\",\n  \
                   \"exclude\": {{ \"indexes\": true }},\n  \
                   \"log_filter\": \"info\"\n\
                 }}\n",
                path.display()
            )
            .into());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load the explicit config if given, otherwise the first one discovered.
    pub fn load(explicit: Option<&Path>) -> Result<Option<Self>, Box<dyn Error>> {
        match explicit {
            Some(path) => Self::load_from(path).map(Some),
            None => match resolve_config_path() {
                Some(path) => Self::load_from(&path).map(Some),
                None => Ok(None),
            },
        }
    }

    /// Merge the configured exclusions into `options`.
    ///
    /// A category excluded by either source stays excluded.
    pub fn apply(&self, options: &mut EmitOptions) {
        options.exclude_tables |= self.exclude.tables;
        options.exclude_constraints |= self.exclude.constraints;
        options.exclude_indexes |= self.exclude.indexes;
    }
}

/// Find a configuration file by checking locations in order of preference:
///   1. ./.model_ddl.json (current directory)
///   2. ~/.model_ddl.json (user-global)
pub fn resolve_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(home_dir) = home::home_dir() {
        let global = home_dir.join(CONFIG_FILE_NAME);
        if global.exists() {
            return Some(global);
        }
    }

    None
}
