//! TOML settings for catalog, store, and export locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::path::{PathResolver, default_config_path};
use crate::error::{Result, TkError};

/// Resolved TestKit settings.
///
/// ```toml
/// catalog = "db/laptops.json"
/// profiles_dir = "profiles"
/// export_dir = "exports"
/// batch_dir = "exports/batch"
/// database = "db/hardware.db"
/// search_display_limit = 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Device catalog (JSON array of device records).
    pub catalog: PathBuf,
    /// Root of the profile store.
    pub profiles_dir: PathBuf,
    /// Output directory for single-profile exports.
    pub export_dir: PathBuf,
    /// Output directory for batch exports.
    pub batch_dir: PathBuf,
    /// SQLite read-replica of the catalog.
    pub database: PathBuf,
    /// How many search hits the CLI prints before summarising the rest.
    pub search_display_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("db/laptops.json"),
            profiles_dir: PathBuf::from("profiles"),
            export_dir: PathBuf::from("exports"),
            batch_dir: PathBuf::from("exports/batch"),
            database: PathBuf::from("db/hardware.db"),
            search_display_limit: 20,
        }
    }
}

impl Settings {
    /// Loads settings.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// used when present and defaults otherwise.
    #[instrument(skip_all, fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(TkError::ConfigNotFound {
                    path: path.display().to_string(),
                });
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parses a config file, resolving relative paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TkError::ConfigParse(format!("Failed to read {}: {e}", path.display()))
        })?;
        let settings = Self::parse(&contents)?;
        let resolver = PathResolver::new(path)?;
        let resolved = settings.resolved_with(&resolver)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(resolved)
    }

    /// Parses settings from TOML text without resolving paths.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| TkError::ConfigParse(e.to_string()))
    }

    fn resolved_with(self, resolver: &PathResolver) -> Result<Self> {
        Ok(Self {
            catalog: resolver.resolve(&self.catalog)?,
            profiles_dir: resolver.resolve(&self.profiles_dir)?,
            export_dir: resolver.resolve(&self.export_dir)?,
            batch_dir: resolver.resolve(&self.batch_dir)?,
            database: resolver.resolve(&self.database)?,
            search_display_limit: self.search_display_limit,
        })
    }
}
