//! Device catalog: the static, read-only input to profile generation.
//!
//! - `schema`: typed device records
//! - `validate`: non-fatal lint pass over a catalog file
//! - `db`: optional SQLite read-replica of the catalog

pub mod db;
mod schema;
mod validate;

pub use db::{CatalogDb, MigrationSummary};
pub use schema::{CpuOption, DeviceRecord, GpuOption};
pub use validate::{CatalogIssue, CatalogReport, DeviceSummary, IssueSeverity, validate_catalog};

use std::path::Path;

use tracing::{info, instrument};

use crate::error::{Result, TkError};

/// Loads and parses a catalog file.
///
/// Any malformed record aborts the load: generation must never run on a
/// partially understood catalog.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_catalog(path: &Path) -> Result<Vec<DeviceRecord>> {
    if !path.is_file() {
        return Err(TkError::CatalogNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    let devices = parse_catalog(&contents)?;
    info!(devices = devices.len(), "Loaded device catalog");
    Ok(devices)
}

/// Parses catalog JSON text.
pub fn parse_catalog(contents: &str) -> Result<Vec<DeviceRecord>> {
    serde_json::from_str(contents).map_err(|e| TkError::CatalogParse(e.to_string()))
}
