//! Lazy traversal of the profile store.
//!
//! Files are read only when an entry is loaded, so name-only matching never
//! touches file contents.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::profile::Profile;

/// Errors from loading one scanned record.
///
/// Callers that iterate a whole scan skip these rather than aborting.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// A loaded profile in its on-disk shape.
///
/// Kept as raw JSON so records from older generators, with flatter nesting,
/// can still be searched and exported.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDoc {
    /// Where the record was read from, if it came from disk.
    pub path: Option<PathBuf>,
    pub value: Value,
}

impl ProfileDoc {
    /// Wraps a JSON value that did not come from the store.
    pub const fn from_value(value: Value) -> Self {
        Self { path: None, value }
    }

    /// Views a typed profile as a document.
    pub fn from_profile(profile: &Profile) -> serde_json::Result<Self> {
        Ok(Self::from_value(serde_json::to_value(profile)?))
    }

    /// Reads a document from a profile file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| LoadError::Read(path.to_path_buf(), e))?;
        let value = serde_json::from_str(&contents)
            .map_err(|e| LoadError::Parse(path.to_path_buf(), e))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            value,
        })
    }

    /// Top-level `id`, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.value.get("id").and_then(Value::as_str)
    }
}

/// One profile file found by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub path: PathBuf,
}

impl ScanEntry {
    /// File name, e.g. `lenovo-t480-windows-10-v1.json`.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    pub fn load(&self) -> Result<ProfileDoc, LoadError> {
        ProfileDoc::load(&self.path)
    }
}

/// Iterator over every `*.json` file under the store root.
///
/// Entries are sorted by file name within each directory, so two scans of an
/// unchanged store yield the same order.
pub struct ProfileScan {
    inner: walkdir::IntoIter,
}

impl std::fmt::Debug for ProfileScan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileScan").finish_non_exhaustive()
    }
}

impl ProfileScan {
    pub(crate) fn new(root: &Path) -> Self {
        Self {
            inner: WalkDir::new(root).sort_by_file_name().into_iter(),
        }
    }
}

impl Iterator for ProfileScan {
    type Item = ScanEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let is_json = entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                    if !is_json {
                        trace!(path = %entry.path().display(), "Skipping non-profile file");
                        continue;
                    }
                    return Some(ScanEntry {
                        path: entry.into_path(),
                    });
                }
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable store entry");
                }
            }
        }
    }
}
