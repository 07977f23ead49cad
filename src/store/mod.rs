//! File-backed profile store.
//!
//! # Directory Structure
//!
//! ```text
//! profiles/
//! ├── xp/
//! │   └── dell-latitude-d630-windows-xp-v1.json
//! ├── win10/
//! │   └── lenovo-t480-windows-10-v1.json
//! └── other/
//! ```
//!
//! One pretty-printed JSON file per profile, partitioned by OS bucket. Writes
//! are whole-file and independent; there is no index to keep in sync.

mod scan;

pub use scan::{LoadError, ProfileDoc, ProfileScan, ScanEntry};

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::{Result, TkError};
use crate::profile::{Profile, os_bucket};

/// What a write did to the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Created,
    Updated,
    Unchanged,
}

/// Result of writing one profile.
#[derive(Debug, Clone, Serialize)]
pub struct WriteOutcome {
    pub id: String,
    pub bucket: String,
    pub path: PathBuf,
    pub status: WriteStatus,
}

/// Rejects ids that would escape their directory once used as a file name.
pub fn ensure_safe_id(id: &str) -> Result<()> {
    let unsafe_id = id.is_empty()
        || id.contains('/')
        || id.contains('\\')
        || id.contains("..")
        || id.contains('\0');
    if unsafe_id {
        return Err(TkError::UnsafeProfileId { id: id.to_string() });
    }
    Ok(())
}

/// Profile store rooted at a directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Fails with a hint when the store has never been generated.
    pub fn require_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(TkError::ProfilesDirNotFound {
                path: self.root.display().to_string(),
            })
        }
    }

    /// `<root>/<os bucket>/<id>.json`
    pub fn path_for(&self, profile: &Profile) -> PathBuf {
        self.root
            .join(os_bucket(&profile.metadata.os_target))
            .join(format!("{}.json", profile.id))
    }

    /// Writes a profile, overwriting any previous record with the same id.
    #[instrument(skip_all, fields(id = %profile.id))]
    pub fn write(&self, profile: &Profile) -> Result<WriteOutcome> {
        ensure_safe_id(&profile.id)?;

        let path = self.path_for(profile);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let contents = serde_json::to_string_pretty(profile)?;
        let status = match std::fs::read(&path) {
            Ok(existing) if existing == contents.as_bytes() => WriteStatus::Unchanged,
            Ok(_) => WriteStatus::Updated,
            Err(_) => WriteStatus::Created,
        };

        std::fs::write(&path, contents)?;
        trace!(path = %path.display(), ?status, "Wrote profile");

        Ok(WriteOutcome {
            id: profile.id.clone(),
            bucket: os_bucket(&profile.metadata.os_target).to_string(),
            path,
            status,
        })
    }

    /// Reads a typed profile back from a file.
    pub fn read(&self, path: &Path) -> Result<Profile> {
        read_profile(path)
    }

    /// Locates a profile file by id in any bucket.
    pub fn find(&self, id: &str) -> Option<PathBuf> {
        let file_name = format!("{id}.json");
        self.scan()
            .find(|entry| entry.file_name() == file_name)
            .map(|entry| entry.path)
    }

    /// Starts a fresh traversal of every profile file.
    pub fn scan(&self) -> ProfileScan {
        debug!(root = %self.root.display(), "Scanning profile store");
        ProfileScan::new(&self.root)
    }
}

/// Reads and parses one profile file into the typed model.
pub fn read_profile(path: &Path) -> Result<Profile> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TkError::ProfileNotFound {
                path: path.display().to_string(),
            }
        } else {
            TkError::Io(e)
        }
    })?;
    serde_json::from_str(&contents).map_err(|e| TkError::ProfileParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
