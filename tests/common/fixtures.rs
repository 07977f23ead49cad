//! Test fixture helpers for creating temporary test data.
//!
//! A [`Workspace`] is a temp directory holding a copy of the fixture catalog
//! and, optionally, a generated profile store. Everything is removed when the
//! workspace is dropped.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use testkit::catalog::load_catalog;
use testkit::profile::ProfileGenerator;
use testkit::store::ProfileStore;

/// Profiles the fixture catalog expands to.
pub const FIXTURE_PROFILE_COUNT: usize = 50;
/// Dell Latitude D630 profiles (XP and 7, two RAM sizes, four browsers).
pub const FIXTURE_DELL_COUNT: usize = 32;
/// HP ZBook 15 profiles (8.1 and 10).
pub const FIXTURE_HP_COUNT: usize = 12;
/// Lenovo T480 profiles (Windows 10 only).
pub const FIXTURE_LENOVO_COUNT: usize = 6;

/// Get the path to the test fixtures directory.
#[must_use]
pub fn fixtures_path(subpath: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(subpath)
}

/// Temporary project directory with a catalog and profile store.
///
/// # Example
///
/// ```ignore
/// let ws = Workspace::generated();
/// let store = ws.store();
/// // ws.profiles_dir() now holds 50 profiles
/// ```
pub struct Workspace {
    /// The temporary directory backing the workspace.
    pub dir: TempDir,
}

impl Workspace {
    /// Workspace with `laptops.json` copied in and no profiles yet.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory or the copy cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::copy(fixtures_path("laptops.json"), dir.path().join("laptops.json"))
            .expect("Failed to copy fixture catalog");
        Self { dir }
    }

    /// Workspace whose profile store has been generated from the catalog.
    ///
    /// # Panics
    ///
    /// Panics if generation fails.
    #[must_use]
    pub fn generated() -> Self {
        let ws = Self::new();
        let devices = load_catalog(&ws.catalog()).expect("Failed to load fixture catalog");
        ProfileGenerator::new(&ws.store())
            .run(&devices)
            .expect("Failed to generate fixture profiles");
        ws
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn catalog(&self) -> PathBuf {
        self.path().join("laptops.json")
    }

    #[must_use]
    pub fn profiles_dir(&self) -> PathBuf {
        self.path().join("profiles")
    }

    #[must_use]
    pub fn out_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    #[must_use]
    pub fn store(&self) -> ProfileStore {
        ProfileStore::new(self.profiles_dir())
    }

    /// Writes an arbitrary profile body to `profiles/<bucket>/<file_name>`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_profile(&self, bucket: &str, file_name: &str, body: &Value) -> PathBuf {
        let dir = self.profiles_dir().join(bucket);
        std::fs::create_dir_all(&dir).expect("Failed to create bucket directory");
        let path = dir.join(file_name);
        let text = serde_json::to_string_pretty(body).expect("Failed to serialize profile");
        std::fs::write(&path, text).expect("Failed to write profile");
        path
    }

    /// Writes raw text under the workspace root.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Path of a generated profile by bucket and id.
    #[must_use]
    pub fn profile_path(&self, bucket: &str, id: &str) -> PathBuf {
        self.profiles_dir().join(bucket).join(format!("{id}.json"))
    }

    /// Lossy string form of a path, for CLI arguments.
    #[must_use]
    pub fn arg(path: &Path) -> String {
        path.display().to_string()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Files directly inside `dir`, sorted by name.
///
/// # Panics
///
/// Panics if the directory cannot be read.
#[must_use]
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
