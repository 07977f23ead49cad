//! Error types for TestKit operations.

use thiserror::Error;

/// Primary error type for TestKit operations.
#[derive(Error, Debug)]
pub enum TkError {
    // Catalog errors
    #[error("Device catalog not found: {path}")]
    CatalogNotFound { path: String },

    #[error("Device catalog parse error: {0}")]
    CatalogParse(String),

    // Profile errors
    #[error("Profile not found: {path}")]
    ProfileNotFound { path: String },

    #[error("Failed to parse profile {path}: {reason}")]
    ProfileParse { path: String, reason: String },

    #[error("Profile directory not found: {path}")]
    ProfilesDirNotFound { path: String },

    #[error("Unsafe profile id '{id}': ids must not contain path separators or '..'")]
    UnsafeProfileId { id: String },

    #[error("Profile body is not a JSON object")]
    ProfileNotObject,

    // Export errors
    #[error("Unknown export format '{name}' (expected one of: {expected})")]
    UnknownFormat { name: String, expected: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl TkError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CatalogNotFound { .. }
                | Self::ProfileNotFound { .. }
                | Self::ProfilesDirNotFound { .. }
                | Self::UnknownFormat { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CatalogNotFound { .. } => Some("Pass --catalog <path> or set `catalog` in the config file"),
            Self::ProfilesDirNotFound { .. } => Some("Run: testkit generate"),
            Self::UnknownFormat { .. } => Some("Use one of: docker, vagrant, terraform, wsb, hyperv, vmware"),
            Self::ConfigNotFound { .. } => Some("Check the --config path"),
            Self::ConfigParse(_) => Some("Valid keys: catalog, profiles_dir, export_dir, batch_dir, database, search_display_limit"),
            Self::CatalogParse(_) => Some("Run: testkit validate"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for TkError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<crate::store::LoadError> for TkError {
    fn from(err: crate::store::LoadError) -> Self {
        use crate::store::LoadError;

        match err {
            LoadError::Read(path, e) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::ProfileNotFound {
                    path: path.display().to_string(),
                }
            }
            LoadError::Read(_, e) => Self::Io(e),
            LoadError::Parse(path, e) => Self::ProfileParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Convenience type alias for Results using TkError.
pub type Result<T> = std::result::Result<T, TkError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| TkError::Other(format!("{}: {e}", f().into())))
    }
}
