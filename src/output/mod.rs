//! Output mode abstraction for robot and human output.

use std::path::Path;

use crate::batch::BatchReport;
use crate::catalog::{CatalogReport, MigrationSummary};
use crate::cli::Cli;
use crate::error::TkError;
use crate::export::{ExportFormat, ExportPaths};
use crate::profile::GenerationSummary;
use crate::query::SearchReport;
use crate::theme::TkTheme;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--output-format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug)]
pub enum OutputMode {
    /// JSON output for agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human(TkTheme),
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else if cli.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
            Self::Human(TkTheme::plain())
        } else {
            Self::Human(TkTheme::default())
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human(theme) => Box::new(HumanOutput::new(theme)),
        }
    }
}

/// Build metadata shown by `testkit version`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: &'static str,
    pub build_timestamp: &'static str,
    pub rustc: &'static str,
    pub target: &'static str,
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &TkError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Catalog
    fn generation(&self, summary: &GenerationSummary, root: &Path);
    fn catalog_report(&self, report: &CatalogReport, catalog: &Path);
    fn migration(&self, summary: &MigrationSummary, database: &Path);

    // Profiles
    fn exported(&self, paths: &ExportPaths);
    fn batch_plan(&self, format: ExportFormat, ids: &[String]);
    fn batch_report(&self, report: &BatchReport);
    fn search_results(&self, query: &str, report: &SearchReport, display_limit: usize);

    // Metadata
    fn version_info(&self, info: &VersionInfo);
}
