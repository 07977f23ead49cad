//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument, trace, warn};

use crate::batch::BatchReport;
use crate::catalog::{CatalogReport, MigrationSummary};
use crate::error::TkError;
use crate::export::{ExportFormat, ExportPaths};
use crate::profile::GenerationSummary;
use crate::query::SearchReport;

use super::{Output, RobotFormat, VersionInfo};

/// JSON output implementation for agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T) -> Option<String> {
        let rendered = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        match rendered {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                Some(json)
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize output");
                None
            }
        }
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        if let Some(json) = self.render(data) {
            println!("{json}");
        }
    }

    /// Output JSON to stderr.
    fn output_json_stderr<T: Serialize + ?Sized>(&self, data: &T) {
        if let Some(json) = self.render(data) {
            eprintln!("{json}");
        }
    }
}

/// Error payload written to stderr.
pub fn error_json(error: &TkError) -> serde_json::Value {
    json!({
        "error": true,
        "message": error.to_string(),
        "suggestion": error.suggestion(),
        "recoverable": error.is_user_recoverable(),
    })
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&json!({ "success": true, "message": message }));
    }

    fn error(&self, error: &TkError) {
        debug!(error = %error, "Robot: error");
        self.output_json_stderr(&error_json(error));
    }

    fn warning(&self, message: &str) {
        self.output_json(&json!({ "warning": true, "message": message }));
    }

    fn info(&self, message: &str) {
        self.output_json(&json!({ "info": true, "message": message }));
    }

    #[instrument(skip_all, fields(profiles = summary.profiles))]
    fn generation(&self, summary: &GenerationSummary, root: &Path) {
        self.output_json(&json!({
            "command": "generate",
            "ok": true,
            "profiles_dir": root.display().to_string(),
            "summary": summary,
        }));
    }

    #[instrument(skip_all, fields(valid = report.valid))]
    fn catalog_report(&self, report: &CatalogReport, catalog: &Path) {
        self.output_json(&json!({
            "command": "validate",
            "catalog": catalog.display().to_string(),
            "valid": report.valid,
            "error_count": report.error_count(),
            "warning_count": report.warning_count(),
            "report": report,
        }));
    }

    fn migration(&self, summary: &MigrationSummary, database: &Path) {
        self.output_json(&json!({
            "command": "migrate",
            "ok": true,
            "database": database.display().to_string(),
            "summary": summary,
        }));
    }

    fn exported(&self, paths: &ExportPaths) {
        self.output_json(&json!({
            "command": "export",
            "ok": true,
            "export": paths,
        }));
    }

    fn batch_plan(&self, format: ExportFormat, ids: &[String]) {
        self.output_json(&json!({
            "command": "batch",
            "dry_run": true,
            "format": format,
            "count": ids.len(),
            "ids": ids,
        }));
    }

    #[instrument(skip_all, fields(summary = %report.summary_line()))]
    fn batch_report(&self, report: &BatchReport) {
        self.output_json(&json!({
            "command": "batch",
            "ok": !report.has_failures(),
            "summary": report.summary_line(),
            "report": report,
        }));
    }

    fn search_results(&self, query: &str, report: &SearchReport, _display_limit: usize) {
        let matches: Vec<String> = report
            .matches
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        self.output_json(&json!({
            "command": "search",
            "query": query,
            "scanned": report.scanned,
            "count": matches.len(),
            "matches": matches,
        }));
    }

    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
