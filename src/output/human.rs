//! Human-friendly output implementation using console styling.

use std::path::Path;

use tracing::{debug, instrument, trace};

use crate::batch::BatchReport;
use crate::catalog::{CatalogReport, IssueSeverity, MigrationSummary};
use crate::error::TkError;
use crate::export::{ExportFormat, ExportPaths};
use crate::profile::GenerationSummary;
use crate::query::SearchReport;
use crate::theme::TkTheme;

use super::{Output, VersionInfo};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    theme: TkTheme,
}

impl HumanOutput {
    #[instrument(skip(theme))]
    pub fn new(theme: TkTheme) -> Self {
        debug!("Creating HumanOutput");
        Self { theme }
    }

    fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!(
            "  {} {}",
            self.theme.label.apply_to(format!("{label}:")),
            self.theme.value.apply_to(value)
        );
    }

    fn path_line(&self, label: &str, path: &Path) {
        println!(
            "  {} {}",
            self.theme.label.apply_to(format!("{label}:")),
            self.theme.path.apply_to(path.display())
        );
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        println!("{} {message}", self.theme.success.apply_to("[OK]"));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &TkError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!(
            "{} {}",
            self.theme.error.apply_to("[ERR]"),
            self.theme.value.apply_to(error)
        );
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            eprintln!(
                "  {} {}",
                self.theme.label.apply_to("Suggestion:"),
                self.theme.muted.apply_to(suggestion)
            );
        }
    }

    fn warning(&self, message: &str) {
        println!("{} {message}", self.theme.warning.apply_to("[WARN]"));
    }

    fn info(&self, message: &str) {
        println!("{} {message}", self.theme.accent.apply_to("[INFO]"));
    }

    fn generation(&self, summary: &GenerationSummary, root: &Path) {
        self.success(&format!(
            "Generated {} profiles from {} devices",
            summary.profiles, summary.devices
        ));
        self.path_line("Store", root);
        self.field(
            "Written",
            format!(
                "{} created, {} updated, {} unchanged",
                summary.created, summary.updated, summary.unchanged
            ),
        );
        for (bucket, count) in &summary.by_bucket {
            println!("    {:<8} {count}", self.theme.profile_id.apply_to(bucket));
        }
    }

    fn catalog_report(&self, report: &CatalogReport, catalog: &Path) {
        println!("{}", self.theme.header.apply_to("Catalog validation"));
        self.path_line("Catalog", catalog);
        self.field("Devices", report.device_count);
        self.field("Profiles", report.total_profiles);

        for device in &report.devices {
            println!(
                "    {:>3}  {:<40} {}",
                device.index,
                device.device,
                self.theme.muted.apply_to(device.profile_count)
            );
        }

        for issue in &report.issues {
            let tag = match issue.severity {
                IssueSeverity::Error => self.theme.error.apply_to("[ERR] "),
                IssueSeverity::Warning => self.theme.warning.apply_to("[WARN]"),
            };
            println!("  {tag} #{} {}: {}", issue.index, issue.device, issue.message);
        }

        let totals = format!(
            "{} error(s), {} warning(s)",
            report.error_count(),
            report.warning_count()
        );
        if report.valid {
            self.success(&format!("Catalog is valid ({totals})"));
        } else {
            println!("{} Catalog is invalid ({totals})", self.theme.error.apply_to("[ERR]"));
        }
    }

    fn migration(&self, summary: &MigrationSummary, database: &Path) {
        self.success(&format!(
            "Migrated {} devices ({} option rows)",
            summary.devices, summary.option_rows
        ));
        self.path_line("Database", database);
        self.field("At", summary.migrated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    fn exported(&self, paths: &ExportPaths) {
        self.success(&format!(
            "Exported {} as {}",
            self.theme.profile_id.apply_to(&paths.id),
            paths.format
        ));
        self.path_line("Artifact", &paths.artifact);
        self.path_line("Launch", &paths.launch_ps1);
        self.path_line("Launch", &paths.launch_sh);
    }

    fn batch_plan(&self, format: ExportFormat, ids: &[String]) {
        println!(
            "{}",
            self.theme
                .header
                .apply_to(format!("Dry run: {} profile(s) would be exported as {format}", ids.len()))
        );
        for id in ids {
            println!("  {}", self.theme.profile_id.apply_to(id));
        }
    }

    fn batch_report(&self, report: &BatchReport) {
        for failure in &report.failures {
            println!(
                "{} {}: {}",
                self.theme.error.apply_to("[FAIL]"),
                self.theme.profile_id.apply_to(&failure.id),
                failure.error
            );
        }
        let line = format!("Batch completed: {}", report.summary_line());
        if report.has_failures() {
            self.warning(&line);
        } else {
            self.success(&line);
        }
        self.path_line("Output", &report.output_dir);
    }

    fn search_results(&self, query: &str, report: &SearchReport, display_limit: usize) {
        if report.matches.is_empty() {
            self.warning(&format!(
                "No profiles match '{query}' ({} scanned)",
                report.scanned
            ));
            return;
        }

        println!(
            "{}",
            self.theme.header.apply_to(format!(
                "Found {} matching profile(s) ({} scanned)",
                report.matches.len(),
                report.scanned
            ))
        );
        for path in report.matches.iter().take(display_limit) {
            println!("  {}", self.theme.path.apply_to(path.display()));
        }
        let hidden = report.matches.len().saturating_sub(display_limit);
        if hidden > 0 {
            println!("  {}", self.theme.muted.apply_to(format!("... and {hidden} more")));
        }
    }

    fn version_info(&self, info: &VersionInfo) {
        println!(
            "{} {}",
            self.theme.accent.apply_to("testkit"),
            self.theme.value.apply_to(info.version)
        );
        self.field("Git SHA", info.git_sha);
        self.field("Dirty", info.git_dirty);
        self.field("Built", info.build_timestamp);
        self.field("Rustc", info.rustc);
        self.field("Target", info.target);
    }
}
