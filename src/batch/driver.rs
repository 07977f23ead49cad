//! Filter-then-export over the whole profile store.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::export::{ExportFormat, ExportPaths, ProfileFields, export_profile};
use crate::query::ProfileFilter;
use crate::store::{ProfileDoc, ProfileStore, ensure_safe_id};

/// Where each profile's export lands inside the output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// Every artifact in one directory; launch scripts are shared and the
    /// last exported profile's launchers win.
    #[default]
    Flat,
    /// `<output>/<id>/` per profile, each with its own launchers.
    PerProfile,
}

/// A profile that failed to export.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub id: String,
    pub path: Option<PathBuf>,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub format: ExportFormat,
    pub output_dir: PathBuf,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
    pub exported: Vec<ExportPaths>,
}

impl BatchReport {
    /// `<successes>/<attempted>`
    pub fn summary_line(&self) -> String {
        format!("{}/{}", self.succeeded, self.attempted)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Progress for one finished profile.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// 1-based position in the batch.
    pub position: usize,
    pub total: usize,
    pub id: &'a str,
    pub succeeded: bool,
}

/// Batch export job.
#[derive(Debug, Clone)]
pub struct BatchExport {
    pub format: ExportFormat,
    pub output_dir: PathBuf,
    pub filter: ProfileFilter,
    pub limit: Option<usize>,
    pub layout: OutputLayout,
}

impl BatchExport {
    pub fn new(format: ExportFormat, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format,
            output_dir: output_dir.into(),
            filter: ProfileFilter::default(),
            limit: None,
            layout: OutputLayout::Flat,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ProfileFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Filtered profiles in scan order, truncated to the limit.
    ///
    /// A limit of 0 means no limit.
    fn select(&self, store: &ProfileStore) -> Vec<ProfileDoc> {
        if !store.exists() {
            warn!(path = %store.root().display(), "Profile directory not found, run `testkit generate` first");
        }
        let mut docs = self.filter.apply(store.scan());
        if let Some(limit) = self.limit.filter(|&limit| limit > 0) {
            if docs.len() > limit {
                debug!(matched = docs.len(), limit, "Truncating to limit");
                docs.truncate(limit);
            }
        }
        docs
    }

    /// Ids that [`run`](Self::run) would attempt, without writing anything.
    pub fn plan(&self, store: &ProfileStore) -> Vec<String> {
        self.select(store).iter().map(display_id).collect()
    }

    pub fn run(&self, store: &ProfileStore) -> Result<BatchReport> {
        self.run_with_progress(store, |_| {})
    }

    /// Exports every selected profile, reporting each one to `on_progress`.
    ///
    /// Errors for one profile are logged and recorded; the batch continues and
    /// already-written artifacts stay in place.
    #[instrument(skip_all, fields(format = %self.format, output_dir = %self.output_dir.display()))]
    pub fn run_with_progress<F>(&self, store: &ProfileStore, mut on_progress: F) -> Result<BatchReport>
    where
        F: FnMut(&BatchProgress<'_>),
    {
        std::fs::create_dir_all(&self.output_dir)?;

        let docs = self.select(store);
        let total = docs.len();
        info!(total, "Starting batch export");

        let mut report = BatchReport {
            format: self.format,
            output_dir: self.output_dir.clone(),
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
            exported: Vec::new(),
        };

        for (index, doc) in docs.iter().enumerate() {
            report.attempted += 1;
            let id = display_id(doc);

            let succeeded = match self.export_one(doc) {
                Ok(paths) => {
                    report.succeeded += 1;
                    report.exported.push(paths);
                    true
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Failed to export profile");
                    report.failures.push(BatchFailure {
                        id: id.clone(),
                        path: doc.path.clone(),
                        error: e.to_string(),
                    });
                    false
                }
            };

            on_progress(&BatchProgress {
                position: index + 1,
                total,
                id: &id,
                succeeded,
            });
        }

        info!(summary = %report.summary_line(), "Batch export complete");
        Ok(report)
    }

    fn export_one(&self, doc: &ProfileDoc) -> Result<ExportPaths> {
        let dir = self.target_dir(doc)?;
        export_profile(doc, self.format, &dir)
    }

    fn target_dir(&self, doc: &ProfileDoc) -> Result<PathBuf> {
        match self.layout {
            OutputLayout::Flat => Ok(self.output_dir.clone()),
            OutputLayout::PerProfile => {
                let id = ProfileFields::extract(&doc.value)?.id;
                ensure_safe_id(&id)?;
                Ok(self.output_dir.join(id))
            }
        }
    }
}

/// Id for logs and reports, falling back to the file stem.
fn display_id(doc: &ProfileDoc) -> String {
    match doc.id() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => doc
            .path
            .as_deref()
            .and_then(Path::file_stem)
            .map_or_else(|| "<unknown>".to_string(), |s| s.to_string_lossy().into_owned()),
    }
}
