//! Profile search and filtering.
//!
//! Two lookup rules:
//!
//! - [`search`] without a field checks the file name first, then a blob built
//!   from make, model, OS and id, each resolved through [`FieldPath`]'s
//!   `metadata.*` then top-level fallback.
//! - [`search`] with a field only looks at that top-level key. A profile whose
//!   make lives under `metadata` is therefore invisible to `field = "make"`.
//!
//! Matching is case-insensitive substring containment everywhere, and results
//! keep scan order.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::store::{ProfileDoc, ScanEntry};

/// An ordered pair of candidate locations for one logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    /// Tried first, e.g. `["metadata", "make"]`.
    pub primary: &'static [&'static str],
    /// Tried when the primary is absent or empty, e.g. `["make"]`.
    pub fallback: &'static [&'static str],
}

pub const MAKE: FieldPath = FieldPath {
    primary: &["metadata", "make"],
    fallback: &["make"],
};

pub const MODEL: FieldPath = FieldPath {
    primary: &["metadata", "model"],
    fallback: &["model"],
};

pub const OS: FieldPath = FieldPath {
    primary: &["metadata", "os_target"],
    fallback: &["os"],
};

pub const ID: FieldPath = FieldPath {
    primary: &["id"],
    fallback: &["id"],
};

/// Walks a key path through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// Resolves a field: primary path if present and non-empty, else fallback.
pub fn resolve<'a>(value: &'a Value, field: FieldPath) -> Option<&'a Value> {
    lookup(value, field.primary)
        .filter(|v| !is_blank(v))
        .or_else(|| lookup(value, field.fallback).filter(|v| !is_blank(v)))
}

/// Resolves a field and renders it as text ("" when absent).
pub fn resolve_text(value: &Value, field: FieldPath) -> String {
    resolve(value, field).map(display_value).unwrap_or_default()
}

/// Renders a scalar without JSON quoting; containers fall back to JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Result of a search over one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchReport {
    /// Profile files visited.
    pub scanned: usize,
    /// Matching files, in scan order.
    pub matches: Vec<PathBuf>,
}

/// Searches scanned profiles for `query`.
///
/// Unreadable records are skipped and never match.
#[instrument(skip(scan))]
pub fn search<I>(scan: I, query: &str, field: Option<&str>) -> SearchReport
where
    I: IntoIterator<Item = ScanEntry>,
{
    let needle = query.to_lowercase();
    let mut report = SearchReport::default();

    for entry in scan {
        report.scanned += 1;

        if field.is_none() && contains_ci(entry.file_name(), &needle) {
            trace!(path = %entry.path.display(), "Matched on file name");
            report.matches.push(entry.path);
            continue;
        }

        let doc = match entry.load() {
            Ok(doc) => doc,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable profile");
                continue;
            }
        };

        let hit = match field {
            Some(name) => field_matches(&doc.value, name, &needle),
            None => contains_ci(&search_blob(&doc.value), &needle),
        };
        if hit {
            report.matches.push(entry.path);
        }
    }

    debug!(scanned = report.scanned, matches = report.matches.len(), "Search complete");
    report
}

/// Field mode: the named top-level key only, no metadata fallback.
fn field_matches(value: &Value, field: &str, needle_lower: &str) -> bool {
    let text = value.get(field).map(display_value).unwrap_or_default();
    contains_ci(&text, needle_lower)
}

/// "make model os id" with each part resolved through its fallback pair.
fn search_blob(value: &Value) -> String {
    [MAKE, MODEL, OS, ID]
        .iter()
        .map(|field| resolve_text(value, *field))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Structured make/OS filter used by batch export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    pub make: Option<String>,
    pub os: Option<String>,
}

impl ProfileFilter {
    pub fn new(make: Option<&str>, os: Option<&str>) -> Self {
        Self {
            make: make.map(str::to_string),
            os: os.map(str::to_string),
        }
    }

    /// True if the document passes every active filter.
    ///
    /// Blank filter strings are inactive.
    pub fn matches(&self, value: &Value) -> bool {
        field_passes(value, MAKE, self.make.as_deref())
            && field_passes(value, OS, self.os.as_deref())
    }

    /// Loads and filters scanned profiles, dropping any that fail to load.
    #[instrument(skip(self, scan), fields(make = ?self.make, os = ?self.os))]
    pub fn apply<I>(&self, scan: I) -> Vec<ProfileDoc>
    where
        I: IntoIterator<Item = ScanEntry>,
    {
        let mut matched = Vec::new();
        for entry in scan {
            match entry.load() {
                Ok(doc) if self.matches(&doc.value) => matched.push(doc),
                Ok(_) => {}
                Err(e) => debug!(error = %e, "Skipping unreadable profile"),
            }
        }
        debug!(matched = matched.len(), "Filter complete");
        matched
    }
}

fn field_passes(value: &Value, field: FieldPath, filter: Option<&str>) -> bool {
    match filter {
        Some(wanted) if !wanted.is_empty() => {
            contains_ci(&resolve_text(value, field), &wanted.to_lowercase())
        }
        _ => true,
    }
}

/// Convenience wrapper for [`ProfileFilter::apply`].
pub fn filter<I>(scan: I, make: Option<&str>, os: Option<&str>) -> Vec<ProfileDoc>
where
    I: IntoIterator<Item = ScanEntry>,
{
    ProfileFilter::new(make, os).apply(scan)
}
