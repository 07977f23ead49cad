//! Catalog lint pass.
//!
//! Unlike [`super::parse_catalog`], validation keeps going after a bad record
//! so every problem in the file is reported at once.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::DeviceRecord;
use crate::error::{Result, TkError};
use crate::profile::{DEFAULT_OS_BUCKET, expected_profile_count, os_bucket};

/// Severity level for catalog issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// The record cannot be used for generation.
    Error,
    /// The record is usable but probably not what was intended.
    Warning,
}

/// A single problem found in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogIssue {
    /// Zero-based position in the catalog array.
    pub index: usize,
    /// "Make Model", or "Unknown" when the record is too broken to tell.
    pub device: String,
    pub message: String,
    pub severity: IssueSeverity,
}

/// Per-device projection of what generation will produce.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSummary {
    pub index: usize,
    pub device: String,
    pub profile_count: usize,
}

/// Result of validating a catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub valid: bool,
    pub device_count: usize,
    pub total_profiles: usize,
    pub devices: Vec<DeviceSummary>,
    pub issues: Vec<CatalogIssue>,
}

impl CatalogReport {
    fn push(&mut self, index: usize, device: &str, severity: IssueSeverity, message: String) {
        if severity == IssueSeverity::Error {
            self.valid = false;
        }
        self.issues.push(CatalogIssue {
            index,
            device: device.to_string(),
            message,
            severity,
        });
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }
}

/// Validates catalog JSON text record by record.
///
/// Only a document that is not a JSON array at all is a hard error.
#[instrument(skip_all)]
pub fn validate_catalog(contents: &str) -> Result<CatalogReport> {
    let entries: Vec<Value> =
        serde_json::from_str(contents).map_err(|e| TkError::CatalogParse(e.to_string()))?;

    let mut report = CatalogReport {
        valid: true,
        device_count: entries.len(),
        total_profiles: 0,
        devices: Vec::new(),
        issues: Vec::new(),
    };
    let mut seen: HashMap<(String, String), usize> = HashMap::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let label = entry_label(&entry);
        let device: DeviceRecord = match serde_json::from_value(entry) {
            Ok(device) => device,
            Err(e) => {
                warn!(index, device = %label, error = %e, "Invalid catalog entry");
                report.push(index, &label, IssueSeverity::Error, e.to_string());
                continue;
            }
        };

        for (axis, size) in device.axis_sizes() {
            if size == 0 {
                report.push(
                    index,
                    &label,
                    IssueSeverity::Warning,
                    format!("'{axis}' is empty; this device will produce no profiles"),
                );
            }
        }

        for os in &device.supported_os {
            if os_bucket(os) == DEFAULT_OS_BUCKET {
                report.push(
                    index,
                    &label,
                    IssueSeverity::Warning,
                    format!("OS '{os}' has no dedicated directory and will be stored under '{DEFAULT_OS_BUCKET}'"),
                );
            }
        }

        let key = (device.make.to_lowercase(), device.model.to_lowercase());
        if let Some(first) = seen.get(&key) {
            report.push(
                index,
                &label,
                IssueSeverity::Warning,
                format!("duplicate of entry {first}; generated ids will collide and overwrite"),
            );
        } else {
            seen.insert(key, index);
        }

        let profile_count = expected_profile_count(&device);
        debug!(index, device = %label, profile_count, "Validated catalog entry");
        report.total_profiles += profile_count;
        report.devices.push(DeviceSummary {
            index,
            device: label,
            profile_count,
        });
    }

    Ok(report)
}

fn entry_label(entry: &Value) -> String {
    let field = |name: &str| entry.get(name).and_then(Value::as_str).unwrap_or("Unknown");
    format!("{} {}", field("make"), field("model"))
}
