//! Field extraction shared by every renderer.
//!
//! Each value is found through an explicit primary/fallback path pair so
//! profiles from older generators (flat `make`, `os`, `hardware.cpu_count`)
//! still export. Missing values become placeholders; extraction only fails
//! when the document is not an object at all.

use serde_json::Value;

use crate::error::{Result, TkError};
use crate::query::{self, FieldPath, display_value, resolve, resolve_text};

/// Used when a profile has no id.
pub const UNKNOWN_ID: &str = "unknown";
/// RAM assumed by renderers that need a number.
pub const DEFAULT_RAM_MB: u64 = 2048;
/// CPU count assumed by renderers that need a number.
pub const DEFAULT_CPU_CORES: u64 = 2;
/// Disk size assumed by renderers that need a number.
pub const DEFAULT_STORAGE_GB: u64 = 64;

pub const CPU_CORES: FieldPath = FieldPath {
    primary: &["hardware", "cpu_cores"],
    fallback: &["hardware", "cpu_count"],
};

pub const RAM_MB: FieldPath = FieldPath {
    primary: &["hardware", "ram_mb"],
    fallback: &["ram_mb"],
};

pub const STORAGE_GB: FieldPath = FieldPath {
    primary: &["hardware", "storage_gb"],
    fallback: &["storage_gb"],
};

pub const GPU_VRAM_MB: FieldPath = FieldPath {
    primary: &["hardware", "gpu_vram_mb"],
    fallback: &["gpu_vram_mb"],
};

pub const SCREEN_RESOLUTION: FieldPath = FieldPath {
    primary: &["hardware", "screen_resolution"],
    fallback: &["screen_resolution"],
};

/// A numeric profile field as found, plus its parsed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberField {
    /// Verbatim text of the stored value ("" when absent).
    pub text: String,
    /// Parsed value, if the stored value is a non-negative integer.
    pub value: Option<u64>,
}

impl NumberField {
    fn resolve(doc: &Value, field: FieldPath) -> Self {
        match resolve(doc, field) {
            Some(v) => Self {
                text: display_value(v),
                value: v
                    .as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok())),
            },
            None => Self::default(),
        }
    }

    /// Parsed value, or `default` when absent or not a number.
    pub fn or(&self, default: u64) -> u64 {
        self.value.unwrap_or(default)
    }

    /// Stored text as written, or `default` when the field is absent.
    ///
    /// Used wherever a template carries the value as a string, so values
    /// like `"8GB"` pass through untouched.
    pub fn text_or(&self, default: u64) -> String {
        if self.text.is_empty() {
            default.to_string()
        } else {
            self.text.clone()
        }
    }
}

/// Everything a renderer may substitute into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub id: String,
    pub make: String,
    pub model: String,
    pub os_target: String,
    pub cpu_cores: NumberField,
    pub ram_mb: NumberField,
    pub storage_gb: NumberField,
    pub gpu_vram_mb: NumberField,
    pub screen_resolution: String,
}

impl ProfileFields {
    /// Pulls renderer inputs out of a profile document.
    pub fn extract(doc: &Value) -> Result<Self> {
        if !doc.is_object() {
            return Err(TkError::ProfileNotObject);
        }

        let id = resolve_text(doc, query::ID);
        Ok(Self {
            id: if id.is_empty() { UNKNOWN_ID.to_string() } else { id },
            make: resolve_text(doc, query::MAKE),
            model: resolve_text(doc, query::MODEL),
            os_target: resolve_text(doc, query::OS),
            cpu_cores: NumberField::resolve(doc, CPU_CORES),
            ram_mb: NumberField::resolve(doc, RAM_MB),
            storage_gb: NumberField::resolve(doc, STORAGE_GB),
            gpu_vram_mb: NumberField::resolve(doc, GPU_VRAM_MB),
            screen_resolution: resolve_text(doc, SCREEN_RESOLUTION),
        })
    }

    /// Width and height from a `WIDTHxHEIGHT` resolution string.
    pub fn resolution_dimensions(&self) -> Option<(u32, u32)> {
        let (w, h) = self.screen_resolution.split_once(['x', 'X'])?;
        Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
    }

    /// The id in identifier-safe form (`-` becomes `_`).
    pub fn ident(&self) -> String {
        self.id.replace('-', "_")
    }
}
