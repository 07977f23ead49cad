//! Profile records as written to the store.
//!
//! Field order here is the on-disk key order, so regenerating a profile
//! reproduces the same bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One fully-specified hardware/software/environment combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub metadata: ProfileMetadata,
    pub hardware: Hardware,
    pub environment: Environment,
    pub software: Software,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub make: String,
    pub model: String,
    pub year: u32,
    pub os_target: String,
    pub form_factor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hardware {
    pub cpu_cores: u32,
    pub cpu_name: String,
    pub ram_mb: u32,
    pub storage_gb: u32,
    pub gpu_name: String,
    pub gpu_vram_mb: u32,
    pub screen_resolution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub accessibility_mode: AccessibilityMode,
    pub boot_mode: BootMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    pub primary_browser: Browser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessibilityMode {
    Standard,
    #[serde(rename = "High Contrast")]
    HighContrast,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BootMode {
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
    #[serde(rename = "Internet Explorer")]
    InternetExplorer,
}

impl AccessibilityMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::HighContrast => "High Contrast",
        }
    }
}

impl Browser {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Firefox => "Firefox",
            Self::Edge => "Edge",
            Self::InternetExplorer => "Internet Explorer",
        }
    }
}

impl fmt::Display for AccessibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
