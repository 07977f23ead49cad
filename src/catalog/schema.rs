//! Data types for the device catalog.
//!
//! The catalog is a JSON array of device records:
//!
//! ```json
//! [{
//!   "make": "Lenovo",
//!   "model": "ThinkPad T480",
//!   "year": 2018,
//!   "form_factor": "Laptop",
//!   "supported_os": ["Windows 10", "Windows 11"],
//!   "cpu_options": [{ "name": "i5-8250U", "cores": 4 }],
//!   "ram_options": [8192, 16384],
//!   "storage_options": [256, 512],
//!   "gpu_options": [{ "name": "UHD 620", "vram": 0 }],
//!   "resolution_options": ["1920x1080"]
//! }]
//! ```
//!
//! Every option-set key is required. An empty option-set is accepted and
//! yields zero profiles for that device.

use serde::{Deserialize, Serialize};

/// One catalog entry: a make/model and its axes of variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub make: String,
    pub model: String,
    pub year: u32,
    pub form_factor: String,
    pub supported_os: Vec<String>,
    pub cpu_options: Vec<CpuOption>,
    pub ram_options: Vec<u32>,
    pub storage_options: Vec<u32>,
    pub gpu_options: Vec<GpuOption>,
    pub resolution_options: Vec<String>,
}

impl DeviceRecord {
    /// "Make Model" label used in logs and reports.
    pub fn label(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    /// Sizes of the six device-specific axes, in enumeration order.
    pub fn axis_sizes(&self) -> [(&'static str, usize); 6] {
        [
            ("supported_os", self.supported_os.len()),
            ("cpu_options", self.cpu_options.len()),
            ("ram_options", self.ram_options.len()),
            ("storage_options", self.storage_options.len()),
            ("gpu_options", self.gpu_options.len()),
            ("resolution_options", self.resolution_options.len()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuOption {
    pub name: String,
    pub cores: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuOption {
    pub name: String,
    #[serde(rename = "vram", alias = "vram_mb")]
    pub vram_mb: u32,
}
