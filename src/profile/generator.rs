//! Cartesian expansion of device records into profiles.
//!
//! Axes are enumerated in this order, the last varying fastest:
//!
//! ```text
//! supported_os × cpu × ram × storage × gpu × resolution × accessibility × browser
//! ```
//!
//! The 1-based position of a combination in that order is its ordinal, which
//! is what makes ids unique within a device.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::schema::{
    AccessibilityMode, BootMode, Browser, Environment, Hardware, Profile, ProfileMetadata,
    Software,
};
use crate::catalog::DeviceRecord;
use crate::error::Result;
use crate::store::{ProfileStore, WriteOutcome, WriteStatus};

/// Accessibility axis, identical for every device.
pub const ACCESSIBILITY_MODES: [AccessibilityMode; 2] =
    [AccessibilityMode::Standard, AccessibilityMode::HighContrast];

/// Browsers offered on every device.
pub const BASE_BROWSERS: [Browser; 3] = [Browser::Chrome, Browser::Firefox, Browser::Edge];

/// Added to the browser axis when the device supports a legacy OS.
pub const LEGACY_BROWSER: Browser = Browser::InternetExplorer;

/// Operating systems that pull in [`LEGACY_BROWSER`].
pub const LEGACY_OS: [&str; 2] = ["Windows XP", "Windows 7"];

/// OS name to store directory. Anything else lands in [`DEFAULT_OS_BUCKET`].
pub const OS_BUCKETS: [(&str, &str); 6] = [
    ("Windows XP", "xp"),
    ("Windows 7", "win7"),
    ("Windows 8", "win8"),
    ("Windows 8.1", "win8"),
    ("Windows 10", "win10"),
    ("Windows 11", "win11"),
];

pub const DEFAULT_OS_BUCKET: &str = "other";

const AXES: usize = 8;

/// Store directory for an OS target.
pub fn os_bucket(os_name: &str) -> &'static str {
    OS_BUCKETS
        .iter()
        .find(|(name, _)| *name == os_name)
        .map_or(DEFAULT_OS_BUCKET, |(_, bucket)| bucket)
}

/// Builds a profile id: `lenovo-thinkpad-t480-windows-10-v1`.
///
/// Lowercased, spaces become hyphens, periods are dropped.
pub fn profile_id(make: &str, model: &str, os_name: &str, ordinal: usize) -> String {
    format!("{make}-{model}-{os_name}-v{ordinal}")
        .to_lowercase()
        .replace(' ', "-")
        .replace('.', "")
}

/// Browser axis for a device, decided once from its whole OS list.
pub fn browser_options(device: &DeviceRecord) -> Vec<Browser> {
    let mut browsers = BASE_BROWSERS.to_vec();
    if device
        .supported_os
        .iter()
        .any(|os| LEGACY_OS.contains(&os.as_str()))
    {
        browsers.push(LEGACY_BROWSER);
    }
    browsers
}

/// Number of profiles [`expand_device`] will yield.
pub fn expected_profile_count(device: &DeviceRecord) -> usize {
    axis_sizes(device, browser_options(device).len())
        .iter()
        .product()
}

fn axis_sizes(device: &DeviceRecord, browser_count: usize) -> [usize; AXES] {
    [
        device.supported_os.len(),
        device.cpu_options.len(),
        device.ram_options.len(),
        device.storage_options.len(),
        device.gpu_options.len(),
        device.resolution_options.len(),
        ACCESSIBILITY_MODES.len(),
        browser_count,
    ]
}

/// Expands one device into every profile, in enumeration order.
///
/// A device with any empty axis yields nothing.
pub fn expand_device(device: &DeviceRecord) -> Vec<Profile> {
    let browsers = browser_options(device);
    Combinations::new(axis_sizes(device, browsers.len()))
        .enumerate()
        .map(|(i, digits)| build_profile(device, &browsers, digits, i + 1))
        .collect()
}

fn build_profile(
    device: &DeviceRecord,
    browsers: &[Browser],
    [os, cpu, ram, storage, gpu, resolution, access, browser]: [usize; AXES],
    ordinal: usize,
) -> Profile {
    let os_target = &device.supported_os[os];
    let cpu = &device.cpu_options[cpu];
    let gpu = &device.gpu_options[gpu];

    Profile {
        id: profile_id(&device.make, &device.model, os_target, ordinal),
        metadata: ProfileMetadata {
            make: device.make.clone(),
            model: device.model.clone(),
            year: device.year,
            os_target: os_target.clone(),
            form_factor: device.form_factor.clone(),
        },
        hardware: Hardware {
            cpu_cores: cpu.cores,
            cpu_name: cpu.name.clone(),
            ram_mb: device.ram_options[ram],
            storage_gb: device.storage_options[storage],
            gpu_name: gpu.name.clone(),
            gpu_vram_mb: gpu.vram_mb,
            screen_resolution: device.resolution_options[resolution].clone(),
        },
        environment: Environment {
            accessibility_mode: ACCESSIBILITY_MODES[access],
            boot_mode: BootMode::Normal,
        },
        software: Software {
            primary_browser: browsers[browser],
        },
    }
}

/// Mixed-radix odometer over axis indices, last axis fastest.
#[derive(Debug, Clone)]
struct Combinations {
    radices: [usize; AXES],
    digits: [usize; AXES],
    done: bool,
}

impl Combinations {
    fn new(radices: [usize; AXES]) -> Self {
        Self {
            radices,
            digits: [0; AXES],
            done: radices.contains(&0),
        }
    }
}

impl Iterator for Combinations {
    type Item = [usize; AXES];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.digits;
        for pos in (0..AXES).rev() {
            self.digits[pos] += 1;
            if self.digits[pos] < self.radices[pos] {
                return Some(current);
            }
            self.digits[pos] = 0;
        }
        self.done = true;
        Some(current)
    }
}

/// Counts from one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationSummary {
    pub devices: usize,
    pub profiles: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Profiles per store directory.
    pub by_bucket: BTreeMap<String, usize>,
}

impl GenerationSummary {
    fn record(&mut self, outcome: &WriteOutcome) {
        self.profiles += 1;
        match outcome.status {
            WriteStatus::Created => self.created += 1,
            WriteStatus::Updated => self.updated += 1,
            WriteStatus::Unchanged => self.unchanged += 1,
        }
        *self.by_bucket.entry(outcome.bucket.clone()).or_default() += 1;
    }
}

/// Writes the expansion of a whole catalog into a store.
#[derive(Debug)]
pub struct ProfileGenerator<'a> {
    store: &'a ProfileStore,
}

impl<'a> ProfileGenerator<'a> {
    pub const fn new(store: &'a ProfileStore) -> Self {
        Self { store }
    }

    /// Generates and writes every profile for every device.
    ///
    /// Stale profiles from earlier runs are left in place.
    pub fn run(&self, devices: &[DeviceRecord]) -> Result<GenerationSummary> {
        self.run_with_progress(devices, |_| {})
    }

    /// Like [`Self::run`], calling `on_profile` after each write.
    #[instrument(skip_all, fields(devices = devices.len(), root = %self.store.root().display()))]
    pub fn run_with_progress<F>(
        &self,
        devices: &[DeviceRecord],
        mut on_profile: F,
    ) -> Result<GenerationSummary>
    where
        F: FnMut(&WriteOutcome),
    {
        let mut summary = GenerationSummary {
            devices: devices.len(),
            ..GenerationSummary::default()
        };

        for device in devices {
            let profiles = expand_device(device);
            debug!(device = %device.label(), count = profiles.len(), "Expanded device");

            for profile in &profiles {
                let outcome = self.store.write(profile)?;
                summary.record(&outcome);
                on_profile(&outcome);
            }
        }

        info!(
            profiles = summary.profiles,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "Profile generation complete"
        );
        Ok(summary)
    }
}
