//! Profile data model and the combinatorial generator.

mod generator;
mod schema;

pub use generator::{
    ACCESSIBILITY_MODES, BASE_BROWSERS, DEFAULT_OS_BUCKET, GenerationSummary, LEGACY_BROWSER,
    LEGACY_OS, OS_BUCKETS, ProfileGenerator, browser_options, expand_device,
    expected_profile_count, os_bucket, profile_id,
};
pub use schema::{
    AccessibilityMode, BootMode, Browser, Environment, Hardware, Profile, ProfileMetadata,
    Software,
};
