//! Common test utilities for the TestKit CLI.
//!
//! - `cli`: CLI runner with output verification and fluent assertions
//! - `fixtures`: Temporary workspaces with a catalog and generated profiles
//! - `assertions`: Output and JSON assertion helpers

pub mod cli;
pub mod fixtures;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
