//! TestKit library - hardware/software test matrix generation and export.
//!
//! This library exposes the core functionality of the `testkit` CLI for use in
//! tests and other applications.
//!
//! # Modules
//!
//! - `catalog`: Device catalog loading, validation and SQLite replica
//! - `profile`: Profile data model and combinatorial generator
//! - `store`: File-backed profile store partitioned by OS
//! - `query`: Free-text search and structured filtering
//! - `export`: Per-format renderers and launch scripts
//! - `batch`: Filter-then-export driver with partial-failure tolerance
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
//! - `config`: Settings file handling
#![forbid(unsafe_code)]

pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod output;
pub mod profile;
pub mod query;
pub mod store;
pub mod theme;
