//! Batch export: query the store, then export every match.
//!
//! One failing profile never aborts the batch. The run always ends with a
//! `<successes>/<attempted>` count.

mod driver;

pub use driver::{BatchExport, BatchFailure, BatchProgress, BatchReport, OutputLayout};
