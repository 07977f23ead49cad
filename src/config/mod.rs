//! Configuration for TestKit.
//!
//! Settings come from an optional TOML file; paths inside it are resolved
//! relative to the file itself.

mod path;
mod settings;

pub use path::{PathResolver, default_config_path, home_dir, resolve_path};
pub use settings::Settings;
