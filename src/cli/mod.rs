//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use crate::batch::OutputLayout;
use crate::config::Settings;
use crate::export::ExportFormat;

/// TestKit - hardware/software test matrix generator and exporter.
///
/// Robot Mode: Use --robot or --output-format json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "testkit", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        default_value = "text",
        global = true,
        env = "TESTKIT_FORMAT"
    )]
    pub output_format: OutputFormat,

    /// Robot mode: equivalent to --output-format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Settings file (TOML)
    #[arg(long, global = true, value_name = "PATH", env = "TESTKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit json format).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.output_format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Catalog ===
    /// Expand the device catalog into the profile store
    Generate(GenerateArgs),

    /// Check the device catalog without generating anything
    Validate(ValidateArgs),

    /// Copy the device catalog into the SQLite replica
    Migrate(MigrateArgs),

    // === Profiles ===
    /// Export one profile to a deployment format
    Export(ExportArgs),

    /// Export every profile matching a filter
    Batch(BatchArgs),

    /// Search profiles by free text or a single field
    Search(SearchArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Device catalog (JSON array)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Profile store root
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Device catalog (JSON array)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Exit non-zero on warnings too
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Device catalog (JSON array)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// SQLite database (created if missing, rows are appended)
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,
}

/// Arguments for exporting a single profile.
///
/// # Examples
///
/// ```bash
/// testkit export --profile profiles/win10/lenovo-t480-windows-10-v1.json --format wsb
/// testkit export --id lenovo-t480-windows-10-v1 --format docker --output out/
/// ```
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["profile", "id"])))]
pub struct ExportArgs {
    /// Profile JSON file
    #[arg(long, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Profile id, looked up in the profile store
    #[arg(long)]
    pub id: Option<String>,

    /// Export format
    #[arg(long, short = 'f')]
    pub format: ExportFormat,

    /// Output directory
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Profile store root (for --id)
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,
}

/// Arguments for batch export.
///
/// # Examples
///
/// ```bash
/// # Every Dell profile targeting Windows 7, as Vagrantfiles
/// testkit batch --format vagrant --make dell --os "windows 7"
///
/// # First 10 matches only, each in its own directory
/// testkit batch --format docker --limit 10 --per-profile-dirs
///
/// # Preview the selection
/// testkit batch --format wsb --make lenovo --dry-run
/// ```
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Export format
    #[arg(long, short = 'f')]
    pub format: ExportFormat,

    /// Output directory
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Only profiles whose make contains this text (case-insensitive)
    #[arg(long)]
    pub make: Option<String>,

    /// Only profiles whose OS contains this text (case-insensitive)
    #[arg(long)]
    pub os: Option<String>,

    /// Export at most this many matches, in scan order (0 means no limit)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Write each profile into <output>/<id>/ with its own launch scripts
    #[arg(long)]
    pub per_profile_dirs: bool,

    /// Show which profiles would be exported without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Profile store root
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,
}

impl BatchArgs {
    pub const fn layout(&self) -> OutputLayout {
        if self.per_profile_dirs {
            OutputLayout::PerProfile
        } else {
            OutputLayout::Flat
        }
    }
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive substring)
    pub query: String,

    /// Match only this top-level field (no metadata fallback)
    #[arg(long)]
    pub field: Option<String>,

    /// Print at most this many matches
    #[arg(long)]
    pub limit: Option<usize>,

    /// Profile store root
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

/// Path flags that override loaded settings.
#[derive(Debug, Default)]
pub struct SettingsOverrides {
    pub catalog: Option<PathBuf>,
    pub profiles_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

impl SettingsOverrides {
    /// Applies every flag that was given.
    pub fn apply(self, mut settings: Settings) -> Settings {
        if let Some(catalog) = self.catalog {
            settings.catalog = catalog;
        }
        if let Some(dir) = self.profiles_dir {
            settings.profiles_dir = dir;
        }
        if let Some(database) = self.database {
            settings.database = database;
        }
        settings
    }
}

impl Commands {
    /// Path overrides carried by this command's flags.
    pub fn overrides(&self) -> SettingsOverrides {
        match self {
            Self::Generate(args) => SettingsOverrides {
                catalog: args.catalog.clone(),
                profiles_dir: args.profiles_dir.clone(),
                ..SettingsOverrides::default()
            },
            Self::Validate(args) => SettingsOverrides {
                catalog: args.catalog.clone(),
                ..SettingsOverrides::default()
            },
            Self::Migrate(args) => SettingsOverrides {
                catalog: args.catalog.clone(),
                database: args.database.clone(),
                ..SettingsOverrides::default()
            },
            Self::Export(args) => SettingsOverrides {
                profiles_dir: args.profiles_dir.clone(),
                ..SettingsOverrides::default()
            },
            Self::Batch(args) => SettingsOverrides {
                profiles_dir: args.profiles_dir.clone(),
                ..SettingsOverrides::default()
            },
            Self::Search(args) => SettingsOverrides {
                profiles_dir: args.profiles_dir.clone(),
                ..SettingsOverrides::default()
            },
            Self::Version | Self::Completions(_) => SettingsOverrides::default(),
        }
    }
}
