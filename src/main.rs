//! TestKit CLI - hardware/software test matrix generator and exporter.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;

use clap::{CommandFactory, Parser};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, instrument};

use testkit::batch::BatchExport;
use testkit::catalog::{CatalogDb, load_catalog, validate_catalog};
use testkit::cli::{
    BatchArgs, Cli, Commands, CompletionsArgs, ExportArgs, GenerateArgs, MigrateArgs, SearchArgs,
    ValidateArgs,
};
use testkit::config::Settings;
use testkit::error::{Result, TkError};
use testkit::export::export_file;
use testkit::logging::init_logging;
use testkit::output::{Output, OutputMode, VersionInfo};
use testkit::profile::{ProfileGenerator, expected_profile_count};
use testkit::query::{ProfileFilter, search};
use testkit::store::ProfileStore;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let output = OutputMode::from_cli(&cli).into_output();

    if let Err(e) = run(&cli, output.as_ref()) {
        output.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, output: &dyn Output) -> Result<()> {
    let Some(command) = &cli.command else {
        print_quick_start(cli);
        return Ok(());
    };

    match command {
        Commands::Version => return cmd_version(output),
        Commands::Completions(args) => return cmd_completions(args),
        _ => {}
    }

    let settings = command
        .overrides()
        .apply(Settings::load(cli.config.as_deref())?);
    debug!(?settings, "Effective settings");

    match command {
        Commands::Generate(args) => cmd_generate(cli, output, &settings, args),
        Commands::Validate(args) => cmd_validate(output, &settings, args),
        Commands::Migrate(args) => cmd_migrate(output, &settings, args),
        Commands::Export(args) => cmd_export(output, &settings, args),
        Commands::Batch(args) => cmd_batch(cli, output, &settings, args),
        Commands::Search(args) => cmd_search(output, &settings, args),
        Commands::Version | Commands::Completions(_) => Ok(()),
    }
}

// === Quick Start ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    commands: [(&'static str, &'static str); 6],
    output_modes: [&'static str; 3],
}

const QUICK_START: [(&str, &str); 6] = [
    ("testkit generate", "Expand db/laptops.json into profiles/"),
    ("testkit validate", "Lint the device catalog"),
    ("testkit search dell", "Find profiles by make, model, OS or id"),
    ("testkit export --id <ID> --format wsb", "Export one profile"),
    ("testkit batch --format docker --make hp --limit 5", "Export many profiles"),
    ("testkit migrate", "Copy the catalog into SQLite"),
];

fn print_quick_start(cli: &Cli) {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "testkit",
            version: build_info::VERSION,
            description: "Hardware/software test matrix generator and exporter",
            commands: QUICK_START,
            output_modes: [
                "--output-format=text (default)",
                "--robot or --output-format=json",
                "--output-format=json-compact",
            ],
        };
        if let Ok(json) = serde_json::to_string_pretty(&help) {
            println!("{json}");
        }
        return;
    }

    println!(
        "{} {} - test matrix generator\n",
        style("testkit").bold().cyan(),
        build_info::VERSION
    );
    println!("{}", style("QUICK START").bold().underlined());
    println!();
    for (command, what) in QUICK_START {
        println!("  {:<52} {what}", style(command).green());
    }
    println!();
    println!("Run {} for full help", style("testkit --help").yellow());
}

// === Progress ===

fn progress_bar(cli: &Cli, len: u64) -> ProgressBar {
    if cli.use_json() || cli.quiet || !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(template) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(template.progress_chars("=>-"));
    }
    pb
}

// === Catalog Commands ===

#[instrument(skip_all)]
fn cmd_generate(cli: &Cli, output: &dyn Output, settings: &Settings, _args: &GenerateArgs) -> Result<()> {
    let devices = load_catalog(&settings.catalog)?;
    let store = ProfileStore::new(&settings.profiles_dir);

    let total: usize = devices.iter().map(expected_profile_count).sum();
    let pb = progress_bar(cli, total as u64);
    let summary = ProfileGenerator::new(&store).run_with_progress(&devices, |outcome| {
        pb.set_message(outcome.id.clone());
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    output.generation(&summary, store.root());
    Ok(())
}

fn cmd_validate(output: &dyn Output, settings: &Settings, args: &ValidateArgs) -> Result<()> {
    let path = &settings.catalog;
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            TkError::CatalogNotFound {
                path: path.display().to_string(),
            }
        } else {
            TkError::Io(e)
        }
    })?;

    let report = validate_catalog(&contents)?;
    output.catalog_report(&report, path);

    if !report.valid {
        return Err(TkError::CatalogParse(format!(
            "{} invalid device record(s)",
            report.error_count()
        )));
    }
    if args.strict && report.warning_count() > 0 {
        return Err(TkError::Other(format!(
            "{} warning(s) in strict mode",
            report.warning_count()
        )));
    }
    Ok(())
}

fn cmd_migrate(output: &dyn Output, settings: &Settings, _args: &MigrateArgs) -> Result<()> {
    let devices = load_catalog(&settings.catalog)?;
    let mut db = CatalogDb::open(&settings.database)?;
    let summary = db.migrate(&devices)?;
    output.migration(&summary, &settings.database);
    Ok(())
}

// === Profile Commands ===

fn cmd_export(output: &dyn Output, settings: &Settings, args: &ExportArgs) -> Result<()> {
    let profile_path = match (&args.profile, &args.id) {
        (Some(path), _) => path.clone(),
        (None, Some(id)) => {
            let store = ProfileStore::new(&settings.profiles_dir);
            store.require_exists()?;
            store.find(id).ok_or_else(|| TkError::ProfileNotFound { path: id.clone() })?
        }
        (None, None) => return Err(TkError::Other("Pass --profile or --id".to_string())),
    };

    let out_dir = args.output.as_ref().unwrap_or(&settings.export_dir);
    let paths = export_file(&profile_path, args.format, out_dir)?;
    output.exported(&paths);
    Ok(())
}

#[instrument(skip_all, fields(format = %args.format))]
fn cmd_batch(cli: &Cli, output: &dyn Output, settings: &Settings, args: &BatchArgs) -> Result<()> {
    let store = ProfileStore::new(&settings.profiles_dir);
    let out_dir = args.output.clone().unwrap_or_else(|| settings.batch_dir.clone());

    let job = BatchExport::new(args.format, out_dir)
        .with_filter(ProfileFilter::new(args.make.as_deref(), args.os.as_deref()))
        .with_limit(args.limit)
        .with_layout(args.layout());

    if args.dry_run {
        let ids = job.plan(&store);
        output.batch_plan(args.format, &ids);
        return Ok(());
    }

    let pb = progress_bar(cli, 0);
    let report = job.run_with_progress(&store, |progress| {
        pb.set_length(progress.total as u64);
        pb.set_message(progress.id.to_string());
        pb.set_position(progress.position as u64);
    })?;
    pb.finish_and_clear();

    output.batch_report(&report);
    Ok(())
}

fn cmd_search(output: &dyn Output, settings: &Settings, args: &SearchArgs) -> Result<()> {
    let store = ProfileStore::new(&settings.profiles_dir);
    store.require_exists()?;

    let report = search(store.scan(), &args.query, args.field.as_deref());
    let display_limit = args.limit.unwrap_or(settings.search_display_limit);
    output.search_results(&args.query, &report, display_limit);
    Ok(())
}

// === Utilities ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(output: &dyn Output) -> Result<()> {
    output.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty(),
        build_timestamp: build_info::build_timestamp(),
        rustc: build_info::rustc_semver(),
        target: build_info::target(),
    });
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn cmd_completions(args: &CompletionsArgs) -> Result<()> {
    clap_complete::generate(args.shell, &mut Cli::command(), "testkit", &mut io::stdout());
    Ok(())
}
