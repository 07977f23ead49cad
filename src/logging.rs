//! Structured logging initialization for the TestKit CLI.
//!
//! Logs always go to stderr so stdout stays reserved for command output,
//! which robot mode callers parse as a single JSON document.

use std::io::{self, IsTerminal};

use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// JSON lines, one event per line.
    Json,
    /// Colored output for an interactive terminal.
    Pretty,
    /// Plain compact lines for pipes and files.
    Compact,
}

impl LogStyle {
    /// | Mode  | stderr TTY | Style   |
    /// |-------|------------|---------|
    /// | Robot | any        | Json    |
    /// | Human | yes        | Pretty  |
    /// | Human | no         | Compact |
    pub const fn select(robot_mode: bool, stderr_is_tty: bool) -> Self {
        match (robot_mode, stderr_is_tty) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Compact,
        }
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr);

        match self {
            Self::Json => base.json().with_target(true).boxed(),
            Self::Pretty => base.with_target(false).boxed(),
            Self::Compact => base.with_ansi(false).with_target(false).compact().boxed(),
        }
    }
}

/// Default filter directive for the verbosity flags.
///
/// `--quiet` wins over any number of `-v`.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "testkit=error";
    }
    match verbose {
        0 => "testkit=info",
        1 => "testkit=debug",
        _ => "testkit=trace",
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` replaces the default directive entirely when set, e.g.
/// `RUST_LOG=testkit::batch=trace`. A second call is a no-op.
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));
    let style = LogStyle::select(robot_mode, io::stderr().is_terminal());

    let _ = tracing_subscriber::registry()
        .with(style.layer())
        .with(filter)
        .try_init();
}
