//! Tracing subscriber setup for the `hoist` binary.
//!
//! The library crates emit spans around every platform call; this module
//! decides which of them reach stderr. `-v` shows reconciliation steps,
//! `-vv` adds the individual platform calls along with the module that made
//! them, `-vvv` shows everything. `RUST_LOG` replaces the computed filter.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Crates whose events are filtered by the verbosity flags.
const LOG_TARGETS: &[&str] = &["hoist", "hoist_core", "hoist_adapters"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    Quiet,
    Normal,
    Steps,
    Calls,
    Everything,
}

impl Verbosity {
    fn from_args(args: &GlobalArgs) -> Self {
        if args.quiet {
            return Self::Quiet;
        }
        match args.verbose {
            0 => Self::Normal,
            1 => Self::Steps,
            2 => Self::Calls,
            _ => Self::Everything,
        }
    }

    fn level(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Steps => "info",
            Self::Calls => "debug",
            Self::Everything => "trace",
        }
    }
}

fn directives(verbosity: Verbosity) -> String {
    let level = verbosity.level();
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Call once, before the first push step.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let verbosity = Verbosity::from_args(args);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(verbosity >= Verbosity::Calls)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}
