//! Command-line surface of `hoist`.
//!
//! Push flags stay as raw strings and numbers here; `commands::push` turns
//! them into validated per-app parameters.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "hoist",
    bin_name = "hoist",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Push applications to a platform",
    long_about = "Hoist creates or updates applications, maps their routes, \
                  uploads their bits, binds services and (re)starts them.",
    after_help = "EXAMPLES:\n\
        \x20 hoist push my-app\n\
        \x20 hoist push my-app -m 512M -i 2 -n www -d example.com\n\
        \x20 hoist push -f deploy/manifest.yml\n\
        \x20 hoist completions bash > /usr/share/bash-completion/completions/hoist",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Push a new app or sync changes to an existing app.
    #[command(
        visible_alias = "p",
        about = "Push a new app or sync changes to an existing app",
        after_help = "EXAMPLES:\n\
            \x20 hoist push web                      # manifest.yml in the current directory, if any\n\
            \x20 hoist push web --no-manifest -p ./dist\n\
            \x20 hoist push worker --no-route -c 'bin/worker'\n\
            \x20 hoist push web --random-route --no-start"
    )]
    Push(PushArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 hoist completions bash > ~/.local/share/bash-completion/completions/hoist\n\
            \x20 hoist completions zsh  > ~/.zfunc/_hoist\n\
            \x20 hoist completions fish > ~/.config/fish/completions/hoist.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Hoist configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 hoist config get target.space_name\n\
            \x20 hoist config list\n\
            \x20 hoist config path"
    )]
    Config(ConfigCommands),
}

// ── push ──────────────────────────────────────────────────────────────────────

/// Arguments for `hoist push`.
///
/// Quantities and counts stay as raw text here; they are validated when
/// turned into application parameters.
#[derive(Debug, Default, Args)]
pub struct PushArgs {
    /// App name. Required unless the manifest names the app(s).
    #[arg(value_name = "APP", help = "App name")]
    pub name: Option<String>,

    #[arg(
        short = 'b',
        value_name = "BUILDPACK",
        help = "Custom buildpack URL ('null' or 'default' resets it)"
    )]
    pub buildpack: Option<String>,

    #[arg(
        short = 'c',
        value_name = "COMMAND",
        allow_hyphen_values = true,
        help = "Startup command ('null' or 'default' resets it)"
    )]
    pub command: Option<String>,

    #[arg(short = 'd', value_name = "DOMAIN", help = "Domain (e.g. example.com)")]
    pub domain: Option<String>,

    #[arg(
        short = 'f',
        value_name = "MANIFEST",
        conflicts_with = "no_manifest",
        help = "Path to manifest"
    )]
    pub manifest: Option<PathBuf>,

    #[arg(
        short = 'i',
        value_name = "INSTANCES",
        allow_negative_numbers = true,
        help = "Number of instances"
    )]
    pub instances: Option<i64>,

    #[arg(short = 'k', value_name = "DISK", help = "Disk limit (e.g. 256M, 1024M, 1G)")]
    pub disk: Option<String>,

    #[arg(
        short = 'm',
        value_name = "MEMORY",
        help = "Memory limit (e.g. 256M, 1024M, 1G)"
    )]
    pub memory: Option<String>,

    #[arg(short = 'n', value_name = "HOST", help = "Hostname (e.g. my-subdomain)")]
    pub host: Option<String>,

    #[arg(short = 'p', value_name = "PATH", help = "Path of app directory or file")]
    pub path: Option<PathBuf>,

    #[arg(short = 's', value_name = "STACK", help = "Stack to use")]
    pub stack: Option<String>,

    #[arg(
        short = 't',
        value_name = "TIMEOUT",
        help = "Start timeout in seconds"
    )]
    pub timeout: Option<String>,

    /// Map the root domain to this app.
    #[arg(long = "no-hostname", help = "Map the root domain to this app")]
    pub no_hostname: bool,

    #[arg(long = "no-manifest", help = "Ignore manifest file")]
    pub no_manifest: bool,

    #[arg(long = "no-route", help = "Do not map a route to this app")]
    pub no_route: bool,

    #[arg(long = "no-start", help = "Do not start an app after pushing")]
    pub no_start: bool,

    #[arg(long = "random-route", help = "Create a random route for this app")]
    pub random_route: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `hoist completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `hoist config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `target.space_name`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
