//! Clap derive structures for the `coronatracker` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// coronatracker -- COVID-19 statistics in your terminal
#[derive(Debug, Parser)]
#[command(
    name = "coronatracker",
    version,
    about = "Track COVID-19 statistics from the command line",
    long_about = "Worldwide and per-country COVID-19 totals, served from a local cache \
        and refreshed from the statistics API when stale.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Statistics API root URL
    #[arg(long, env = "CORONATRACKER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Country for the local summary
    #[arg(long, short = 'c', env = "CORONATRACKER_COUNTRY", global = true)]
    pub country: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Fetch even if cached data is fresh
    #[arg(long, short = 'f', global = true)]
    pub force: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CORONATRACKER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show worldwide totals
    #[command(alias = "g")]
    Global,

    /// Show totals for one country
    #[command(alias = "l")]
    Local(LocalArgs),

    /// List known countries
    Countries(CountriesArgs),

    /// Keep refreshing a summary on an interval
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct LocalArgs {
    /// Country name (defaults to the configured country)
    pub country: Option<String>,

    /// Resolve the country by ISO code or case-insensitive name first
    #[arg(long)]
    pub lookup: bool,
}

#[derive(Debug, Args)]
pub struct CountriesArgs {
    /// Show only the country matching this name or ISO code
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes
    #[arg(long, short = 'i', default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Stop after this many refreshes
    #[arg(long, short = 'n')]
    pub count: Option<u32>,

    /// Watch worldwide totals instead of the local country
    #[arg(long, short = 'g')]
    pub global: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        overwrite: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value
    Set {
        /// Config key: api_url, country, timeout, refresh_threshold, output
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
