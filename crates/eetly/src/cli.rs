//! Clap derive structures for the `eetly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eetly -- household meal schedules from the command line
#[derive(Debug, Parser)]
#[command(
    name = "eetly",
    version,
    about = "Check who is cooking, who is eating, and what to buy",
    long_about = "A CLI for Eetlijst household meal schedules.\n\n\
        Every view comes from one consistent refresh of the household:\n\
        info, today, the shopping list, and a seven-day forecast.",
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
    /// Household profile to use
    #[arg(long, short = 'p', env = "EETLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// GraphQL endpoint (overrides profile)
    #[arg(long, short = 'e', env = "EETLY_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Household bearer token (overrides profile)
    #[arg(long, env = "EETLY_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EETLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "EETLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Show resident balances (overrides profile)
    #[arg(long, global = true)]
    pub show_balance: bool,

    /// Show the status bucket used for pictures (overrides profile)
    #[arg(long, global = true)]
    pub custom_pictures: bool,

    /// Show guest counts next to names and statuses (overrides profile)
    #[arg(long, global = true)]
    pub resident_units: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
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
    /// Household name, address, residents, and balances
    Info,

    /// Who cooks, who eats, and what is for dinner today
    #[command(alias = "t")]
    Today,

    /// Unchecked shopping-list items
    #[command(alias = "ls", alias = "shopping")]
    List,

    /// Seven-day attendance forecast per resident
    #[command(alias = "fc")]
    Forecast(ForecastArgs),

    /// Keep polling and print each new snapshot
    Watch(WatchArgs),

    /// Verify that the configured token is accepted
    Check,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VIEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Only show this resident (name, case-insensitive, or id)
    pub resident: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refresh cycles (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile
    ///
    /// Display flags given alongside (`--show-balance`, `--custom-pictures`,
    /// `--resident-units`) become the profile's defaults.
    Init(InitArgs),

    /// Display current resolved configuration (tokens masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a token in the system keyring (read from the terminal)
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Profile name
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Read the token from this environment variable instead of storing it
    #[arg(long)]
    pub token_env: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
