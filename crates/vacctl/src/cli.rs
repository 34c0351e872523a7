//! Clap derive structures for the `vacctl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vacctl -- control and monitor Valetudo robot vacuums
#[derive(Debug, Parser)]
#[command(
    name = "vacctl",
    version,
    about = "Control Valetudo robot vacuums from the command line",
    long_about = "Query status and send commands to a Valetudo-flashed robot vacuum.\n\n\
        Speaks both the legacy flat-JSON API and the modern v2 attribute API;\n\
        select the legacy dialect with --legacy or `legacy-mode = true`.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "VACCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device IP or hostname (overrides profile)
    #[arg(long, env = "VACCTL_IP", global = true)]
    pub ip: Option<String>,

    /// Use the legacy firmware API
    #[arg(long, env = "VACCTL_LEGACY", global = true)]
    pub legacy: bool,

    /// Basic auth username (overrides profile)
    #[arg(long, short = 'u', env = "VACCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, env = "VACCTL_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VACCTL_OUTPUT",
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

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VACCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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

/// `on` / `off` argument for toggle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current device status
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Poll the device and print every status change until interrupted
    Watch,

    /// Start cleaning (or stop an active run with --off)
    Clean(SwitchArgs),

    /// Stop cleaning
    Stop,

    /// Pause cleaning
    Pause,

    /// Start spot cleaning
    Spot(SwitchArgs),

    /// Send the robot back to its dock
    #[command(alias = "dock")]
    Home,

    /// Play the locate sound
    #[command(alias = "locate")]
    Find,

    /// Switch the high-speed fan preset on or off
    HighSpeed(ToggleArgs),

    /// Switch the mop fan preset on or off
    Mop(ToggleArgs),

    /// Show the firmware version reported by the device
    Version,

    /// Inspect CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Bypass the cache and query the device
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Turn the operation off instead of on
    #[arg(long)]
    pub off: bool,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    #[arg(value_enum)]
    pub state: Toggle,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the loaded configuration (passwords masked)
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
