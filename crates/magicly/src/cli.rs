//! Clap derive structures for the `magicly` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// magicly -- monitor and control a MagicInfo display fleet
#[derive(Debug, Parser)]
#[command(
    name = "magicly",
    version,
    about = "Monitor and control MagicInfo display fleets from the command line",
    long_about = "Polls a Samsung MagicInfo server for display state and applies\n\
        display settings with write confirmation.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "MAGICLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// MagicInfo server URL (overrides profile)
    #[arg(long, short = 's', env = "MAGICLY_SERVER", global = true)]
    pub server: Option<String>,

    /// Username (overrides profile)
    #[arg(long, short = 'u', env = "MAGICLY_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (overrides profile and keyring)
    #[arg(long, env = "MAGICLY_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MAGICLY_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MAGICLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MAGICLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Fleet-wide counters (connected, disconnected, warnings, errors)
    Stats,

    /// List and inspect monitored displays
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Change one display setting and wait for the device to confirm it
    #[command(alias = "set")]
    Control(ControlArgs),

    /// Apply a JSON list of setting changes in order
    ControlBatch(ControlBatchArgs),

    /// Poll the fleet repeatedly and print each listing
    Watch(WatchArgs),

    /// Measure TCP reachability of the server
    Ping,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List monitored displays
    #[command(alias = "ls")]
    List {
        /// Restrict the listing to these device ids
        #[arg(long = "id", value_name = "DEVICE_ID")]
        ids: Vec<String>,
    },

    /// Show one display with its properties and controls
    Get {
        /// Device id
        device: String,
    },

    /// Show the device type catalog reported by the server
    Types,
}

// ── Control ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ControlArgs {
    /// Device id
    pub device: String,

    /// Property name, bare (`Volume`) or grouped (`Sound#Volume`)
    pub property: String,

    /// New value: a dropdown label, number, `on`/`off`, or text
    pub value: String,
}

#[derive(Debug, Args)]
pub struct ControlBatchArgs {
    /// JSON file holding `[{"deviceId", "property", "value"}, ...]`
    pub file: PathBuf,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between listings
    #[arg(long, short = 'i', default_value = "10")]
    pub interval: u64,

    /// Stop after this many listings (0 runs until interrupted)
    #[arg(long, short = 'n', default_value = "0")]
    pub count: u32,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the current configuration (passwords redacted)
    Show,

    /// List profile names, marking the default
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the active profile's password in the system keyring (read from stdin)
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
