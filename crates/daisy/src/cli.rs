//! Clap derive structures for the `daisy` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of crate-internal imports so `build.rs` can include it for man
//! page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// daisy -- control Teleco Daisy lights and covers from the command line
#[derive(Debug, Parser)]
#[command(
    name = "daisy",
    version,
    about = "Control Teleco Daisy home-automation installations",
    long_about = "Talks to the Teleco tmate cloud: lists installations, rooms and\n\
        devices, reads device status, and drives lights and covers, waiting\n\
        for the device to acknowledge each command.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "DAISY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Account e-mail (overrides profile)
    #[arg(long, env = "DAISY_EMAIL", global = true)]
    pub email: Option<String>,

    /// Cloud base URL (overrides profile)
    #[arg(long, env = "DAISY_BASE_URL", global = true, hide_env = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DAISY_OUTPUT",
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

    /// Accept invalid TLS certificates (debugging proxies only)
    #[arg(long, short = 'k', env = "DAISY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "DAISY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Return as soon as a command is accepted, without waiting for the
    /// device to acknowledge it
    #[arg(long, global = true)]
    pub no_wait: bool,
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
    /// Verify credentials and print the account id
    Login,

    /// List installations and probe their hubs
    #[command(alias = "inst", alias = "i")]
    Installations(InstallationsArgs),

    /// List rooms and the devices they group
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// List devices and read their status
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Control lights
    #[command(alias = "l")]
    Lights(LightsArgs),

    /// Control covers (awnings, ZIP screens, pergolas)
    #[command(alias = "c")]
    Covers(CoversArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Installations ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InstallationsArgs {
    #[command(subcommand)]
    pub command: InstallationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum InstallationsCommand {
    /// List installations of the account
    #[command(alias = "ls")]
    List,

    /// Check whether an installation's hub is online
    Status {
        /// Installation id, instCode or description
        installation: String,
    },
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms
    #[command(alias = "ls")]
    List {
        /// Only rooms of this installation (id, instCode or description)
        #[arg(long, short = 'i')]
        installation: Option<String>,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List supported devices
    #[command(alias = "ls")]
    List {
        /// Only devices of this installation (id, instCode or description)
        #[arg(long, short = 'i')]
        installation: Option<String>,

        /// Read each device's current status first
        #[arg(long, short = 's')]
        status: bool,
    },

    /// Read the current status of a device
    Status {
        /// Device id or label
        device: String,
    },
}

// ── Lights ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LightsArgs {
    #[command(subcommand)]
    pub command: LightsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightsCommand {
    /// List lights
    #[command(alias = "ls")]
    List,

    /// Switch a light on
    On {
        /// Device id or label
        device: String,
    },

    /// Switch a light off
    Off {
        /// Device id or label
        device: String,
    },

    /// Set color and/or brightness (omitted values keep the last known ones)
    Color {
        /// Device id or label
        device: String,

        /// Color as r,g,b (0-255 each)
        #[arg(long)]
        rgb: Option<String>,

        /// Brightness percent (0-100)
        #[arg(long, short = 'b')]
        brightness: Option<u8>,
    },
}

// ── Covers ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CoversArgs {
    #[command(subcommand)]
    pub command: CoversCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoversCommand {
    /// List covers
    #[command(alias = "ls")]
    List,

    /// Open a cover fully, or to a level step
    Open {
        /// Device id or label
        device: String,

        /// Level step: 33, 66 or 100
        #[arg(long)]
        percent: Option<u8>,
    },

    /// Close a cover
    Close {
        /// Device id or label
        device: String,
    },

    /// Stop a moving cover
    Stop {
        /// Device id or label
        device: String,
    },

    /// Move to the level step nearest to a percentage
    Position {
        /// Device id or label
        device: String,

        /// Target position (0-100)
        percent: u8,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Print the configuration file path
    Path,

    /// Set a profile value
    Set {
        /// Key: email, base_url, ca_cert, insecure, timeout, white_led, password_env
        key: String,

        /// New value
        value: String,
    },

    /// Store the account password in the system keyring
    SetPassword,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
