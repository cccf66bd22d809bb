//! Clap derive structures for the `univid` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use univid_core::IspSetting;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// univid -- command-line access to a UniFi Video NVR
#[derive(Debug, Parser)]
#[command(
    name = "univid",
    version,
    about = "Inspect and control a UniFi Video NVR from the command line",
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
    /// NVR profile to use
    #[arg(long, short = 'p', env = "UNIVID_PROFILE", global = true)]
    pub profile: Option<String>,

    /// NVR address (overrides profile)
    #[arg(long, short = 'n', env = "UNIVID_NVR", global = true)]
    pub nvr: Option<String>,

    /// "http" or "https"
    #[arg(long, env = "UNIVID_SCHEMA", global = true)]
    pub schema: Option<String>,

    /// NVR port (default 7080 for http, 7443 for https)
    #[arg(long, env = "UNIVID_PORT", global = true)]
    pub port: Option<u16>,

    /// NVR API key
    #[arg(long, env = "UNIVID_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Username for session login
    #[arg(long, short = 'u', env = "UNIVID_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for session login
    #[arg(long, env = "UNIVID_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// NVR offset as GMT+hh:mm (overrides what the NVR reports)
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub utc_offset: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UNIVID_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "UNIVID_INSECURE", global = true)]
    pub insecure: bool,

    /// Connect even when the NVR version is not known to work
    #[arg(long, global = true)]
    pub skip_version_check: bool,

    /// Request timeout in seconds
    #[arg(long, env = "UNIVID_TIMEOUT", global = true)]
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
    /// Show NVR name, version, and time zone
    Info,

    /// List and configure cameras
    #[command(alias = "cam", alias = "c")]
    Cameras(CamerasArgs),

    /// List, fetch, and manage recordings
    #[command(alias = "rec", alias = "r")]
    Recordings(RecordingsArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Cameras ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CamerasArgs {
    #[command(subcommand)]
    pub command: CamerasCommand,
}

#[derive(Debug, Subcommand)]
pub enum CamerasCommand {
    /// List cameras
    #[command(alias = "ls")]
    List {
        /// Only managed, connected cameras
        #[arg(long, conflicts_with = "managed")]
        active: bool,

        /// Only managed cameras
        #[arg(long)]
        managed: bool,
    },

    /// Show one camera
    Show {
        /// Camera id, name, or on-screen text
        camera: String,
    },

    /// Save a live snapshot
    Snapshot {
        camera: String,

        /// Image width in pixels
        #[arg(long, short = 'w')]
        width: Option<u32>,

        /// Output file (default: snapshot-<id>-<time>.jpg)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Export footage between two points in time
    Clip {
        camera: String,

        /// Start: epoch seconds or NVR-local "YYYY-MM-DD HH:MM[:SS]"
        start: String,

        /// End, same forms as start
        end: String,

        /// Output file (default: clip-<id>-<start>-<end>.mp4)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Read or write image settings
    Isp {
        camera: String,

        /// Setting name (brightness, contrast, wdr, ir-led-level, ...)
        setting: Option<IspSetting>,

        /// New value, clamped to the setting's range
        #[arg(allow_hyphen_values = true, requires = "setting")]
        value: Option<i64>,
    },

    /// Change on-screen display
    Osd {
        camera: String,

        /// Custom overlay text
        #[arg(long)]
        text: Option<String>,

        /// Show the date and time
        #[arg(long)]
        timestamp: Option<Toggle>,

        /// Show the vendor logo
        #[arg(long)]
        watermark: Option<Toggle>,
    },

    /// Change recording mode and padding
    Record {
        camera: String,

        /// Continuous recording
        #[arg(long)]
        full_time: Option<Toggle>,

        /// Motion-triggered recording
        #[arg(long)]
        motion: Option<Toggle>,

        /// Seconds kept before a motion event
        #[arg(long)]
        pre_padding: Option<u32>,

        /// Seconds kept after a motion event
        #[arg(long)]
        post_padding: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

// ── Recordings ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecordingsArgs {
    #[command(subcommand)]
    pub command: RecordingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordingsCommand {
    /// List recordings, newest first
    #[command(alias = "ls")]
    List {
        /// Max results
        #[arg(long, short = 'l', default_value = "25")]
        limit: u32,

        /// Restrict to a camera (repeatable)
        #[arg(long, short = 'c')]
        camera: Vec<String>,

        /// Event type, e.g. motionRecording or fullTimeRecording (repeatable)
        #[arg(long = "type", short = 't')]
        types: Vec<String>,

        /// Start bound: epoch seconds or NVR-local "YYYY-MM-DD HH:MM"
        #[arg(long)]
        since: Option<String>,

        /// End bound, same forms as --since
        #[arg(long)]
        until: Option<String>,
    },

    /// Download the video
    Download {
        id: String,

        /// Output file (default: recording-<id>-<start>.mp4)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Download the motion map
    Motion {
        id: String,

        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Download a thumbnail
    Thumbnail {
        id: String,

        /// Image width in pixels (default 600)
        #[arg(long, short = 'w')]
        width: Option<u32>,

        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Protect a recording from cleanup
    Lock { id: String },

    /// Allow cleanup of a recording again
    Unlock { id: String },

    /// Delete a recording
    #[command(alias = "rm")]
    Delete { id: String },

    /// Delete every recording on the NVR
    Purge,
}

// ── Config / Completions ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the loaded configuration with secrets masked
    Show,

    /// List configured profiles
    Profiles,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
