use clap::{Parser, Subcommand};
use xinstall::libs::throttle::ActionKey;
use xinstall::schemas::app_config::SudoPolicy;

/// Defines the command-line interface (CLI) for 'xinstall'.
/// `#[derive(Parser)]` automatically generates argument parsing code via `clap`.
#[derive(Parser)]
#[command(name = "xinstall")]
#[command(version, about = "Easy installation and configuration for Unix/Linux", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    /// Answer yes to package manager prompts even if the config file turns it off.
    #[arg(short, long, global = true)]
    pub(crate) yes: bool,

    /// When to prefix privileged commands with sudo [possible values: auto, always, never].
    #[arg(long, global = true)]
    pub(crate) sudo: Option<SudoPolicy>,

    /// Path to the throttle settings file (defaults to ~/.linstall.json).
    #[arg(long, global = true, env = "XINSTALL_SETTINGS")]
    pub(crate) settings: Option<String>,

    /// Path to the YAML config file (defaults to ~/.xinstall/config.yaml).
    #[arg(long, global = true, env = "XINSTALL_CONFIG")]
    pub(crate) config: Option<String>,

    /// Defines available subcommands for 'xinstall'.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Enumerates all supported subcommands with their specific arguments and options.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the current version of the tool.
    #[command(visible_aliases = ["ver", "v"])]
    Version,
    /// Refresh the system package index, unless it was refreshed recently.
    UpdateIndex {
        /// Minimum seconds since the last refresh. Zero or negative always refreshes.
        #[arg(long, allow_negative_numbers = true)]
        interval: Option<f64>,
        /// Refresh regardless of when the index was last refreshed.
        #[arg(long)]
        force: bool,
    },
    /// Run a command only if it has not succeeded within the interval.
    /// Example: xinstall throttle --key pip_upgrade --interval 86400 -- pip3 install -U pip
    Throttle {
        /// Name under which the last successful run is recorded.
        #[arg(long)]
        key: ActionKey,
        /// Minimum seconds between runs. Zero or negative always runs.
        #[arg(long, allow_negative_numbers = true)]
        interval: Option<f64>,
        /// The command to run, given after `--`.
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },
    /// List recorded actions and whether each is due.
    Status {
        /// Interval in seconds to judge each action against.
        #[arg(long, allow_negative_numbers = true)]
        interval: Option<f64>,
    },
}
