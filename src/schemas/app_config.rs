//! # Application Configuration (`~/.xinstall/config.yaml`)
//!
//! Optional. Every field has a default, so a missing file, an empty file and
//! a file setting only one field are all valid.
//!
//! ```yaml
//! settings_file: ~/.linstall.json
//! update_interval_seconds: 43200
//! use_sudo: auto      # auto | always | never
//! assume_yes: true
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default spacing between package index refreshes: twelve hours.
pub const DEFAULT_UPDATE_INTERVAL_SECONDS: f64 = 43_200.0;

/// Top-level structure of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where the throttle settings are stored. Overridden by `--settings`.
    pub settings_file: Option<String>,
    /// Minimum seconds between two package index refreshes.
    pub update_interval_seconds: f64,
    pub use_sudo: SudoPolicy,
    /// Pass the package manager's "yes to all prompts" flag. On by default
    /// so unattended refreshes never stop at a prompt.
    pub assume_yes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_file: None,
            update_interval_seconds: DEFAULT_UPDATE_INTERVAL_SECONDS,
            use_sudo: SudoPolicy::Auto,
            assume_yes: true,
        }
    }
}

/// When privileged commands are prefixed with `sudo`. Set by `use_sudo` in
/// the config file or by `--sudo` on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SudoPolicy {
    /// Use sudo unless already running as root.
    #[default]
    Auto,
    Always,
    Never,
}

impl SudoPolicy {
    pub fn resolve(self, is_root: bool) -> bool {
        match self {
            SudoPolicy::Auto => !is_root,
            SudoPolicy::Always => true,
            SudoPolicy::Never => false,
        }
    }
}

/// Parses the `--sudo` value, case-insensitively. `yes`/`no` are accepted
/// as synonyms for `always`/`never`.
impl FromStr for SudoPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SudoPolicy::Auto),
            "always" | "yes" => Ok(SudoPolicy::Always),
            "never" | "no" => Ok(SudoPolicy::Never),
            _ => {
                let valid_modes = ["auto", "always", "never"].join(", ");
                Err(format!("Invalid sudo mode '{s}'. Must be one of: {valid_modes}"))
            }
        }
    }
}

impl fmt::Display for SudoPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SudoPolicy::Auto => write!(f, "auto"),
            SudoPolicy::Always => write!(f, "always"),
            SudoPolicy::Never => write!(f, "never"),
        }
    }
}
