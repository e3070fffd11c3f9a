// Provides `PathBuf` for working with file paths.
use std::path::PathBuf;
// Colored path output in debug logs.
use colored::Colorize;
// Custom logging macros.
use crate::log_debug;
// Imports a utility function to expand the `~` character in paths.
use crate::libs::utilities::path_helpers::expand_tilde;
use crate::schemas::app_config::AppConfig;

/// Default location of the throttle settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "~/.linstall.json";
/// Default location of the optional YAML config.
pub const DEFAULT_CONFIG_PATH: &str = "~/.xinstall/config.yaml";

/// Resolves the config file path: the `--config` flag (or `XINSTALL_CONFIG`,
/// which clap folds into the flag) if given, otherwise the default.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    let resolved = expand_tilde(config_path.unwrap_or(DEFAULT_CONFIG_PATH));
    log_debug!("Resolved config path: {}", resolved.display().to_string().cyan());
    resolved
}

/// Resolves the settings file path.
///
/// Precedence: `--settings` flag / `XINSTALL_SETTINGS`, then
/// `settings_file` from the config file, then `~/.linstall.json`.
pub fn resolve_settings_path(settings_path: Option<&str>, config: &AppConfig) -> PathBuf {
    let chosen = settings_path
        .or(config.settings_file.as_deref())
        .unwrap_or(DEFAULT_SETTINGS_PATH);
    let resolved = expand_tilde(chosen);
    log_debug!("Managing throttle settings in: {}", resolved.display().to_string().yellow());
    resolved
}
