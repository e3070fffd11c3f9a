use crate::errors::ConfigError;
use crate::log_debug;
use crate::schemas::app_config::AppConfig;
use colored::Colorize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Loads `config.yaml` from `path`.
///
/// A missing file, or one that holds only whitespace or comments, yields
/// `AppConfig::default()`. A file that exists but cannot be read or parsed
/// is an error: silently ignoring a broken config would run with settings
/// the user did not ask for.
pub fn load_app_config(path: &Path) -> Result<AppConfig, ConfigError> {
    log_debug!(
        "[Config] Attempting to load config from: {}",
        path.display().to_string().blue()
    );

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log_debug!("[Config] No config file found, using defaults.");
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let has_content = contents
        .lines()
        .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'));
    if !has_content {
        log_debug!("[Config] Config file is empty, using defaults.");
        return Ok(AppConfig::default());
    }

    let config: AppConfig = serde_yaml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;
    log_debug!("[Config] Loaded: {:?}", config);
    Ok(config)
}
