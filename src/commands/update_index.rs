// This file contains the logic for `xinstall update-index`.
// It refreshes the package index of the detected package manager
// (`apt-get update`, `dnf makecache`, `brew update`, ...) through the
// throttle cache, so repeated installs within the interval skip it.

use super::Context;
use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use xinstall::errors::RunError;
use xinstall::libs::throttle::{ActionKey, Interval};
use xinstall::libs::utilities::command_runner::run_command;
use xinstall::libs::utilities::platform::PackageManager;
use xinstall::{log_debug, log_info};

/// Main entry point for the `update-index` command.
///
/// # Arguments
/// * `ctx`: Resolved config, throttle cache and command flags.
/// * `interval`: Minimum seconds since the last refresh, if given on the command line.
/// * `force`: Refresh even when the last refresh is recent.
pub fn run(ctx: &Context, interval: Option<f64>, force: bool) -> Result<()> {
    let Some(manager) = PackageManager::detect() else {
        bail!("no supported package manager found for this system");
    };
    let Some(command) = manager.refresh_index_command(ctx.command_options) else {
        log_info!("[Update Index] {} has no package index to refresh.", manager.to_string().bold());
        return Ok(());
    };

    let key = ActionKey::new(&manager.throttle_key())?;
    let interval = if force { Interval::ALWAYS } else { ctx.interval(interval) };
    log_debug!("[Update Index] {} refresh throttled under '{}' ({})", manager, key, interval);

    match ctx.cache.run_if_due(&key, interval, || run_command(&command)) {
        Ok(true) => {
            log_info!("[Update Index] {} package index refreshed.", manager.to_string().green());
            Ok(())
        }
        Ok(false) => Ok(()),
        Err(RunError::OperationFailed(err)) => Err(err.into()),
        Err(RunError::StoreUnavailable(err)) => {
            Err(err).context("the package index was refreshed, but the refresh time could not be saved")
        }
    }
}
