// `xinstall throttle` runs any command behind the throttle cache, recording
// each successful run under a caller-chosen key.

use super::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use xinstall::errors::RunError;
use xinstall::libs::throttle::ActionKey;
use xinstall::libs::utilities::command_runner::{CommandSpec, run_command};
use xinstall::log_info;

/// Main entry point for the `throttle` command.
pub fn run(ctx: &Context, key: &ActionKey, interval: Option<f64>, argv: Vec<String>) -> Result<()> {
    let command = CommandSpec::from_argv(argv)?;
    let interval = ctx.interval(interval);

    match ctx.cache.run_if_due(key, interval, || run_command(&command)) {
        Ok(true) => {
            log_info!("[Throttle] Recorded successful run of '{}'.", key.to_string().green());
            Ok(())
        }
        Ok(false) => Ok(()),
        Err(RunError::OperationFailed(err)) => Err(err.into()),
        Err(RunError::StoreUnavailable(err)) => Err(err).with_context(|| {
            format!("`{}` succeeded, but its run could not be recorded", command.display())
        }),
    }
}
