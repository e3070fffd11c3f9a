// `xinstall status` prints every action recorded in the settings file,
// when it last ran and whether it is due under the given interval.

use super::Context;
use anyhow::{Context as _, Result};
use chrono::Utc;
use colored::Colorize;
use xinstall::libs::throttle::ActionState;
use xinstall::libs::utilities::timestamps::{format_duration, time_since};
use xinstall::log_info;

/// Main entry point for the `status` command.
///
/// Unlike the throttled commands, a broken settings file is an error here:
/// the point of `status` is to show what is stored.
pub fn run(ctx: &Context, interval: Option<f64>) -> Result<()> {
    let store = ctx.cache.store();
    let state = store
        .load()
        .context("cannot show throttle status: the settings store is unavailable")?;
    let interval = ctx.interval(interval);
    let now = Utc::now();

    log_info!(
        "Settings file: {} (interval: {})",
        store.path().display().to_string().cyan(),
        interval
    );
    if state.is_empty() {
        println!("No actions recorded yet.");
        return Ok(());
    }

    for record in state.records() {
        let Some(last_run_at) = record.last_run_at else {
            println!(
                "{:<32} {}",
                record.action_key.bold(),
                "unreadable value (treated as never run)".red()
            );
            continue;
        };

        let verdict = match ActionState::classify(Some(last_run_at), interval, now) {
            ActionState::Due { .. } => "due".green().to_string(),
            ActionState::Cooling { due_after: Some(due_after), .. } => {
                format!("{} (due in {})", "cooling".yellow(), format_duration(&(due_after - now)))
            }
            ActionState::Cooling { due_after: None, .. } => "cooling".yellow().to_string(),
        };
        println!(
            "{:<32} {}  {:<16} {}",
            record.action_key.bold(),
            last_run_at.format("%Y-%m-%d %H:%M:%S UTC"),
            time_since(&last_run_at, &now),
            verdict
        );
    }
    Ok(())
}
