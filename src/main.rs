mod cli;
mod commands;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands};
use commands::{Context, status, throttle, update_index, version};
use xinstall::{log_debug, log_error, logger};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);
    log_debug!("Parsed command line, dispatching subcommand.");

    if let Err(err) = run(cli) {
        log_error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Version = cli.command {
        version::run();
        return Ok(());
    }

    let ctx = Context::load(
        cli.config.as_deref(),
        cli.settings.as_deref(),
        cli.sudo,
        cli.yes,
    )?;

    match cli.command {
        Commands::Version => Ok(()),
        Commands::UpdateIndex { interval, force } => update_index::run(&ctx, interval, force),
        Commands::Throttle { key, interval, command } => throttle::run(&ctx, &key, interval, command),
        Commands::Status { interval } => status::run(&ctx, interval),
    }
}
