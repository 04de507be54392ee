//! `dotfiles` binary: parse arguments, set up logging, dispatch.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use dotfiles_sync::cli::{Cli, Command};
use dotfiles_sync::commands::{self, Context};
use dotfiles_sync::exec::SystemExecutor;
use dotfiles_sync::logging::{self, Log, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if args.command == Command::Version {
        commands::version::run();
        return ExitCode::SUCCESS;
    }

    logging::init_subscriber(args.verbose, args.command.name());
    let log = Arc::new(Logger::new(args.command.name()));

    match run(&args, log.clone()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("Error while {e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli, log: Arc<dyn Log>) -> anyhow::Result<()> {
    use anyhow::Context as _;

    let ctx = Context::init(&args.global, log, Arc::new(SystemExecutor)).context("initializing")?;
    match args.command {
        Command::Copy => commands::copy::run(&ctx),
        Command::Link => commands::link::run(&ctx),
        Command::Sync => commands::sync::run(&ctx),
        Command::Version => Ok(()),
    }
}
