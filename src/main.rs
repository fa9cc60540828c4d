//! `dtm` binary entry point.

use anyhow::Result;
use clap::Parser;

use dtm_cli::cli::{Cli, Command};
use dtm_cli::commands;
use dtm_cli::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.command.log_name();

    match args.command {
        Command::Install(opts) => {
            let log = start_logging(args.verbose, command);
            commands::install::run(&args.global, &opts, &log)
        }
        Command::Clean => {
            let log = start_logging(args.verbose, command);
            commands::clean::run(&args.global, &log)
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
        Command::Completions(opts) => {
            commands::completions::run(&opts);
            Ok(())
        }
    }
}

fn start_logging(verbose: bool, command: &str) -> Logger {
    logging::init_subscriber(verbose, command);
    Logger::new(command)
}
