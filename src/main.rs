//! `custom-login` command-line entry point.
use anyhow::{Context as _, Result};
use clap::Parser;
use std::io::Write as _;
use std::sync::Arc;

use login_profiles::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Login => {
            logging::init_subscriber(args.verbose, "login");
            let log = Arc::new(logging::Logger::new("login"));
            commands::login::run(&args.global, &log)
        }
        cli::Command::Status => {
            logging::init_subscriber(args.verbose, "status");
            let log = logging::Logger::new("status");
            commands::status::run(&args.global, &log)
        }
        cli::Command::Version => {
            writeln!(std::io::stdout(), "custom-login {}", commands::version())
                .context("writing version")
        }
    }
}
