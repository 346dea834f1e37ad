use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use skillreg::{
    cli::{Cli, run},
    error::CliError,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(CliError::Exit(code)) => ExitCode::from(*code),
            Some(err @ CliError::BadParameter(_)) => {
                eprintln!("{} {err}", "Error:".red().bold());
                ExitCode::from(err.exit_code())
            }
            None => {
                eprintln!("{} {e:#}", "Error:".red().bold());
                ExitCode::FAILURE
            }
        },
    }
}
