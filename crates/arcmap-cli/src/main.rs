//! `arcmap` command line tool.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};

use arcmap_cli::logging::{LogConfig, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_map, run_merge, run_responses};
use crate::summary::print_strategies;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Map(args) => run_map(args),
        Command::Responses(args) => run_responses(args),
        Command::Merge(args) => run_merge(args),
        Command::Strategies => {
            print_strategies();
            Ok(())
        }
        Command::ArcUrl { version } => {
            println!("{}", arcmap_ingest::arc_schema_url(version));
            Ok(())
        }
    }
}

/// `--log-level` beats `-v`/`-q`; either one disables `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), Into::into);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        ..LogConfig::default()
    }
    .with_level_filter(level_filter)
    .with_format(cli.log_format.into())
    .with_log_file(cli.log_file.clone())
    .with_ansi(with_ansi)
}
