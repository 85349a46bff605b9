//! Domain designer CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use designer_cli::logging::{LogConfig, LogFormat, init_logging};
use designer_cli::settings::{self, DesignerSettings};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    CommandOutcome, run_add_field, run_attribute, run_inspect, run_normalize, run_remove_field,
    run_reorder, run_set_type, run_types, run_validate,
};
use crate::summary::print_outcome;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = match DesignerSettings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let result = run_command(&cli.command, &settings);
    let exit_code = match result {
        Ok(outcome) => match print_outcome(&outcome, &settings) {
            Ok(()) => {
                if outcome.has_errors() { 1 } else { 0 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_command(command: &Command, settings: &DesignerSettings) -> anyhow::Result<CommandOutcome> {
    match command {
        Command::Inspect(args) => run_inspect(args, settings),
        Command::Validate(args) => run_validate(args, settings),
        Command::Types(args) => run_types(args, settings),
        Command::Reorder(args) => run_reorder(args, settings),
        Command::AddField(args) => run_add_field(args, settings),
        Command::RemoveField(args) => run_remove_field(args, settings),
        Command::SetType(args) => run_set_type(args, settings),
        Command::Attribute(args) => run_attribute(args, settings),
        Command::Normalize(args) => run_normalize(args, settings),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
