//! CLI argument definitions for the domain designer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "domain-designer",
    version,
    about = "Inspect, validate and edit domain designs stored as service JSON",
    long_about = "Inspect, validate and edit domain designs stored as service JSON.\n\n\
                  Commands that change a domain print the re-serialized payload to stdout,\n\
                  ready to be submitted back to the service."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (TOML). Command-line flags take precedence.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a domain's fields, types, locks and structural errors.
    Inspect(DomainArgs),

    /// Run client-side validation and report errors and warnings.
    Validate(DomainArgs),

    /// List the types a field may be changed to.
    Types(TypesArgs),

    /// Move a field and print the reordered domain.
    Reorder(ReorderArgs),

    /// Append a field and print the domain.
    AddField(AddFieldArgs),

    /// Remove a field and print the domain.
    RemoveField(RemoveFieldArgs),

    /// Change a field's type and print the domain.
    SetType(SetTypeArgs),

    /// Attribute a failed-save response to the fields of a domain.
    Attribute(AttributeArgs),

    /// Load and re-serialize a domain, applying the service's conventions.
    Normalize(DomainArgs),
}

#[derive(Parser)]
pub struct DomainArgs {
    /// Domain JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct TypesArgs {
    /// Domain JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Row of the field (0-based).
    #[arg(long = "field", value_name = "N")]
    pub field: usize,

    /// Only offer types supported by application-managed domains.
    #[arg(long = "app-only")]
    pub app_only: bool,

    /// Hide the file type in app-only mode.
    #[arg(long = "hide-file")]
    pub hide_file: bool,
}

#[derive(Parser)]
pub struct ReorderArgs {
    /// Domain JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Current row of the field to move.
    #[arg(long = "from", value_name = "ROW")]
    pub from: usize,

    /// Row to move the field to.
    #[arg(long = "to", value_name = "ROW")]
    pub to: usize,

    /// Row currently expanded in the editor; its new position is reported.
    #[arg(long = "expanded", value_name = "ROW")]
    pub expanded: Option<usize>,
}

#[derive(Parser)]
pub struct AddFieldArgs {
    /// Domain JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name of the new field.
    #[arg(long = "name")]
    pub name: String,

    /// Type name (e.g. string, int, double, fileLink). Defaults to string.
    #[arg(long = "type", value_name = "TYPE")]
    pub data_type: Option<String>,
}

#[derive(Parser)]
pub struct RemoveFieldArgs {
    /// Domain JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Row of the field to remove.
    #[arg(long = "index", value_name = "ROW")]
    pub index: usize,
}

#[derive(Parser)]
pub struct SetTypeArgs {
    /// Domain JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Row of the field to change.
    #[arg(long = "field", value_name = "N")]
    pub field: usize,

    /// New type name.
    #[arg(long = "type", value_name = "TYPE")]
    pub data_type: String,

    /// Only allow types supported by application-managed domains.
    #[arg(long = "app-only")]
    pub app_only: bool,
}

#[derive(Parser)]
pub struct AttributeArgs {
    /// Domain JSON file: one domain, or an array of sub-domains.
    #[arg(value_name = "DOMAIN_FILE")]
    pub domain_file: PathBuf,

    /// Failed-save response JSON file.
    #[arg(value_name = "EXCEPTION_FILE")]
    pub exception_file: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
