//! CLI argument definitions for `arcmap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use arcmap_cli::logging::LogFormat;
use arcmap_cli::workflow::TableFormat;

#[derive(Parser)]
#[command(
    name = "arcmap",
    version,
    about = "Map data dictionaries to ARC",
    long_about = "Suggest mappings from a source data dictionary to the ARC schema.\n\n\
                  Candidates are written as a review table; reviewed tables can be\n\
                  expanded to response level and joined with resource mappings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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
    /// Suggest ARC variables for every variable of a source dictionary.
    Map(MapArgs),

    /// Expand a (reviewed) candidate table to response level.
    Responses(ResponsesArgs),

    /// Join accepted mappings with resource mapping tables.
    Merge(MergeArgs),

    /// List the registered similarity strategies.
    Strategies,

    /// Print the download URL of an ARC version.
    ArcUrl {
        /// ARC version, e.g. 1.0.0.
        version: String,
    },
}

#[derive(Parser)]
pub struct MapArgs {
    /// Source data dictionary (.csv, or .json for a JSON Schema).
    #[arg(value_name = "DICTIONARY")]
    pub source: PathBuf,

    /// ARC schema CSV (ARCH.csv).
    #[arg(value_name = "ARC")]
    pub arc: PathBuf,

    /// Similarity strategy.
    #[arg(long, short = 's', default_value = "tf-idf")]
    pub strategy: String,

    /// Maximum candidates per source variable.
    #[arg(long = "num-matches", short = 'n', default_value_t = arcmap_map::DEFAULT_NUM_MATCHES)]
    pub num_matches: usize,

    /// Keep candidates scoring strictly above this value.
    #[arg(long, short = 't', default_value_t = arcmap_map::DEFAULT_THRESHOLD)]
    pub threshold: f32,

    #[command(flatten)]
    pub model: ModelArg,

    /// Restrict ARC to the variables of one preset (column preset_<NAME>).
    #[arg(long = "preset", value_name = "NAME")]
    pub preset: Option<String>,

    /// Column holding variable names (default: first column).
    #[arg(long = "variable-field", value_name = "COLUMN")]
    pub variable_field: Option<String>,

    /// Column holding descriptions (default: longest text column).
    #[arg(long = "description-field", value_name = "COLUMN")]
    pub description_field: Option<String>,

    /// Column holding field types.
    #[arg(long = "type-field", value_name = "COLUMN")]
    pub type_field: Option<String>,

    /// Column holding choice lists; requires --response-parser.
    #[arg(long = "response-field", value_name = "COLUMN")]
    pub response_field: Option<String>,

    /// Parser for the response column.
    #[arg(long = "response-parser", value_name = "PARSER")]
    pub response_parser: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct ResponsesArgs {
    /// Candidate table CSV written by `arcmap map`.
    #[arg(value_name = "MAPPING")]
    pub mapping: PathBuf,

    /// Only expand rows marked as accepted.
    #[arg(long = "accepted-only")]
    pub accepted_only: bool,

    #[command(flatten)]
    pub model: ModelArg,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct MergeArgs {
    /// Reviewed candidate table CSV.
    #[arg(value_name = "MAPPING")]
    pub mapping: PathBuf,

    /// Resource mapping table as NAME=PATH (repeatable).
    #[arg(long = "resource", short = 'r', value_name = "NAME=PATH", required = true)]
    pub resources: Vec<String>,

    /// Columns to render (comma separated).
    #[arg(long = "columns", value_delimiter = ',')]
    pub columns: Vec<String>,

    #[command(flatten)]
    pub model: ModelArg,

    /// Write the merged text here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ModelArg {
    /// Sentence embedding model (default: $ARCMAP_MODEL or all-MiniLM-L6-v2).
    #[arg(long = "model", short = 'm', value_name = "NAME")]
    pub model: Option<String>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Write the table here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Table format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: TableFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TableFormatArg {
    Csv,
    Json,
}

impl From<TableFormatArg> for TableFormat {
    fn from(format: TableFormatArg) -> Self {
        match format {
            TableFormatArg::Csv => Self::Csv,
            TableFormatArg::Json => Self::Json,
        }
    }
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
