//! CLI argument definitions for the county pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use pol_ingest::{DEFAULT_DATA_DIR, ELECTION_URL};
use pol_transform::{DEFAULT_EXPORT_PATH, ElectionSource, FINAL_TABLE, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "pol-pipeline",
    version,
    about = "County politics pipeline - load election and census data and join it by FIPS",
    long_about = "Load election results, county FIPS lookups and census extracts into a \
                  relational store,\nclean and normalize census columns, and join \
                  everything into one table per county.\n\n\
                  Database settings come from ENDPOINT, PORT, USER, REGION, PASSWORD and \
                  DBNAME\n(a .env file is read first when present)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Load every source file and push it to the database.
    Collect(CollectArgs),

    /// Join the stored tables into the combined county table.
    Join(JoinArgs),

    /// Collect, then join.
    Run(RunArgs),

    /// Print the normalized form of census labels.
    Normalize(NormalizeArgs),

    /// Show the raw to normalized column mapping of a mapping file.
    Columns(ColumnsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// Directory holding the source CSV and mapping files.
    #[arg(long = "data-dir", value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// URL of the election results CSV.
    #[arg(long = "election-url", value_name = "URL", default_value = ELECTION_URL)]
    pub election_url: String,

    /// Read election results from a local CSV instead of downloading them.
    #[arg(long = "election-file", value_name = "PATH", conflicts_with = "skip_election")]
    pub election_file: Option<PathBuf>,

    /// Leave the stored election table untouched.
    #[arg(long = "skip-election")]
    pub skip_election: bool,
}

impl CollectArgs {
    pub fn election_source(&self) -> ElectionSource {
        if self.skip_election {
            ElectionSource::Skip
        } else if let Some(path) = &self.election_file {
            ElectionSource::File(path.clone())
        } else {
            ElectionSource::Url(self.election_url.clone())
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct JoinArgs {
    /// Also write the combined table as CSV (default: output/POL_FINAL.csv).
    #[arg(
        long = "export",
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_EXPORT_PATH
    )]
    pub export: Option<PathBuf>,

    /// Name of the combined table.
    #[arg(long = "table", value_name = "NAME", default_value = FINAL_TABLE)]
    pub table: String,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub collect: CollectArgs,

    #[command(flatten)]
    pub join: JoinArgs,
}

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Raw census labels, e.g. "Estimate!!Total!!Total population".
    #[arg(value_name = "LABEL", required = true)]
    pub labels: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ColumnsArgs {
    /// Mapping file with "Column Name" and "Label" columns.
    #[arg(value_name = "MAPPING_FILE")]
    pub mapping_file: PathBuf,

    /// Directory relative mapping paths are resolved against.
    #[arg(long = "data-dir", value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

/// Build the pipeline settings from collect and join flags.
pub fn pipeline_config(collect: Option<&CollectArgs>, join: Option<&JoinArgs>) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if let Some(collect) = collect {
        config.data_dir = collect.data_dir.clone();
        config.election = collect.election_source();
    }
    if let Some(join) = join {
        config.final_table = join.table.clone();
        config.export_path = join.export.clone();
    }
    config
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
