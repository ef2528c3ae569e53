use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Fill PDF form fields from rows of CSV or spreadsheet data.
#[derive(Debug, Parser)]
#[command(name = "formfill", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides per target
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the form fields of a template
    Fields {
        /// Path to the PDF template
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// CSV or spreadsheet whose columns are compared with the field names
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Fill the template once per data row and write the results
    Fill {
        /// Path to the PDF template
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// CSV (.csv) or spreadsheet (.xlsx, .xlsm, .xlsb, .xls, .ods) with a header row
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Column whose value names each output file (falls back to the row number)
        #[arg(long, default_value = formfill::DEFAULT_NAMING_KEY)]
        naming_key: String,

        /// Left-pad fields matching PATTERN to WIDTH (e.g. 'zipcode=5', 'account.*=8:0'). Repeatable
        #[arg(long, value_name = "PATTERN=WIDTH[:CHAR]")]
        pad: Vec<String>,

        /// Drop the built-in zip/postal code padding rule
        #[arg(long)]
        no_default_pad: bool,

        /// Mark every filled field read-only
        #[arg(long)]
        read_only: bool,

        /// Fail later rows whose output name was already used instead of overwriting
        #[arg(long)]
        reject_duplicates: bool,

        /// Row range (e.g. '1,3-5'), counted from the first data row. Default: all rows
        #[arg(long)]
        rows: Option<String>,

        /// Number of parallel workers (default: fill rows one at a time)
        #[arg(long, short = 'j', value_name = "N")]
        jobs: Option<usize>,

        /// Output .zip file or directory (default: filled_forms_<timestamp>.zip)
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Summary format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format for both subcommands.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON output
    Json,
}
