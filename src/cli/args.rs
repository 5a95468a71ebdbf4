use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ptf-images")]
#[command(about = "Search the PTF image catalog by position and download the images")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file (toml, yaml, json, ...)")]
    pub config: Option<PathBuf>,
}

/// Sky position and row selection shared by every command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Right ascension in degrees or hh:mm:ss"
    )]
    pub ra: String,

    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Declination in degrees or dd:mm:ss"
    )]
    pub dec: String,

    #[arg(
        short,
        long = "filter",
        help = "Row condition such as 'fid==2' or 'obsmjd>=55000' (repeatable, all must hold)"
    )]
    pub filters: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the image catalog for a position
    Search {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(short, long, help = "Write the catalog as CSV to this path")]
        output: Option<PathBuf>,

        #[arg(
            long,
            default_value = "false",
            help = "Write the catalog to output/ptf-catalog-{YYMMDD}.csv"
        )]
        save: bool,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },

    /// Print the image URLs for a position
    Urls {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Download the images for a position into an existing directory
    Download {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(short, long, help = "Existing output directory")]
        output_dir: PathBuf,

        #[arg(long, help = "Write per-file results as JSON to this path")]
        summary: Option<PathBuf>,

        #[arg(short, long, default_value = "false")]
        quiet: bool,
    },
}
