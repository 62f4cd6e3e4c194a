use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-query")]
#[command(about = "Trailing-year precipitation, station and temperature queries over daily weather observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Observations file (.csv or .parquet)")]
    pub measurements: Option<PathBuf>,

    #[arg(long, global = true, help = "Stations CSV file")]
    pub stations: Option<PathBuf>,

    #[arg(long, global = true, help = "Threads used to convert observation rows")]
    pub max_workers: Option<usize>,

    #[arg(long, global = true, help = "Memory-map the observations CSV")]
    pub mmap: bool,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Emit single-line JSON")]
    pub compact: bool,

    #[arg(short, long, global = true, help = "Suppress the loading spinner")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Precipitation for the trailing year of data (/api/v1.0/precipitation)
    Precipitation,

    /// List station identifiers (/api/v1.0/stations)
    Stations,

    /// Trailing-year temperatures of the most active station (/api/v1.0/tobs)
    Tobs,

    /// Min/avg/max temperature from START, up to END inclusive (/api/v1.0/<start>/<end>)
    Stats {
        #[arg(help = "Start date, YYYYMMDD")]
        start: String,

        #[arg(help = "End date, YYYYMMDD")]
        end: Option<String>,
    },

    /// Summarize the loaded dataset
    Info,

    /// Check the dataset for integrity problems without querying it
    Validate {
        #[arg(long, default_value = "10", help = "Violations listed in the report")]
        max_listed: usize,
    },

    /// Write the observations table to a Parquet file
    Export {
        #[arg(short, long, help = "Output Parquet file path")]
        output_file: PathBuf,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value = "10000")]
        row_group_size: usize,
    },
}
