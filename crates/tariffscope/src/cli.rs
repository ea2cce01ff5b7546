use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::export::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "tariffscope")]
#[command(about = "Compare public-sector salary tables in the terminal")]
pub struct Args {
    /// Path to the data directory (default: ~/.tariffscope/)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Settings file (default: <data-dir>/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive comparison dashboard (default)
    Dashboard {
        /// Tariff A
        #[arg(short = 'a', long)]
        tariff_a: Option<String>,
        /// Tariff B
        #[arg(short = 'b', long)]
        tariff_b: Option<String>,
    },
    /// Print the tables listed by the resolved source
    List,
    /// Print a JSON comparison of two or more tables
    Compare {
        #[arg(required = true)]
        tables: Vec<String>,
        /// Table every other one is compared against (default: the first)
        #[arg(long)]
        baseline: Option<String>,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Export the comparison of two tariffs
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,
        /// Output file (default: the export directory with a standard name)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(short = 'a', long)]
        tariff_a: Option<String>,
        #[arg(short = 'b', long)]
        tariff_b: Option<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Dashboard {
            tariff_a: None,
            tariff_b: None,
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tariffscope")
}
