use crate::cli::setup::get_version;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "floortrack", bin_name = "floortrack", version = get_version())]
#[command(about = "Scan-driven inventory and storage-cage tracker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory holding the ledger and category files
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read scan lines from stdin until EOF (the default)
    Scan,

    /// Roll today's category day files into a summary file
    Summary,

    /// Join the storage ledger with the location table
    Merge {
        /// Output file for the joined table
        #[arg(short, long, default_value = "Merged.csv")]
        output: PathBuf,
    },

    /// Convert historical day or summary files into SQL-loadable row files
    Export {
        /// Files to convert
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Directory the converted files are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}
