//! typereg Command-Line Client
//!
//! Manage enum type definitions stored in a local typereg data directory.

mod commands;
mod formatter;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use std::path::PathBuf;
use typereg_core::StoreConfig;

/// Largest accepted `--cache-mb` value (1 TiB).
const MAX_CACHE_MB: u64 = 1024 * 1024;

/// typereg Command-Line Client
#[derive(Parser, Debug)]
#[command(name = "typereg")]
#[command(version, about = "Manage enum type definitions")]
pub struct Args {
    /// Path to the data directory
    #[arg(short = 'd', long, default_value = "./typereg_data")]
    pub data: PathBuf,

    /// Use a throwaway in-memory store
    #[arg(long)]
    pub temporary: bool,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Page cache capacity in MB
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u64).range(1..=MAX_CACHE_MB))]
    pub cache_mb: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Store operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create enum definitions from a JSON file (one object or an array)
    Create {
        /// JSON file with the definitions
        file: PathBuf,
    },

    /// Update enum definitions by name from a JSON file
    Update {
        /// JSON file with the definitions
        file: PathBuf,
    },

    /// Show one enum definition
    Get {
        /// Type name
        #[arg(long, conflicts_with = "guid", required_unless_present = "guid")]
        name: Option<String>,

        /// Type guid
        #[arg(long)]
        guid: Option<String>,
    },

    /// List all enum definitions
    List,

    /// Delete enum definitions
    Delete {
        /// Type names to delete
        #[arg(long)]
        name: Vec<String>,

        /// Type guids to delete
        #[arg(long)]
        guid: Vec<String>,
    },

    /// Search enum definitions
    Search {
        /// Match any of these names
        #[arg(long)]
        name: Vec<String>,

        /// Match any of these guids
        #[arg(long)]
        guid: Vec<String>,

        /// Exclude these names
        #[arg(long = "not-name")]
        not_name: Vec<String>,
    },
}

impl Args {
    /// Build the store configuration from the command line.
    pub fn store_config(&self) -> StoreConfig {
        let config = if self.temporary {
            StoreConfig::temporary()
        } else {
            StoreConfig::new(&self.data)
        };
        config.with_cache_capacity(self.cache_mb.saturating_mul(1024 * 1024))
    }
}

fn main() {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("typereg=info,typereg_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.store_config();
    let formatter = formatter::create_formatter(args.format);

    let output = commands::execute(&config, args.command, &*formatter)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
