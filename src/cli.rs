//! Command-line interface definitions using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Properview - listings, inquiries and listing analytics
#[derive(Parser)]
#[command(name = "properview")]
#[command(version)]
#[command(about = "Real-estate listing service with daily listing analytics", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Rebuild daily analytics rows from the raw view and inquiry logs
    ///
    /// Both dates are inclusive and interpreted as UTC days (YYYY-MM-DD).
    Recompute {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: stdout)
        output_path: Option<String>,
    },
}
