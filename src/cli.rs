//! Command-line interface definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// location-timezone - IP geolocation and timezone service
#[derive(Parser, Debug)]
#[command(name = "location-timezone")]
#[command(version)]
#[command(about = "Resolve IP addresses to location and timezone metadata", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Resolve one address against the configured database
    Lookup {
        /// IPv4 or IPv6 literal
        ip: String,
    },

    /// Print or write a sample configuration file
    GenerateConfig {
        /// Output file path (default: stdout)
        output: Option<PathBuf>,
    },
}
