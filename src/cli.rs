use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI for running the widget and debugging endpoint payloads
#[derive(Parser)]
#[command(name = "snapfeed")]
#[command(about = "Keeps a photo gallery in sync with a remote collection endpoint", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the configured endpoint and keep the rendered gallery fresh
    Run {
        /// Path to the TOML config file
        #[arg(short, long, default_value = "snapfeed.toml")]
        config: PathBuf,
        /// Where to write the rendered gallery fragment
        #[arg(short, long, default_value = "gallery.html")]
        out: PathBuf,
    },
    /// Report which endpoints the current configuration gates on and off
    Check {
        /// Path to the TOML config file
        #[arg(short, long, default_value = "snapfeed.toml")]
        config: PathBuf,
    },
    /// Run a payload file through the normalizer and print the items
    Normalize {
        /// JSON file holding a remote payload
        file: PathBuf,
    },
}
