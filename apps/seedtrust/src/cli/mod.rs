//! # Seedtrust CLI Module
//!
//! This module implements the CLI interface for seedtrust.
//!
//! ## Available Commands
//!
//! - `generate` - Build the trust edge list from the seed files (default)
//! - `discover` - Show which seed files are present

mod commands;

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use seedtrust_core::TrustError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Seedtrust - seed graph local trust generator
///
/// Turns follows, replies, retweets, quotes and mentions gathered around a
/// set of seed accounts into a weighted `i,j,v` trust edge list.
#[derive(Parser, Debug)]
#[command(name = "seedtrust")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the trust edge list
    Generate {
        /// Directory holding the raw seed files (overrides the config)
        #[arg(short, long)]
        raw_dir: Option<PathBuf>,

        /// Output CSV path (overrides `<trust_dir>/<output_name>.csv`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the JSON run summary to this path
        #[arg(short, long)]
        summary: Option<PathBuf>,
    },

    /// List configured seeds and their raw files
    Discover {
        /// Directory holding the raw seed files (overrides the config)
        #[arg(short, long)]
        raw_dir: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TrustError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Generate {
            raw_dir,
            output,
            summary,
        }) => cmd_generate(
            &cli.config,
            json_mode,
            raw_dir.as_deref(),
            output.as_deref(),
            summary.as_deref(),
        ),
        Some(Commands::Discover { raw_dir }) => {
            cmd_discover(&cli.config, json_mode, raw_dir.as_deref())
        }
        None => {
            // No subcommand - generate with configured paths
            cmd_generate(&cli.config, json_mode, None, None, None)
        }
    }
}
