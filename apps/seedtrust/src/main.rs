//! # Seedtrust - Seed Graph Local Trust Generator
//!
//! The main binary for the seedtrust pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    apps/seedtrust (THE BINARY)                  │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │   CLI       │    │   Config    │    │  Seed Discovery  │   │
//! │  │  (clap)     │    │   (toml)    │    │  + Atomic Output │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘   │
//! │         │                  │                    │              │
//! │         └──────────────────┼────────────────────┘              │
//! │                            ▼                                   │
//! │                   ┌────────────────┐                           │
//! │                   │ seedtrust-core │                           │
//! │                   │  (THE LOGIC)   │                           │
//! │                   └────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Generate ./trust/seed_graph.csv from config.toml
//! seedtrust
//!
//! # Explicit paths, JSON summary on stdout
//! seedtrust --config conf.toml generate --raw-dir raw -o trust.csv --json-mode
//!
//! # Check which seed files are present
//! seedtrust discover
//! ```

use clap::Parser;
use seedtrust::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. SEEDTRUST_LOG_FORMAT=json enables machine-parseable output.
    // Logs go to stderr so stdout stays clean for --json-mode.
    let log_format = std::env::var("SEEDTRUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "seedtrust=debug"
    } else {
        "seedtrust=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the seedtrust startup banner.
fn print_banner() {
    println!(
        r#"
  seedtrust v{}

  Follows • Replies • Retweets • Quotes • Mentions  →  i,j,v
"#,
        env!("CARGO_PKG_VERSION")
    );
}
