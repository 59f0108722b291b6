//! # Seedtrust
//!
//! File-system side of the seed graph trust generator: configuration,
//! seed file discovery, CLI commands and atomic artifact writes. All
//! scoring happens in `seedtrust-core`.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod output;
