//! # Formats Module
//!
//! Decoders for the upstream seed data files.
//!
//! Per the core's constraints, decoding is pure: bytes in, record batches
//! out. Locating and reading the files is the app layer's job.

mod seed_files;

pub use seed_files::*;
