//! Core data types for gavel.
//!
//! This crate defines the types the resolver works on: artifact coordinates,
//! parsed descriptors with their dependency declarations, the run
//! configuration, and the seed input reader.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod coordinate;
pub mod descriptor;
pub mod seeds;

/// Scope that marks a managed entry as a BOM import.
pub const IMPORT_SCOPE: &str = "import";

/// Scope a dependency gets when neither it nor a managed entry declares one.
pub const DEFAULT_SCOPE: &str = "compile";
