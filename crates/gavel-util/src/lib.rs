//! Shared utilities for gavel.
//!
//! This crate provides cross-cutting concerns used by all other gavel crates:
//! the unified error type, filesystem helpers, and Cargo-style status output.

pub mod errors;
pub mod fs;
pub mod progress;
