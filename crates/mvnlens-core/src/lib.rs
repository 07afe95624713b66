//! Core data types for mvnlens.
//!
//! This crate defines the values exchanged between an external dependency
//! resolver and the analyzer: Maven coordinates, dependency scopes, the
//! depth-annotated resolver records, non-fatal parse warnings, and the
//! analyzer configuration.
//!
//! No async code here; the only I/O is reading a config file.

pub mod config;
pub mod coordinate;
pub mod record;
pub mod warning;
