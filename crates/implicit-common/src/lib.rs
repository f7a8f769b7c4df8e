//! Common types and utilities for the implicit resolution crates.
//!
//! This crate provides foundational types used across the workspace:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message templates)
//! - Source locations for reporting derivation sites
//! - Resolution and relation limits
//! - Derivation options (`DeriveOptions`)

// Diagnostic types and message templates
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};

// Line/column locations of derivation sites
pub mod position;
pub use position::SourceLocation;

// Centralized limits and thresholds
pub mod limits;

// Options recognized by the resolver
pub mod config;
pub use config::{DeriveOptions, parse_options};
