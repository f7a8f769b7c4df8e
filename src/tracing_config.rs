//! Tracing configuration for debugging derivations.
//!
//! Supports three output formats controlled by `IMPLICIT_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, one span per
//!   derivation request with rule attempts nested below it
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Which rules fired for each target
//! IMPLICIT_LOG=trace IMPLICIT_LOG_FORMAT=tree implicit derive request.json
//!
//! # Only the resolver, as JSON
//! IMPLICIT_LOG="implicit_resolver=debug" IMPLICIT_LOG_FORMAT=json implicit derive request.json
//! ```
//!
//! The subscriber is only initialised when `IMPLICIT_LOG` (or `RUST_LOG`) is
//! set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read `IMPLICIT_LOG_FORMAT`.
    fn from_env() -> Self {
        Self::parse(&std::env::var("IMPLICIT_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `IMPLICIT_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("IMPLICIT_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `IMPLICIT_LOG` nor `RUST_LOG` is set. All output
/// goes to stderr so it never mixes with generated code on stdout.
pub fn init_tracing() {
    let has_implicit_log = std::env::var("IMPLICIT_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_implicit_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
