//! Implicit-value resolution: derive instances and refinements from types.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`common`]: diagnostics, source locations, limits, options
//! - [`solver`]: the type arena, assignability and host-type translation
//! - [`resolver`]: scopes, rules, the resolution context and code emission
//!
//! This package adds JSON derivation requests ([`request`]) and the tracing
//! setup used by the `implicit` binary ([`tracing_config`]).

pub use implicit_common as common;
pub use implicit_resolver as resolver;
pub use implicit_solver as solver;

pub mod request;
pub mod tracing_config;

pub use request::{DeriveOutput, DeriveRequest, DerivedTarget, HostGraph, run};
