//! Emission of resolved derivations.
//!
//! - `ir`: expression and statement nodes
//! - `imports`: module alias table and fresh-name generation for one file
//! - `printer`: JavaScript text output

pub mod imports;
pub mod ir;
pub mod printer;

pub use imports::{EmitState, ImportMap, UniqueNames};
pub use ir::{Expr, ImportDecl, Statement};
pub use printer::{Printer, print_expr};
