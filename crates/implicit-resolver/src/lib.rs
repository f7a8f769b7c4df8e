//! Implicit value resolution.
//!
//! Given a requested type and the values visible at a call site, the resolver
//! searches for an expression of that type:
//!
//! - [`scope`]: module exports and block-scoped locals
//! - [`rules`]: ordered resolution rules (scope lookup, refinement composition)
//! - [`context`]: one request's goal stack, memo cells and realization
//! - [`emit`]: output IR, import aliases and the JavaScript printer
//! - [`resolver`]: the [`ImplicitScope`] façade hosts drive
//! - [`prelude`] and [`runtime`]: the refined prelude's types and a reference
//!   evaluator for generated programs

pub mod context;
pub mod emit;
pub mod prelude;
pub mod resolver;
pub mod rules;
pub mod runtime;
pub mod scope;
pub mod well_known;

pub use context::{DerivationCell, Plan, Resolution, ResolutionContext};
pub use emit::{EmitState, Expr, ImportDecl, Printer, Statement};
pub use prelude::RefinedPrelude;
pub use resolver::{AddedDerivation, DerivationError, ImplicitScope, Resolved};
pub use rules::{Rule, RuleSet};
pub use runtime::{EvalError, Evaluator, Predicate};
pub use scope::{Binding, DerivationId, Scope, ScopeEntry};
