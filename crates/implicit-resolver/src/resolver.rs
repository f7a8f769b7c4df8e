//! Resolver façade.
//!
//! [`ImplicitScope`] is what a host drives while walking a file: it collects
//! module exports and locals as the walk enters blocks, and answers
//! derivation requests at call sites. All scopes of one file share a single
//! [`EmitState`], so module aliases and generated names stay unique per file.

use crate::context::ResolutionContext;
use crate::emit::{EmitState, Expr, Statement};
use crate::rules::RuleSet;
use crate::scope::{Binding, Scope};
use implicit_common::diagnostics::diagnostic_codes;
use implicit_common::{Diagnostic, DeriveOptions, SourceLocation};
use implicit_solver::{Tag, TypeArena, TypeId};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, debug_span};

/// A derivation emitted for a request and bound to a fresh name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedDerivation {
    pub ty: TypeId,
    pub name: String,
}

/// A successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// The value to splice in at the derivation site.
    pub expr: Expr,
    /// Derivations whose statements were emitted for this request.
    pub derivations: Vec<AddedDerivation>,
}

/// Error raised when no rule can produce a requested value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DerivationError {
    Unresolved {
        location: SourceLocation,
        /// Canonical rendering of the requested type.
        rendered: String,
    },
}

impl DerivationError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            DerivationError::Unresolved { location, .. } => location,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DerivationError::Unresolved { location, rendered } => Diagnostic::from_code(
                location,
                diagnostic_codes::UNSUPPORTED_DERIVATION,
                &[&location.to_string(), rendered],
            ),
        }
    }
}

impl std::fmt::Display for DerivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DerivationError::Unresolved { location, rendered } => {
                write!(f, "unsupported derivation at: {location} cannot resolve {rendered}")
            }
        }
    }
}

impl std::error::Error for DerivationError {}

impl From<DerivationError> for Diagnostic {
    fn from(error: DerivationError) -> Self {
        error.to_diagnostic()
    }
}

/// Visible implicit values at one point of a file.
#[derive(Clone)]
pub struct ImplicitScope<'a> {
    arena: &'a TypeArena,
    rules: &'a RuleSet,
    options: DeriveOptions,
    emit: Rc<RefCell<EmitState>>,
    scope: Scope,
}

impl<'a> ImplicitScope<'a> {
    /// A file-level scope with a fresh [`EmitState`].
    pub fn new(arena: &'a TypeArena, rules: &'a RuleSet, options: DeriveOptions) -> Self {
        Self::with_emit_state(arena, rules, options, Rc::new(RefCell::new(EmitState::new())))
    }

    pub fn with_emit_state(
        arena: &'a TypeArena,
        rules: &'a RuleSet,
        options: DeriveOptions,
        emit: Rc<RefCell<EmitState>>,
    ) -> Self {
        Self {
            arena,
            rules,
            options,
            emit,
            scope: Scope::new(),
        }
    }

    /// Scope for a nested block.
    pub fn child(&self) -> Self {
        Self {
            arena: self.arena,
            rules: self.rules,
            options: self.options,
            emit: Rc::clone(&self.emit),
            scope: self.scope.branch(),
        }
    }

    pub fn arena(&self) -> &'a TypeArena {
        self.arena
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn emit_state(&self) -> Rc<RefCell<EmitState>> {
        Rc::clone(&self.emit)
    }

    /// Register a lexically visible binding (parameter, declaration).
    pub fn push_local(&mut self, ty: TypeId, name: impl Into<String>) {
        let name = name.into();
        self.emit.borrow_mut().names.reserve(name.clone());
        self.scope.push_local(ty, name);
    }

    /// Register an export of another module.
    pub fn push_module(
        &mut self,
        ty: TypeId,
        tags: Vec<Tag>,
        module_path: impl Into<String>,
        export: impl Into<String>,
    ) {
        self.scope.push_module(ty, tags, module_path, export);
    }

    /// Make derivations from an earlier request visible as locals.
    pub fn register_derivations(&mut self, derivations: &[AddedDerivation]) {
        for derivation in derivations {
            self.scope.push_local(derivation.ty, derivation.name.clone());
        }
    }

    /// Resolve `target`, appending needed derivation statements to `out`.
    pub fn resolve_implementation(
        &self,
        target: TypeId,
        location: &SourceLocation,
        out: &mut Vec<Statement>,
    ) -> Result<Resolved, DerivationError> {
        self.resolve_implementation_safe(target, out)
            .ok_or_else(|| DerivationError::Unresolved {
                location: location.clone(),
                rendered: self.arena.stringify(target),
            })
    }

    /// Like [`resolve_implementation`](Self::resolve_implementation), but
    /// answers `None` instead of an error.
    pub fn resolve_implementation_safe(
        &self,
        target: TypeId,
        out: &mut Vec<Statement>,
    ) -> Option<Resolved> {
        let rendered = self.arena.stringify(target);
        let _span = debug_span!("resolve_implementation", target = %rendered).entered();

        let mut emit = self.emit.borrow_mut();
        let mut context =
            ResolutionContext::new(self.arena, self.rules, self.options, &self.scope, out, &mut emit);

        let Some(resolution) = context.resolve(target) else {
            debug!("no rule resolved the target");
            return None;
        };
        let expr = context.realize(&resolution.plan);
        let derivations: Vec<AddedDerivation> = context
            .used_derivations()
            .map(|(ty, name)| AddedDerivation {
                ty,
                name: name.to_string(),
            })
            .collect();

        debug!(derivations = derivations.len(), "resolved");
        Some(Resolved { expr, derivations })
    }

    /// `true` if some entry binds `name` as a local.
    pub fn has_local(&self, name: &str) -> bool {
        self.scope
            .locals()
            .iter()
            .any(|entry| matches!(&entry.binding, Binding::Local(local) if local == name))
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
