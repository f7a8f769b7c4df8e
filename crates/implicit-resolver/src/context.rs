//! Resolution context.
//!
//! One [`ResolutionContext`] serves one top-level request. It owns the
//! resolution view of the scope (a snapshot of the caller's entries plus the
//! derivations pushed while resolving) and the derivation memo cells, and it
//! borrows the caller's statement buffer and per-file [`EmitState`].
//!
//! Resolving produces a [`Resolution`]: the type that was found and a [`Plan`]
//! describing how to build the value. Nothing is emitted until a plan is
//! [realized](ResolutionContext::realize); realizing a derivation reference
//! the first time emits its `const` statement, later realizations just name
//! the binding.

use crate::emit::{EmitState, Expr, Statement};
use crate::rules::RuleSet;
use crate::scope::{Binding, DerivationId, Scope, ScopeEntry};
use implicit_common::DeriveOptions;
use implicit_common::limits::{MAX_RESOLUTION_DEPTH, MAX_RESOLUTION_STEPS};
use implicit_solver::{TypeArena, TypeId};
use tracing::{debug, trace};

/// How to build a resolved value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// Reference the value behind a scope binding.
    Binding(Binding),
    /// `callee(args...)`
    Call { callee: Box<Plan>, args: Vec<Plan> },
    /// A numeric literal argument, kept as written.
    NumericLiteral(String),
}

impl Plan {
    pub fn call(callee: Plan, args: Vec<Plan>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args,
        }
    }
}

/// A resolved goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub ty: TypeId,
    pub plan: Plan,
}

impl Resolution {
    pub fn new(ty: TypeId, plan: Plan) -> Self {
        Self { ty, plan }
    }

    pub fn derivation(&self) -> Option<DerivationId> {
        match self.plan {
            Plan::Binding(Binding::Derivation(id)) => Some(id),
            _ => None,
        }
    }
}

/// Memo cell for one shared derivation.
#[derive(Clone, Debug)]
pub struct DerivationCell {
    pub ty: TypeId,
    pub plan: Plan,
    /// Bound name, set when the statement is emitted.
    pub name: Option<String>,
    pub used: bool,
}

impl DerivationCell {
    pub fn is_emitted(&self) -> bool {
        self.name.is_some()
    }
}

/// Goals currently being resolved, outermost first.
///
/// A goal equal to one already in progress would resolve through the same
/// rules again without making progress, so it is declined.
#[derive(Default)]
struct GoalStack {
    goals: Vec<TypeId>,
    steps: u32,
}

impl GoalStack {
    fn enter(&mut self, arena: &TypeArena, goal: TypeId) -> bool {
        if self.goals.len() >= MAX_RESOLUTION_DEPTH as usize {
            debug!(?goal, "resolution depth limit reached");
            return false;
        }
        if self.steps >= MAX_RESOLUTION_STEPS {
            debug!(?goal, "resolution step limit reached");
            return false;
        }
        if self
            .goals
            .iter()
            .any(|&active| active == goal || arena.equal(active, goal))
        {
            trace!(?goal, "goal already in progress");
            return false;
        }
        self.steps += 1;
        self.goals.push(goal);
        true
    }

    fn leave(&mut self) {
        self.goals.pop();
    }
}

pub struct ResolutionContext<'a> {
    arena: &'a TypeArena,
    rules: &'a RuleSet,
    options: DeriveOptions,
    entries: Vec<ScopeEntry>,
    cells: Vec<DerivationCell>,
    statements: &'a mut Vec<Statement>,
    emit: &'a mut EmitState,
    goals: GoalStack,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        arena: &'a TypeArena,
        rules: &'a RuleSet,
        options: DeriveOptions,
        scope: &Scope,
        statements: &'a mut Vec<Statement>,
        emit: &'a mut EmitState,
    ) -> Self {
        Self {
            arena,
            rules,
            options,
            entries: scope.entries().cloned().collect(),
            cells: Vec::new(),
            statements,
            emit,
            goals: GoalStack::default(),
        }
    }

    pub fn arena(&self) -> &'a TypeArena {
        self.arena
    }

    pub fn options(&self) -> DeriveOptions {
        self.options
    }

    pub fn cells(&self) -> &[DerivationCell] {
        &self.cells
    }

    pub fn cell(&self, id: DerivationId) -> Option<&DerivationCell> {
        self.cells.get(id.index())
    }

    /// Entries of the resolution view, oldest first.
    pub fn entries(&self) -> &[ScopeEntry] {
        &self.entries
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve `target` with the first rule that succeeds.
    pub fn resolve(&mut self, target: TypeId) -> Option<Resolution> {
        if !self.goals.enter(self.arena, target) {
            return None;
        }

        let rules = self.rules;
        let mut result = None;
        for rule in rules.iter() {
            trace!(rule = rule.name, target = ?target, "trying rule");
            if let Some(resolution) = (rule.apply)(self, target) {
                trace!(rule = rule.name, target = ?target, "rule succeeded");
                result = Some(resolution);
                break;
            }
        }

        self.goals.leave();
        result
    }

    /// Newest entry of the resolution view matching `predicate`.
    pub fn find_in_scope(&self, predicate: impl Fn(&ScopeEntry) -> bool) -> Option<Resolution> {
        let entry = self.entries.iter().rev().find(|entry| predicate(entry))?;
        trace!(ty = ?entry.ty, binding = ?entry.binding, "scope hit");
        Some(Resolution::new(entry.ty, Plan::Binding(entry.binding.clone())))
    }

    /// Newest entry whose type is assignable to `target`.
    pub fn find_assignable(&self, target: TypeId) -> Option<Resolution> {
        let arena = self.arena;
        self.find_in_scope(|entry| arena.is_assignable_to(entry.ty, target))
    }

    /// Share `resolution` through a memo cell.
    ///
    /// The returned resolution references the cell; the cell is also pushed
    /// into the resolution view so later goals can reuse it.
    pub fn providing(&mut self, resolution: Resolution) -> Resolution {
        let id = DerivationId(self.cells.len() as u32);
        debug!(?id, ty = %self.arena.stringify(resolution.ty), "providing derivation");
        self.cells.push(DerivationCell {
            ty: resolution.ty,
            plan: resolution.plan,
            name: None,
            used: false,
        });
        self.entries.push(ScopeEntry {
            ty: resolution.ty,
            tags: Vec::new(),
            binding: Binding::Derivation(id),
        });
        Resolution::new(resolution.ty, Plan::Binding(Binding::Derivation(id)))
    }

    /// Refinement type shaped like `template` with new arguments.
    pub fn refinement_like(&self, template: TypeId, input: TypeId, output: TypeId) -> Option<TypeId> {
        self.arena.reference_with_args(template, &[input, output])
    }

    // =========================================================================
    // Realization
    // =========================================================================

    pub fn module_alias(&mut self, module_path: &str) -> String {
        self.emit.module_alias(module_path)
    }

    /// Build the expression for `plan`, emitting shared derivations it
    /// depends on (each at most once).
    pub fn realize(&mut self, plan: &Plan) -> Expr {
        match plan {
            Plan::Binding(Binding::Local(name)) => Expr::id(name.clone()),
            Plan::Binding(Binding::Module {
                module_path,
                export,
            }) => {
                let alias = self.module_alias(module_path);
                Expr::prop(Expr::id(alias), export.clone())
            }
            Plan::Binding(Binding::Derivation(id)) => self.realize_derivation(*id),
            Plan::Call { callee, args } => {
                let callee = self.realize(callee);
                let arguments = args.iter().map(|arg| self.realize(arg)).collect();
                Expr::call(callee, arguments)
            }
            Plan::NumericLiteral(text) => Expr::number(text.clone()),
        }
    }

    fn realize_derivation(&mut self, id: DerivationId) -> Expr {
        let Some(cell) = self.cells.get_mut(id.index()) else {
            // Ids only come from this context's own cells.
            debug_assert!(false, "unknown derivation {id:?}");
            return Expr::id("undefined");
        };
        cell.used = true;
        if let Some(name) = &cell.name {
            return Expr::id(name.clone());
        }

        let ty = cell.ty;
        let plan = cell.plan.clone();
        let init = self.realize(&plan);
        let name = self.emit.fresh_name("derivation");
        let comment = self
            .options
            .emit_type_comments
            .then(|| self.arena.stringify(ty));

        debug!(%name, "emitting derivation");
        self.statements
            .push(Statement::derivation(name.clone(), init, comment));
        if let Some(cell) = self.cells.get_mut(id.index()) {
            cell.name = Some(name.clone());
        }
        Expr::id(name)
    }

    /// Cells consumed by at least one realization, in creation order.
    pub fn used_derivations(&self) -> impl Iterator<Item = (TypeId, &str)> {
        self.cells
            .iter()
            .filter(|cell| cell.used)
            .filter_map(|cell| Some((cell.ty, cell.name.as_deref()?)))
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
