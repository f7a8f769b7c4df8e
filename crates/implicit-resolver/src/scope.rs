//! Scope of implicit values.
//!
//! A [`Scope`] holds what is visible at a derivation site: module exports
//! (shared by every scope of a file) and lexical locals (copied when a block
//! branches off, so siblings never see each other's later pushes).

use implicit_solver::{Tag, TypeId};
use std::rc::Rc;

/// Index of a derivation cell in a `ResolutionContext`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivationId(pub u32);

impl DerivationId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a scope entry's value comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// A block-scoped name.
    Local(String),
    /// An export of another module, reached through the module's alias.
    Module { module_path: String, export: String },
    /// A value synthesized during the current resolution.
    Derivation(DerivationId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScopeEntry {
    pub ty: TypeId,
    pub tags: Vec<Tag>,
    pub binding: Binding,
}

impl ScopeEntry {
    pub fn local(ty: TypeId, name: impl Into<String>) -> Self {
        Self {
            ty,
            tags: Vec::new(),
            binding: Binding::Local(name.into()),
        }
    }

    pub fn module(
        ty: TypeId,
        tags: Vec<Tag>,
        module_path: impl Into<String>,
        export: impl Into<String>,
    ) -> Self {
        Self {
            ty,
            tags,
            binding: Binding::Module {
                module_path: module_path.into(),
                export: export.into(),
            },
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
    modules: Rc<Vec<ScopeEntry>>,
    locals: Vec<ScopeEntry>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope for a nested block.
    ///
    /// The module list stays shared; locals are copied once here.
    pub fn branch(&self) -> Self {
        Self {
            modules: Rc::clone(&self.modules),
            locals: self.locals.clone(),
        }
    }

    pub fn push_local(&mut self, ty: TypeId, name: impl Into<String>) {
        self.locals.push(ScopeEntry::local(ty, name));
    }

    pub fn push_module(
        &mut self,
        ty: TypeId,
        tags: Vec<Tag>,
        module_path: impl Into<String>,
        export: impl Into<String>,
    ) {
        // Copies the shared list only if another scope still holds it.
        Rc::make_mut(&mut self.modules).push(ScopeEntry::module(ty, tags, module_path, export));
    }

    pub fn modules(&self) -> &[ScopeEntry] {
        &self.modules
    }

    pub fn locals(&self) -> &[ScopeEntry] {
        &self.locals
    }

    /// All entries in resolution order: modules first, then locals.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &ScopeEntry> {
        self.modules.iter().chain(self.locals.iter())
    }

    /// Most recently added entry matching `predicate`.
    pub fn find_first(&self, mut predicate: impl FnMut(&ScopeEntry) -> bool) -> Option<&ScopeEntry> {
        self.entries().rev().find(|entry| predicate(entry))
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
