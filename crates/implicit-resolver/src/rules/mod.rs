//! Resolution rules.
//!
//! A [`Rule`] inspects a goal and either resolves it or declines with `None`;
//! declining is ordinary control flow, never an error. A [`RuleSet`] is built
//! once and tried in order, first success wins.

use crate::context::{Resolution, ResolutionContext};
use implicit_solver::TypeId;

pub mod common;
pub mod refinement;

pub type RuleFn = fn(&mut ResolutionContext<'_>, TypeId) -> Option<Resolution>;

#[derive(Copy, Clone)]
pub struct Rule {
    pub name: &'static str,
    pub apply: RuleFn,
}

impl Rule {
    pub const fn new(name: &'static str, apply: RuleFn) -> Self {
        Self { name, apply }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// An ordered, immutable list of rules.
#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Scope lookup followed by the refinement composition rules.
    pub fn standard() -> Self {
        let mut rules = common::rules();
        rules.extend(refinement::rules());
        Self::new(rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}
