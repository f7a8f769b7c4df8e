//! Structural assignability.
//!
//! `source ≤ target` over the closed [`TypeData`] set:
//!
//! - `unknown` is top: everything is assignable to it, and it is assignable
//!   only to itself
//! - literals are assignable to their primitive and to an identical literal
//! - interfaces compare by name, then member-wise in declared order;
//!   structural records compare member-wise in order
//! - references compare by name, tag set, variance markers and arity, then
//!   per argument according to the declared variance
//! - an intersection source needs one member assignable to a plain target,
//!   and every member of an intersection target matched by some source member
//!
//! ## Cycles
//!
//! Translated types can be self-referential. A `(source, target)` pair that is
//! already under comparison is assumed to hold (coinductive semantics), and
//! the walk gives up with "not assignable" past
//! [`MAX_RELATION_DEPTH`](implicit_common::limits::MAX_RELATION_DEPTH).

use crate::arena::TypeArena;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{Member, TypeData, TypeId, TypeReference, Variance};

pub struct AssignabilityChecker<'a> {
    arena: &'a TypeArena,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> AssignabilityChecker<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self {
            arena,
            guard: RecursionGuard::with_profile(RecursionProfile::Relation),
        }
    }

    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        // Same cell, including unfilled placeholders and NaN literals.
        if source == target {
            return true;
        }

        let key = (source, target);
        match self.guard.enter(key) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return true,
            RecursionResult::DepthExceeded => return false,
        }
        let result = self.check_data(source, target);
        self.guard.leave(key);
        result
    }

    fn check_data(&mut self, source: TypeId, target: TypeId) -> bool {
        let (Some(source_data), Some(target_data)) =
            (self.arena.lookup(source), self.arena.lookup(target))
        else {
            // A placeholder is only related to itself.
            return false;
        };

        if target_data.is_unknown() {
            return true;
        }

        match (&*source_data, &*target_data) {
            (TypeData::Intersection(sources), TypeData::Intersection(targets)) => {
                targets.iter().all(|&t| sources.iter().any(|&s| self.is_assignable(s, t)))
            }
            (TypeData::Intersection(sources), _) => {
                sources.iter().any(|&s| self.is_assignable(s, target))
            }
            (_, TypeData::Intersection(_)) => false,

            (TypeData::String, TypeData::String)
            | (TypeData::Number, TypeData::Number)
            | (TypeData::Object, TypeData::Object)
            | (TypeData::StringLiteral(_), TypeData::String)
            | (TypeData::NumberLiteral(_), TypeData::Number) => true,

            (TypeData::StringLiteral(s), TypeData::StringLiteral(t)) => s == t,
            #[allow(clippy::float_cmp)]
            (TypeData::NumberLiteral(s), TypeData::NumberLiteral(t)) => s == t,
            (TypeData::Unsupported(s), TypeData::Unsupported(t)) => s == t,

            (
                TypeData::Interface {
                    name: source_name,
                    members: source_members,
                },
                TypeData::Interface {
                    name: target_name,
                    members: target_members,
                },
            ) => source_name == target_name && self.members_pairwise(source_members, target_members),
            (
                TypeData::Structural {
                    members: source_members,
                },
                TypeData::Structural {
                    members: target_members,
                },
            ) => self.members_pairwise(source_members, target_members),

            (TypeData::Reference(s), TypeData::Reference(t)) => self.check_reference(s, t),

            _ => false,
        }
    }

    fn members_pairwise(&mut self, source: &[Member], target: &[Member]) -> bool {
        source.len() == target.len()
            && source
                .iter()
                .zip(target)
                .all(|(s, t)| self.is_assignable(s.ty, t.ty))
    }

    fn check_reference(&mut self, source: &TypeReference, target: &TypeReference) -> bool {
        if source.name != target.name
            || source.tags != target.tags
            || source.variances != target.variances
            || source.args.len() != target.args.len()
        {
            return false;
        }

        source
            .args
            .iter()
            .zip(&target.args)
            .enumerate()
            .all(|(index, (&s, &t))| match source.variance_at(index) {
                Some(Variance::Covariant) => self.is_assignable(s, t),
                Some(Variance::Contravariant) => self.is_assignable(t, s),
                _ => self.is_assignable(s, t) && self.is_assignable(t, s),
            })
    }
}

#[cfg(test)]
#[path = "../tests/relation_tests.rs"]
mod tests;
