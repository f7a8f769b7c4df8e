//! Types of the refined prelude.
//!
//! The prelude is the runtime module that derived refinements call into:
//!
//! ```text
//! isUnknown    : Refinement<unknown, unknown>
//! isNumber     : Refinement<unknown, number>
//! isString     : Refinement<unknown, string>
//! isObject     : Refinement<unknown, object>
//! isInt        : Refinement<number, Int>
//! isAlwaysTrue : <A, K extends string>() => Refinement<A, Branded<A, K>>
//! isMin, isMax : <K, X extends number>(x: X) => Refinement<K, Min<K, X>>
//! compose      : <A, B, C>(left: Refinement<A, B>, right: Refinement<B, C>) => Refinement<A, C>
//! ```
//!
//! [`RefinedPrelude::declare`] builds these types in an arena, together with
//! helpers for the type-level vocabulary (`Brand`, `Branded`, `Int`, `Min`,
//! `Max`, `Between`) so callers can write targets in the same terms.

use crate::resolver::ImplicitScope;
use crate::well_known::{
    ALWAYS_TRUE_SIGNATURE, BRAND, COMPOSE_SIGNATURE, MAX_SIGNATURE, MIN_SIGNATURE, REFINEMENT,
};
use implicit_solver::{TypeArena, TypeId, Variance, format_number};

pub struct RefinedPrelude<'a> {
    arena: &'a TypeArena,
    pub is_unknown: TypeId,
    pub is_number: TypeId,
    pub is_string: TypeId,
    pub is_object: TypeId,
    pub is_int: TypeId,
    pub is_always_true: TypeId,
    pub is_min: TypeId,
    pub is_max: TypeId,
    pub compose: TypeId,
}

impl<'a> RefinedPrelude<'a> {
    pub fn declare(arena: &'a TypeArena) -> Self {
        let is_unknown = refinement_in(arena, TypeId::UNKNOWN, TypeId::UNKNOWN);
        let is_number = refinement_in(arena, TypeId::UNKNOWN, TypeId::NUMBER);
        let is_string = refinement_in(arena, TypeId::UNKNOWN, TypeId::STRING);
        let is_object = refinement_in(arena, TypeId::UNKNOWN, TypeId::OBJECT);
        let int = branded_in(arena, TypeId::NUMBER, "Int");
        let is_int = refinement_in(arena, TypeId::NUMBER, int);
        Self {
            arena,
            is_unknown,
            is_number,
            is_string,
            is_object,
            is_int,
            is_always_true: arena.unsupported(ALWAYS_TRUE_SIGNATURE),
            is_min: arena.unsupported(MIN_SIGNATURE),
            is_max: arena.unsupported(MAX_SIGNATURE),
            compose: arena.unsupported(COMPOSE_SIGNATURE),
        }
    }

    /// Export names with their types, in declaration order.
    pub fn exports(&self) -> [(&'static str, TypeId); 9] {
        [
            ("isUnknown", self.is_unknown),
            ("isNumber", self.is_number),
            ("isString", self.is_string),
            ("isObject", self.is_object),
            ("isInt", self.is_int),
            ("isAlwaysTrue", self.is_always_true),
            ("isMin", self.is_min),
            ("isMax", self.is_max),
            ("compose", self.compose),
        ]
    }

    /// Make every export visible in `scope` under `module_path`.
    pub fn register(&self, scope: &mut ImplicitScope<'_>, module_path: &str) {
        for (export, ty) in self.exports() {
            scope.push_module(ty, Vec::new(), module_path, export);
        }
    }

    // =========================================================================
    // Type-level vocabulary
    // =========================================================================

    /// `Refinement<input, output>`
    pub fn refinement(&self, input: TypeId, output: TypeId) -> TypeId {
        refinement_in(self.arena, input, output)
    }

    /// `Brand<"name">`
    pub fn brand(&self, name: &str) -> TypeId {
        brand_in(self.arena, name)
    }

    /// `Branded<ty, "name">` = `ty & Brand<"name">`
    pub fn branded(&self, ty: TypeId, name: &str) -> TypeId {
        branded_in(self.arena, ty, name)
    }

    /// `Int` = `Branded<number, "Int">`
    pub fn int(&self) -> TypeId {
        self.branded(TypeId::NUMBER, "Int")
    }

    /// `Min<ty, bound>` = `Branded<ty, "Min(bound)">`
    pub fn min(&self, ty: TypeId, bound: f64) -> TypeId {
        self.branded(ty, &format!("Min({})", format_number(bound)))
    }

    /// `Max<ty, bound>` = `Branded<ty, "Max(bound)">`
    pub fn max(&self, ty: TypeId, bound: f64) -> TypeId {
        self.branded(ty, &format!("Max({})", format_number(bound)))
    }

    /// `Between<ty, low, high>` = `Min<ty, low> & Max<ty, high>`
    pub fn between(&self, ty: TypeId, low: f64, high: f64) -> TypeId {
        let min = self.min(ty, low);
        let max = self.max(ty, high);
        self.arena.intersection2(min, max)
    }
}

/// Variances of `Refinement<A, B>`: contravariant input, invariant output.
pub fn refinement_variances() -> Vec<Variance> {
    vec![Variance::Contravariant, Variance::Invariant]
}

fn refinement_in(arena: &TypeArena, input: TypeId, output: TypeId) -> TypeId {
    arena.reference(
        REFINEMENT,
        &[input, output],
        Vec::new(),
        Some(refinement_variances()),
    )
}

fn brand_in(arena: &TypeArena, name: &str) -> TypeId {
    let payload = arena.literal_string(name);
    arena.reference(BRAND, &[payload], Vec::new(), None)
}

fn branded_in(arena: &TypeArena, ty: TypeId, name: &str) -> TypeId {
    let brand = brand_in(arena, name);
    arena.intersection2(ty, brand)
}
