//! Names and signatures the refinement rules recognize.
//!
//! Generic combinators (`compose`, `isAlwaysTrue`, `isMin`, `isMax`) cannot be
//! modeled structurally, so they reach the arena as opaque types carrying the
//! host's rendering of their signature. The rules find them in scope by
//! comparing that rendering with the constants below.

use implicit_solver::queries::{
    intersection_members, is_intersection, reference_args_named, string_literal,
};
use implicit_solver::{TypeArena, TypeId};
use regex::Regex;
use std::sync::OnceLock;

pub const REFINEMENT: &str = "Refinement";
pub const BRAND: &str = "Brand";
pub const BRAND_IDENTIFIER: &str = "BrandIdentifier";

/// `isAlwaysTrue`: a zero-argument witness accepting every value.
pub const ALWAYS_TRUE_SIGNATURE: &str = "<A, K extends string>() => Refinement<A, Branded<A, K>>";

/// `compose`: sequential composition of two refinements.
pub const COMPOSE_SIGNATURE: &str = "<A, B extends A, C extends B>(left: Refinement<A, B>, right: Refinement<B, C>) => Refinement<A, C>";

/// `isMin`
pub const MIN_SIGNATURE: &str = "<K extends number | { readonly length: number; }, X extends number>(x: X) => Refinement<K, Min<K, X>>";

/// `isMax`
pub const MAX_SIGNATURE: &str = "<K extends number | { readonly length: number; }, X extends number>(x: X) => Refinement<K, Max<K, X>>";

/// `(input, output)` of a `Refinement<input, output>`.
pub fn refinement_args(arena: &TypeArena, id: TypeId) -> Option<(TypeId, TypeId)> {
    match reference_args_named(arena, id, REFINEMENT)?.as_slice() {
        &[input, output] => Some((input, output)),
        _ => None,
    }
}

pub fn is_brand(arena: &TypeArena, id: TypeId) -> bool {
    brand_payload(arena, id).is_some()
}

/// Payload type of `Brand<payload>`.
pub fn brand_payload(arena: &TypeArena, id: TypeId) -> Option<TypeId> {
    match reference_args_named(arena, id, BRAND)?.as_slice() {
        &[payload] => Some(payload),
        _ => None,
    }
}

/// `(branded, payload)` of a `BrandIdentifier<branded, payload>`.
pub fn brand_identifier_args(arena: &TypeArena, id: TypeId) -> Option<(TypeId, TypeId)> {
    match reference_args_named(arena, id, BRAND_IDENTIFIER)?.as_slice() {
        &[branded, payload] => Some((branded, payload)),
        _ => None,
    }
}

/// Last member of an intersection output, the brand a relation establishes.
pub fn last_output_member(arena: &TypeArena, output: TypeId) -> Option<TypeId> {
    if !is_intersection(arena, output) {
        return None;
    }
    intersection_members(arena, output).last().copied()
}

/// A numeric constraint encoded in a brand payload, e.g. `"Min(0)"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumericConstraint {
    pub kind: ConstraintKind,
    /// The number exactly as written in the payload.
    pub literal: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Min,
    Max,
}

impl ConstraintKind {
    pub const fn signature(self) -> &'static str {
        match self {
            ConstraintKind::Min => MIN_SIGNATURE,
            ConstraintKind::Max => MAX_SIGNATURE,
        }
    }
}

fn numeric_constraint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(Min|Max)\((-?\d+(\.\d+)?)\)$").expect("numeric constraint pattern is valid")
    })
}

/// Parse `Min(<number>)` / `Max(<number>)`. Anything else is `None`.
pub fn parse_numeric_constraint(payload: &str) -> Option<NumericConstraint> {
    let captures = numeric_constraint_pattern().captures(payload)?;
    let kind = match captures.get(1)?.as_str() {
        "Min" => ConstraintKind::Min,
        "Max" => ConstraintKind::Max,
        _ => return None,
    };
    Some(NumericConstraint {
        kind,
        literal: captures.get(2)?.as_str().to_string(),
    })
}

/// The numeric constraint carried by `Brand<"Min(..)">` / `Brand<"Max(..)">`.
pub fn brand_constraint(arena: &TypeArena, brand: TypeId) -> Option<NumericConstraint> {
    let payload = brand_payload(arena, brand)?;
    parse_numeric_constraint(&string_literal(arena, payload)?)
}
