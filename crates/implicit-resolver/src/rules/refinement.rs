//! Refinement composition.
//!
//! Goals of the form `Refinement<A, B>` are built from smaller refinements:
//!
//! 1. **identity**: `A ≤ B` needs no check, only the always-true witness
//! 2. **transitivity**: an existing `Refinement<X, B>` is reused after
//!    resolving `Refinement<A, X>`
//! 3. **decomposition**: `B = M & ...` splits into `Refinement<A, A & M>` and
//!    `Refinement<A & M, A & B>`
//! 4. **brand**: the first brand `B` does not already imply gets a validator
//!    (an existing relation, or a `Min(n)`/`Max(n)` constructor), the rest of
//!    the residual is resolved recursively, and the pieces are composed
//!
//! Every composition goes through the `compose` combinator found in scope,
//! earlier relation first. Sub-goals equal to the goal being solved are
//! declined rather than resolved.

use super::Rule;
use crate::context::{Plan, Resolution, ResolutionContext};
use crate::well_known::{
    ALWAYS_TRUE_SIGNATURE, COMPOSE_SIGNATURE, NumericConstraint, brand_constraint,
    brand_identifier_args, brand_payload, is_brand, last_output_member, refinement_args,
};
use implicit_solver::TypeId;
use implicit_solver::queries::{intersection_members, is_intersection, is_unsupported_with};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("refinement_identity", identity),
        Rule::new("refinement_transitivity", transitivity),
        Rule::new("refinement_decomposition", decomposition),
        Rule::new("refinement_brand", brand),
    ]
}

// =============================================================================
// Combinators
// =============================================================================

/// `isAlwaysTrue()` typed as `ty`.
fn always_true(context: &mut ResolutionContext<'_>, ty: TypeId) -> Option<Resolution> {
    let arena = context.arena();
    let witness =
        context.find_in_scope(|entry| is_unsupported_with(arena, entry.ty, ALWAYS_TRUE_SIGNATURE))?;
    Some(context.providing(Resolution::new(ty, Plan::call(witness.plan, Vec::new()))))
}

/// `compose(left, right)` typed as `ty`.
fn compose(
    context: &mut ResolutionContext<'_>,
    ty: TypeId,
    left: Resolution,
    right: Resolution,
) -> Option<Resolution> {
    let arena = context.arena();
    let compose =
        context.find_in_scope(|entry| is_unsupported_with(arena, entry.ty, COMPOSE_SIGNATURE))?;
    Some(context.providing(Resolution::new(
        ty,
        Plan::call(compose.plan, vec![left.plan, right.plan]),
    )))
}

// =============================================================================
// Rules
// =============================================================================

/// `Refinement<A, B>` with `A ≤ B`.
pub fn identity(context: &mut ResolutionContext<'_>, target: TypeId) -> Option<Resolution> {
    let arena = context.arena();
    let (input, output) = refinement_args(arena, target)?;
    if !arena.is_assignable_to(input, output) {
        return None;
    }
    always_true(context, target)
}

/// `Refinement<A, B>` from an existing `Refinement<X, B>` and `Refinement<A, X>`.
pub fn transitivity(context: &mut ResolutionContext<'_>, target: TypeId) -> Option<Resolution> {
    let arena = context.arena();
    let (input, output) = refinement_args(arena, target)?;

    let existing = context.find_in_scope(|entry| {
        refinement_args(arena, entry.ty)
            .is_some_and(|(from, to)| arena.equal(to, output) && !arena.equal(from, input))
    })?;
    let (via, _) = refinement_args(arena, existing.ty)?;

    let bridge_ty = context.refinement_like(target, input, via)?;
    let bridge = context.resolve(bridge_ty)?;
    compose(context, target, bridge, existing)
}

/// `Refinement<A, M & N>` as `Refinement<A, A & M>` then `Refinement<A & M, A & M & N>`.
pub fn decomposition(context: &mut ResolutionContext<'_>, target: TypeId) -> Option<Resolution> {
    let arena = context.arena();
    let (input, output) = refinement_args(arena, target)?;
    if !is_intersection(arena, output) {
        return None;
    }

    let first = *intersection_members(arena, output).first()?;
    let middle = arena.intersection2(input, first);
    let whole = arena.intersection2(input, output);

    let head_ty = context.refinement_like(target, input, middle)?;
    let tail_ty = context.refinement_like(target, middle, whole)?;
    if arena.equal(target, head_ty) || arena.equal(target, tail_ty) {
        return None;
    }

    if arena.equal(input, middle) {
        return context.resolve(tail_ty);
    }
    if arena.equal(middle, whole) {
        return context.resolve(head_ty);
    }

    let head = context.resolve(head_ty)?;
    let tail = context.resolve(tail_ty)?;
    compose(context, target, head, tail)
}

/// A way to validate one brand.
enum ValidatorSource {
    /// A relation or brand identifier already in scope, accepting `input`.
    Existing { found: Resolution, input: TypeId },
    /// A numeric constraint constructor to call.
    Constructor {
        constructor: Resolution,
        constraint: NumericConstraint,
    },
}

fn validator_source(context: &ResolutionContext<'_>, brand: TypeId) -> Option<ValidatorSource> {
    let arena = context.arena();
    let payload = brand_payload(arena, brand)?;

    let existing = context.find_in_scope(|entry| {
        let establishes_brand = refinement_args(arena, entry.ty)
            .and_then(|(_, to)| last_output_member(arena, to))
            .is_some_and(|last| arena.equal(last, brand));
        establishes_brand
            || brand_identifier_args(arena, entry.ty)
                .is_some_and(|(_, identified)| arena.equal(identified, payload))
    });

    if let Some(found) = existing {
        let input = match refinement_args(arena, found.ty) {
            Some((input, _)) => input,
            None => {
                let (branded, _) = brand_identifier_args(arena, found.ty)?;
                let unbranded: SmallVec<[TypeId; 4]> = intersection_members(arena, branded)
                    .into_iter()
                    .filter(|&member| !arena.equal(member, brand))
                    .collect();
                arena.intersection(&unbranded)
            }
        };
        return Some(ValidatorSource::Existing { found, input });
    }

    let constraint = brand_constraint(arena, brand)?;
    let signature = constraint.kind.signature();
    let constructor = context.find_in_scope(|entry| is_unsupported_with(arena, entry.ty, signature))?;
    Some(ValidatorSource::Constructor {
        constructor,
        constraint,
    })
}

/// Turn a validator source into a resolution and the type it accepts.
fn instantiate_validator(
    context: &mut ResolutionContext<'_>,
    target: TypeId,
    output: TypeId,
    brand: TypeId,
    source: ValidatorSource,
) -> Option<(Resolution, TypeId)> {
    match source {
        ValidatorSource::Existing { found, input } => Some((found, input)),
        ValidatorSource::Constructor {
            constructor,
            constraint,
        } => {
            let arena = context.arena();
            let plain: SmallVec<[TypeId; 4]> = intersection_members(arena, output)
                .into_iter()
                .filter(|&member| !is_brand(arena, member))
                .collect();
            let unbranded = arena.intersection(&plain);
            let branded = arena.intersection2(unbranded, brand);
            let ty = context.refinement_like(target, unbranded, branded)?;

            if let Some(existing) = context.find_assignable(ty) {
                return Some((existing, unbranded));
            }
            let plan = Plan::call(
                constructor.plan,
                vec![Plan::NumericLiteral(constraint.literal)],
            );
            Some((context.providing(Resolution::new(ty, plan)), unbranded))
        }
    }
}

/// Apply `validator` (accepting `validator_input`) to values of `base`.
fn validator_at(
    context: &mut ResolutionContext<'_>,
    target: TypeId,
    base: TypeId,
    brand: TypeId,
    validator: Resolution,
    validator_input: TypeId,
) -> Option<Resolution> {
    let arena = context.arena();
    if arena.is_assignable_to(base, validator_input) {
        return Some(validator);
    }

    let bridge_ty = context.refinement_like(target, base, validator_input)?;
    if arena.equal(bridge_ty, target) {
        return None;
    }
    let bridge = context.resolve(bridge_ty)?;
    let ty = context.refinement_like(target, base, arena.intersection2(base, brand))?;
    compose(context, ty, bridge, validator)
}

/// `Refinement<A, A & ... & Brand<K> & ...>`
pub fn brand(context: &mut ResolutionContext<'_>, target: TypeId) -> Option<Resolution> {
    let arena = context.arena();
    let (input, output) = refinement_args(arena, target)?;
    if !is_intersection(arena, output) {
        return None;
    }

    let residual: SmallVec<[TypeId; 4]> = intersection_members(arena, output)
        .into_iter()
        .filter(|&member| !arena.is_assignable_to(input, member))
        .collect();
    let position = residual.iter().position(|&member| is_brand(arena, member))?;
    let brand = residual[position];
    let gap = &residual[..position];
    let rest = &residual[position + 1..];

    let base = if gap.is_empty() {
        input
    } else {
        let mut members: SmallVec<[TypeId; 4]> = smallvec![input];
        members.extend_from_slice(gap);
        arena.intersection(&members)
    };

    let source = validator_source(context, brand);

    let bridge = if gap.is_empty() {
        None
    } else {
        let bridge_ty = context.refinement_like(target, input, base)?;
        let resolved = if arena.equal(bridge_ty, target) {
            None
        } else {
            context.resolve(bridge_ty)
        };
        match resolved {
            Some(bridge) => Some(bridge),
            None => {
                // Nothing reaches the brand's base; only acceptable when no
                // brand from here on checks anything at runtime.
                let unchecked = source.is_none()
                    && rest.iter().all(|&member| {
                        is_brand(arena, member) && validator_source(context, member).is_none()
                    });
                if !unchecked {
                    return None;
                }
                trace!(?target, "unchecked brands without a bridge");
                return always_true(context, target);
            }
        }
    };

    let validator = match source {
        Some(source) => {
            let (validator, validator_input) =
                instantiate_validator(context, target, output, brand, source)?;
            Some(validator_at(
                context,
                target,
                base,
                brand,
                validator,
                validator_input,
            )?)
        }
        None => None,
    };

    let branded_base = arena.intersection2(base, brand);
    let remainder = if rest.is_empty() {
        None
    } else {
        let remainder_ty = context.refinement_like(target, branded_base, output)?;
        if arena.equal(remainder_ty, target) {
            return None;
        }
        Some(context.resolve(remainder_ty)?)
    };

    let chain = match (validator, remainder) {
        (None, None) => {
            let ty = context.refinement_like(target, base, branded_base)?;
            always_true(context, ty)?
        }
        (None, Some(remainder)) => remainder,
        (Some(validator), None) => validator,
        (Some(validator), Some(remainder)) => {
            let ty = context.refinement_like(target, base, output)?;
            compose(context, ty, validator, remainder)?
        }
    };

    match bridge {
        Some(bridge) => compose(context, target, bridge, chain),
        None => Some(chain),
    }
}

#[cfg(test)]
#[path = "../../tests/refinement_tests.rs"]
mod tests;
