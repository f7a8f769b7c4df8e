use super::*;
use crate::emit::{EmitState, Printer, print_expr};
use crate::prelude::RefinedPrelude;
use crate::rules::{RuleFn, RuleSet};
use crate::scope::Scope;
use implicit_common::DeriveOptions;
use implicit_solver::TypeArena;

fn prelude_scope(prelude: &RefinedPrelude<'_>) -> Scope {
    let mut scope = Scope::new();
    for (export, ty) in prelude.exports() {
        scope.push_module(ty, Vec::new(), "refined", export);
    }
    scope
}

/// Apply one rule to `target` and print what it emits, then the final
/// expression after `=>`.
fn apply(arena: &TypeArena, scope: &Scope, rule: RuleFn, target: TypeId) -> Option<String> {
    let rules = RuleSet::standard();
    let mut statements = Vec::new();
    let mut emit = EmitState::new();
    let mut context = ResolutionContext::new(
        arena,
        &rules,
        DeriveOptions::default(),
        scope,
        &mut statements,
        &mut emit,
    );
    let resolution = rule(&mut context, target)?;
    let expr = context.realize(&resolution.plan);
    drop(context);

    let mut printer = Printer::new();
    for statement in &statements {
        printer.emit_statement(statement);
    }
    Some(format!("{}=> {}", printer.finish(), print_expr(&expr)))
}

#[test]
fn test_identity_uses_always_true() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let scope = prelude_scope(&prelude);

    let target = prelude.refinement(prelude.int(), TypeId::NUMBER);
    assert_eq!(
        apply(&arena, &scope, identity, target).as_deref(),
        Some("const derivation = /*#__PURE__*/ module.isAlwaysTrue();\n=> derivation")
    );
}

#[test]
fn test_identity_declines_narrowing() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let scope = prelude_scope(&prelude);

    let target = prelude.refinement(TypeId::UNKNOWN, TypeId::NUMBER);
    assert_eq!(apply(&arena, &scope, identity, target), None);
}

#[test]
fn test_identity_needs_witness_in_scope() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let mut scope = Scope::new();
    scope.push_module(prelude.compose, Vec::new(), "refined", "compose");

    let target = prelude.refinement(TypeId::NUMBER, TypeId::NUMBER);
    assert_eq!(apply(&arena, &scope, identity, target), None);
}

#[test]
fn test_transitivity_bridges_to_existing_relation() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let mut scope = prelude_scope(&prelude);
    let positive = prelude.branded(TypeId::NUMBER, "Positive");
    scope.push_local(prelude.refinement(TypeId::NUMBER, positive), "isPositive");

    let target = prelude.refinement(TypeId::UNKNOWN, positive);
    assert_eq!(
        apply(&arena, &scope, transitivity, target).as_deref(),
        Some(
            "const derivation = /*#__PURE__*/ module.compose(module.isNumber, isPositive);\n\
             => derivation"
        )
    );
}

#[test]
fn test_transitivity_ignores_relation_with_same_input() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let mut scope = prelude_scope(&prelude);
    let positive = prelude.branded(TypeId::NUMBER, "Positive");
    scope.push_local(prelude.refinement(TypeId::NUMBER, positive), "isPositive");

    let target = prelude.refinement(TypeId::NUMBER, positive);
    assert_eq!(apply(&arena, &scope, transitivity, target), None);
}

#[test]
fn test_decomposition_splits_first_member() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let mut scope = prelude_scope(&prelude);
    let positive = prelude.branded(TypeId::NUMBER, "Positive");
    scope.push_local(prelude.refinement(TypeId::NUMBER, positive), "isPositive");

    let target = prelude.refinement(TypeId::UNKNOWN, positive);
    assert_eq!(
        apply(&arena, &scope, decomposition, target).as_deref(),
        Some(
            "const derivation = /*#__PURE__*/ module.compose(module.isNumber, isPositive);\n\
             => derivation"
        )
    );
}

#[test]
fn test_decomposition_declines_plain_output() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let scope = prelude_scope(&prelude);

    let target = prelude.refinement(TypeId::UNKNOWN, TypeId::NUMBER);
    assert_eq!(apply(&arena, &scope, decomposition, target), None);
}

#[test]
fn test_brand_calls_numeric_constructor() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let scope = prelude_scope(&prelude);

    let target = prelude.refinement(TypeId::NUMBER, prelude.min(TypeId::NUMBER, 0.0));
    assert_eq!(
        apply(&arena, &scope, brand, target).as_deref(),
        Some("const derivation = /*#__PURE__*/ module.isMin(0);\n=> derivation")
    );
}

#[test]
fn test_brand_keeps_negative_and_fractional_bounds() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let scope = prelude_scope(&prelude);

    let target = prelude.refinement(TypeId::NUMBER, prelude.max(TypeId::NUMBER, -2.5));
    assert_eq!(
        apply(&arena, &scope, brand, target).as_deref(),
        Some("const derivation = /*#__PURE__*/ module.isMax(-2.5);\n=> derivation")
    );
}

#[test]
fn test_unchecked_brand_is_always_true() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let scope = prelude_scope(&prelude);

    let target = prelude.refinement(TypeId::NUMBER, prelude.branded(TypeId::NUMBER, "Age"));
    assert_eq!(
        apply(&arena, &scope, brand, target).as_deref(),
        Some("const derivation = /*#__PURE__*/ module.isAlwaysTrue();\n=> derivation")
    );
}

#[test]
fn test_brand_reuses_existing_validator_after_bridge() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let mut scope = prelude_scope(&prelude);
    let positive = prelude.branded(TypeId::NUMBER, "Positive");
    scope.push_local(prelude.refinement(TypeId::NUMBER, positive), "isPositive");

    let target = prelude.refinement(TypeId::UNKNOWN, positive);
    assert_eq!(
        apply(&arena, &scope, brand, target).as_deref(),
        Some(
            "const derivation = /*#__PURE__*/ module.compose(module.isNumber, isPositive);\n\
             => derivation"
        )
    );
}

#[test]
fn test_brand_declines_without_brand_member() {
    let arena = TypeArena::new();
    let prelude = RefinedPrelude::declare(&arena);
    let scope = prelude_scope(&prelude);

    let pair = arena.intersection2(TypeId::NUMBER, TypeId::STRING);
    let target = prelude.refinement(TypeId::UNKNOWN, pair);
    assert_eq!(apply(&arena, &scope, brand, target), None);
}

#[test]
fn test_rule_order() {
    let names: Vec<&str> = rules().iter().map(|rule| rule.name).collect();
    assert_eq!(
        names,
        vec![
            "refinement_identity",
            "refinement_transitivity",
            "refinement_decomposition",
            "refinement_brand"
        ]
    );
}
