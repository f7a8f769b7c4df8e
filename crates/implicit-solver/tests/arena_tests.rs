use super::*;

fn brand(arena: &TypeArena, payload: &str) -> TypeId {
    let payload = arena.literal_string(payload);
    arena.reference("Brand", &[payload], Vec::new(), None)
}

#[test]
fn test_arena_intrinsics_prefilled() {
    let arena = TypeArena::new();
    assert_eq!(arena.len(), TypeId::FIRST_DYNAMIC as usize);
    assert_eq!(arena.lookup(TypeId::STRING).as_deref(), Some(&TypeData::String));
    assert_eq!(arena.lookup(TypeId::NUMBER).as_deref(), Some(&TypeData::Number));
    assert_eq!(arena.lookup(TypeId::UNKNOWN).as_deref(), Some(&TypeData::Unknown));
    assert_eq!(arena.lookup(TypeId::OBJECT).as_deref(), Some(&TypeData::Object));
}

#[test]
fn test_placeholder_then_fill() {
    let arena = TypeArena::new();
    let hole = arena.placeholder();
    assert!(!arena.is_filled(hole));
    assert!(arena.lookup(hole).is_none());

    arena.fill(hole, TypeData::StringLiteral("x".to_string()));
    assert!(arena.is_filled(hole));
    assert_eq!(
        arena.lookup(hole).as_deref(),
        Some(&TypeData::StringLiteral("x".to_string()))
    );
}

#[test]
fn test_intersection_of_one_is_that_member() {
    let arena = TypeArena::new();
    let int = brand(&arena, "Int");
    assert_eq!(arena.intersection(&[int]), int);
}

#[test]
fn test_intersection_of_none_is_unknown() {
    let arena = TypeArena::new();
    assert_eq!(arena.intersection(&[]), TypeId::UNKNOWN);
    assert_eq!(
        arena.intersection(&[TypeId::UNKNOWN, TypeId::UNKNOWN]),
        TypeId::UNKNOWN
    );
}

#[test]
fn test_intersection_dedupes_equal_members() {
    let arena = TypeArena::new();
    assert_eq!(arena.intersection(&[TypeId::NUMBER, TypeId::NUMBER]), TypeId::NUMBER);

    // Distinct cells with equal content collapse too.
    let first = brand(&arena, "Int");
    let second = brand(&arena, "Int");
    assert_ne!(first, second);
    assert_eq!(arena.intersection(&[first, second]), first);
}

#[test]
fn test_intersection_drops_unknown_members() {
    let arena = TypeArena::new();
    let int = brand(&arena, "Int");
    let id = arena.intersection(&[TypeId::UNKNOWN, TypeId::NUMBER, int]);
    assert_eq!(
        arena.lookup(id).as_deref(),
        Some(&TypeData::Intersection(smallvec::smallvec![TypeId::NUMBER, int]))
    );
}

#[test]
fn test_intersection_flattens_nested() {
    let arena = TypeArena::new();
    let a = brand(&arena, "A");
    let b = brand(&arena, "B");
    let c = brand(&arena, "C");

    let ab = arena.intersection(&[a, b]);
    let nested = arena.intersection(&[ab, c]);
    let flat = arena.intersection(&[a, b, c]);

    assert!(arena.equal(nested, flat));
    assert_eq!(arena.lookup(nested), arena.lookup(flat));
}

#[test]
fn test_intersection_through_cyclic_member_terminates() {
    let arena = TypeArena::new();
    let hole = arena.placeholder();
    let int = brand(&arena, "Int");
    // hole = number & hole & Brand<"Int">
    arena.fill(
        hole,
        TypeData::Intersection(smallvec::smallvec![TypeId::NUMBER, hole, int]),
    );

    let id = arena.intersection(&[hole, TypeId::STRING]);
    assert_eq!(
        arena.lookup(id).as_deref(),
        Some(&TypeData::Intersection(smallvec::smallvec![
            TypeId::NUMBER,
            int,
            TypeId::STRING
        ]))
    );
}

#[test]
fn test_reference_sorts_and_dedupes_tags() {
    let arena = TypeArena::new();
    let first = arena.reference(
        "Guard",
        &[TypeId::STRING],
        vec![Tag::new("b"), Tag::new("a"), Tag::new("b")],
        None,
    );
    let second = arena.reference("Guard", &[TypeId::STRING], vec![Tag::new("a"), Tag::new("b")], None);

    let Some(TypeData::Reference(reference)) = arena.lookup(first).as_deref().cloned() else {
        panic!("expected reference");
    };
    assert_eq!(reference.tags, vec![Tag::new("a"), Tag::new("b")]);
    assert!(arena.equal(first, second));
}

#[test]
fn test_reference_with_args_keeps_markers() {
    let arena = TypeArena::new();
    let variances = Some(vec![Variance::Contravariant, Variance::Invariant]);
    let base = arena.reference(
        "Refinement",
        &[TypeId::UNKNOWN, TypeId::NUMBER],
        vec![Tag::new("ets_typeclass")],
        variances.clone(),
    );
    let copy = arena
        .reference_with_args(base, &[TypeId::NUMBER, TypeId::NUMBER])
        .expect("base is a reference");

    let Some(TypeData::Reference(reference)) = arena.lookup(copy).as_deref().cloned() else {
        panic!("expected reference");
    };
    assert_eq!(reference.name, "Refinement");
    assert_eq!(reference.args.as_slice(), &[TypeId::NUMBER, TypeId::NUMBER]);
    assert_eq!(reference.tags, vec![Tag::new("ets_typeclass")]);
    assert_eq!(reference.variances, variances);

    assert!(arena.reference_with_args(TypeId::NUMBER, &[]).is_none());
}

#[test]
fn test_equal_is_reflexive_for_every_shape() {
    let arena = TypeArena::new();
    let hole = arena.placeholder();
    let nan = arena.literal_number(f64::NAN);
    let shapes = [
        TypeId::STRING,
        TypeId::NUMBER,
        TypeId::UNKNOWN,
        TypeId::OBJECT,
        arena.literal_string("a"),
        arena.literal_number(1.5),
        nan,
        arena.unsupported("() => void"),
        arena.interface("Person", vec![Member::new("name", TypeId::STRING)]),
        arena.structural(Vec::new()),
        brand(&arena, "Int"),
        arena.intersection(&[TypeId::NUMBER, brand(&arena, "Int")]),
        hole,
    ];
    for id in shapes {
        assert!(arena.equal(id, id), "{} should equal itself", arena.stringify(id));
    }
}
