use super::*;

/// A tiny host: handles index into a table of shapes.
struct TableHost {
    shapes: Vec<HostShape<usize>>,
}

impl HostTypeQuery for TableHost {
    type Handle = usize;

    fn describe(&self, handle: usize) -> HostShape<usize> {
        self.shapes
            .get(handle)
            .cloned()
            .unwrap_or_else(|| HostShape::Other {
                text: format!("#{handle}"),
            })
    }
}

fn property(name: &str, ty: usize) -> HostProperty<usize> {
    HostProperty {
        name: name.to_string(),
        ty,
    }
}

#[test]
fn test_text_classification() {
    assert_eq!(
        HostShape::<usize>::from_text("number"),
        HostShape::Primitive(PrimitiveKind::Number)
    );
    assert_eq!(HostShape::<usize>::from_text("255"), HostShape::NumberLiteral(255.0));
    assert_eq!(HostShape::<usize>::from_text("-1.5"), HostShape::NumberLiteral(-1.5));
    assert_eq!(HostShape::<usize>::from_text("1."), HostShape::NumberLiteral(1.0));
    assert_eq!(
        HostShape::<usize>::from_text("\"Age\""),
        HostShape::StringLiteral("Age".to_string())
    );
    assert_eq!(
        HostShape::<usize>::from_text("Date"),
        HostShape::Other {
            text: "Date".to_string()
        }
    );
    assert_eq!(
        HostShape::<usize>::from_text("-"),
        HostShape::Other {
            text: "-".to_string()
        }
    );
}

#[test]
fn test_primitives_map_to_reserved_cells() {
    let arena = TypeArena::new();
    let host = TableHost {
        shapes: vec![
            HostShape::Primitive(PrimitiveKind::String),
            HostShape::Primitive(PrimitiveKind::Unknown),
        ],
    };
    let mut translator = TypeTranslator::new(&arena, &host);
    assert_eq!(translator.translate(0), TypeId::STRING);
    assert_eq!(translator.translate(1), TypeId::UNKNOWN);
    assert_eq!(arena.len(), TypeId::FIRST_DYNAMIC as usize);
}

#[test]
fn test_anonymous_shapes() {
    let arena = TypeArena::new();
    let host = TableHost {
        shapes: vec![
            HostShape::Anonymous {
                text: "{ x: number; }".to_string(),
                properties: vec![property("x", 2)],
                has_call_signature: false,
            },
            HostShape::Anonymous {
                text: "(u: unknown) => boolean".to_string(),
                properties: Vec::new(),
                has_call_signature: true,
            },
            HostShape::Primitive(PrimitiveKind::Number),
        ],
    };
    let mut translator = TypeTranslator::new(&arena, &host);
    let record = translator.translate(0);
    let function = translator.translate(1);

    assert_eq!(arena.stringify(record), "{ x: number }");
    assert_eq!(
        arena.lookup(function).as_deref(),
        Some(&TypeData::Unsupported("(u: unknown) => boolean".to_string()))
    );
}

#[test]
fn test_cyclic_translation_shares_cells() {
    let arena = TypeArena::new();
    // interface Tree { value: number; children: Forest }
    // interface Forest { first: Tree }
    let host = TableHost {
        shapes: vec![
            HostShape::ClassOrInterface {
                name: "Tree".to_string(),
                properties: vec![property("value", 2), property("children", 1)],
            },
            HostShape::ClassOrInterface {
                name: "Forest".to_string(),
                properties: vec![property("first", 0)],
            },
            HostShape::Primitive(PrimitiveKind::Number),
        ],
    };
    let mut translator = TypeTranslator::new(&arena, &host);
    let tree = translator.translate(0);
    let forest = translator.translate(1);
    assert_eq!(translator.cached(), 3);

    let Some(TypeData::Interface { members, .. }) = arena.lookup(forest).as_deref().cloned() else {
        panic!("forest should be an interface");
    };
    assert_eq!(members[0].ty, tree);
    assert!(arena.equal(tree, tree));
    assert_eq!(
        arena.stringify(tree),
        "{ value: number; children: { first: Tree } }"
    );
}

#[test]
fn test_reference_translation_keeps_tags_and_variances() {
    let arena = TypeArena::new();
    let host = TableHost {
        shapes: vec![
            HostShape::Reference {
                name: "Refinement".to_string(),
                args: vec![1, 2],
                tags: vec![Tag::new("z"), Tag::new("a")],
                variances: Some(vec![Variance::Contravariant, Variance::Invariant]),
            },
            HostShape::Primitive(PrimitiveKind::Unknown),
            HostShape::Primitive(PrimitiveKind::Number),
        ],
    };
    let mut translator = TypeTranslator::new(&arena, &host);
    let id = translator.translate(0);

    let Some(TypeData::Reference(reference)) = arena.lookup(id).as_deref().cloned() else {
        panic!("expected a reference");
    };
    assert_eq!(reference.args.as_slice(), &[TypeId::UNKNOWN, TypeId::NUMBER]);
    assert_eq!(reference.tags, vec![Tag::new("a"), Tag::new("z")]);
    assert_eq!(reference.variance_at(0), Some(Variance::Contravariant));
}

#[test]
fn test_intersection_translation_normalizes() {
    let arena = TypeArena::new();
    let host = TableHost {
        shapes: vec![
            HostShape::Intersection(vec![1, 2, 1]),
            HostShape::Primitive(PrimitiveKind::Number),
            HostShape::Primitive(PrimitiveKind::Unknown),
            HostShape::Intersection(vec![2]),
        ],
    };
    let mut translator = TypeTranslator::new(&arena, &host);
    let collapsed = translator.translate(0);
    let empty = translator.translate(3);

    assert!(arena.equal(collapsed, TypeId::NUMBER));
    assert_eq!(arena.stringify(collapsed), "number");
    assert_eq!(arena.lookup(empty).as_deref(), Some(&TypeData::Unknown));
    assert!(arena.equal(empty, TypeId::UNKNOWN));
}

#[test]
fn test_self_referential_intersection_terminates() {
    let arena = TypeArena::new();
    // type Loop = number & Loop
    let host = TableHost {
        shapes: vec![
            HostShape::Intersection(vec![1, 0]),
            HostShape::Primitive(PrimitiveKind::Number),
        ],
    };
    let mut translator = TypeTranslator::new(&arena, &host);
    let looped = translator.translate(0);
    assert!(arena.is_filled(looped));
    assert!(arena.is_assignable_to(looped, TypeId::NUMBER));
}
