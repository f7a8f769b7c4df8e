//! Shape queries over arena cells.
//!
//! Rules inspect types through these helpers instead of matching on
//! [`TypeData`] directly, so an unfilled placeholder simply answers "no".

use crate::arena::TypeArena;
use crate::types::{TypeData, TypeId, TypeReference};
use smallvec::{SmallVec, smallvec};

/// The reference data of `id` when it is a reference named `name`.
pub fn reference_named(arena: &TypeArena, id: TypeId, name: &str) -> Option<TypeReference> {
    match arena.lookup(id).as_deref() {
        Some(TypeData::Reference(reference)) if reference.name == name => Some(reference.clone()),
        _ => None,
    }
}

pub fn is_reference_named(arena: &TypeArena, id: TypeId, name: &str) -> bool {
    matches!(
        arena.lookup(id).as_deref(),
        Some(TypeData::Reference(reference)) if reference.name == name
    )
}

/// Arguments of a reference named `name`.
pub fn reference_args_named(
    arena: &TypeArena,
    id: TypeId,
    name: &str,
) -> Option<SmallVec<[TypeId; 2]>> {
    reference_named(arena, id, name).map(|reference| reference.args)
}

pub fn is_intersection(arena: &TypeArena, id: TypeId) -> bool {
    matches!(arena.lookup(id).as_deref(), Some(TypeData::Intersection(_)))
}

/// Members of an intersection, or the type itself for anything else.
pub fn intersection_members(arena: &TypeArena, id: TypeId) -> SmallVec<[TypeId; 4]> {
    match arena.lookup(id).as_deref() {
        Some(TypeData::Intersection(members)) => members.clone(),
        _ => smallvec![id],
    }
}

pub fn string_literal(arena: &TypeArena, id: TypeId) -> Option<String> {
    match arena.lookup(id).as_deref() {
        Some(TypeData::StringLiteral(value)) => Some(value.clone()),
        _ => None,
    }
}

pub fn unsupported_text(arena: &TypeArena, id: TypeId) -> Option<String> {
    match arena.lookup(id).as_deref() {
        Some(TypeData::Unsupported(text)) => Some(text.clone()),
        _ => None,
    }
}

/// `true` when `id` is an opaque type whose host rendering is exactly `text`.
///
/// Generic function signatures cannot be modeled structurally, so witnesses
/// and combinators are recognized by their rendered signature.
pub fn is_unsupported_with(arena: &TypeArena, id: TypeId, text: &str) -> bool {
    matches!(arena.lookup(id).as_deref(), Some(TypeData::Unsupported(t)) if t == text)
}
