//! Type data for the implicit resolution engine.
//!
//! A [`TypeId`] is a handle to one cell of a [`TypeArena`](crate::TypeArena).
//! Cells are shared by handle, never copied, so a translated host type that
//! refers to itself points back at its own cell.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// =============================================================================
// TypeId
// =============================================================================

/// Handle to a type cell in a `TypeArena`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    // Reserved cells, pre-filled by `TypeArena::new()`.
    pub const STRING: TypeId = TypeId(0);
    pub const NUMBER: TypeId = TypeId(1);
    pub const UNKNOWN: TypeId = TypeId(2);
    pub const OBJECT: TypeId = TypeId(3);

    /// First non-reserved index.
    pub const FIRST_DYNAMIC: u32 = 4;

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `true` for the pre-filled atomic cells (no arena needed).
    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

// =============================================================================
// Annotations
// =============================================================================

/// An opaque annotation marker carried by a type reference (a JSDoc tag on
/// the declaration, e.g. `@ets_typeclass`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
        }
    }
}

/// Declared variance of one type parameter of a generic declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
    Bivariant,
    Independent,
}

// =============================================================================
// TypeData
// =============================================================================

/// A named member of an interface or structural record.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub name: String,
    pub ty: TypeId,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// An instantiated generic nominal type, e.g. `Refinement<unknown, number>`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeReference {
    pub name: String,
    pub args: SmallVec<[TypeId; 2]>,
    /// Sorted and deduplicated, so set equality is slice equality.
    pub tags: Vec<Tag>,
    pub variances: Option<Vec<Variance>>,
}

impl TypeReference {
    /// Declared variance of argument `index`, when the variance list covers
    /// every argument.
    pub fn variance_at(&self, index: usize) -> Option<Variance> {
        match &self.variances {
            Some(variances) if variances.len() == self.args.len() => variances.get(index).copied(),
            _ => None,
        }
    }
}

/// The closed set of type shapes.
///
/// Intersections are only built through `TypeArena::intersection`, which
/// keeps them flat, deduplicated and free of `Unknown` members.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeData {
    String,
    Number,
    Unknown,
    Object,
    StringLiteral(String),
    NumberLiteral(f64),
    /// Opaque leaf for shapes the translator cannot model; carries the host's
    /// own rendering of the type.
    Unsupported(String),
    Interface {
        name: String,
        members: Vec<Member>,
    },
    Structural {
        members: Vec<Member>,
    },
    Reference(TypeReference),
    Intersection(SmallVec<[TypeId; 4]>),
}

impl TypeData {
    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeData::Unknown)
    }

    #[inline]
    pub fn is_intersection(&self) -> bool {
        matches!(self, TypeData::Intersection(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeData::String => "string",
            TypeData::Number => "number",
            TypeData::Unknown => "unknown",
            TypeData::Object => "object",
            TypeData::StringLiteral(_) => "string literal",
            TypeData::NumberLiteral(_) => "number literal",
            TypeData::Unsupported(_) => "unsupported",
            TypeData::Interface { .. } => "interface",
            TypeData::Structural { .. } => "structural",
            TypeData::Reference(_) => "reference",
            TypeData::Intersection(_) => "intersection",
        }
    }
}
