//! Translation of host-checker types into arena cells.
//!
//! The host (a real type checker, or the JSON type tables of a derivation
//! request) is reached only through [`HostTypeQuery`], which describes one
//! host type at a time as a [`HostShape`]. [`TypeTranslator`] memoizes per
//! host handle and allocates a placeholder before translating children, so
//! a host type that mentions itself gets the very same cell back.

use crate::arena::{NormalizedIntersection, TypeArena};
use crate::types::{Member, Tag, TypeData, TypeId, Variance};
use rustc_hash::FxHashMap;
use smallvec::smallvec;
use std::hash::Hash;
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Unknown,
    Object,
}

impl PrimitiveKind {
    pub const fn type_id(self) -> TypeId {
        match self {
            PrimitiveKind::String => TypeId::STRING,
            PrimitiveKind::Number => TypeId::NUMBER,
            PrimitiveKind::Unknown => TypeId::UNKNOWN,
            PrimitiveKind::Object => TypeId::OBJECT,
        }
    }
}

/// A property of a host object type.
#[derive(Clone, Debug, PartialEq)]
pub struct HostProperty<H> {
    pub name: String,
    pub ty: H,
}

/// One level of a host type, with children left as host handles.
#[derive(Clone, Debug, PartialEq)]
pub enum HostShape<H> {
    Primitive(PrimitiveKind),
    StringLiteral(String),
    NumberLiteral(f64),
    /// A class or interface declaration.
    ClassOrInterface {
        name: String,
        properties: Vec<HostProperty<H>>,
    },
    Intersection(Vec<H>),
    /// An anonymous object or function type literal.
    Anonymous {
        text: String,
        properties: Vec<HostProperty<H>>,
        has_call_signature: bool,
    },
    /// An instantiated generic declaration.
    Reference {
        name: String,
        args: Vec<H>,
        tags: Vec<Tag>,
        variances: Option<Vec<Variance>>,
    },
    /// Anything else; `text` is the host's own rendering.
    Other { text: String },
}

impl<H> HostShape<H> {
    /// Classify a leaf type from its host rendering.
    ///
    /// Recognizes the primitive keywords, numeric literals (`0`, `-1`, `1.5`)
    /// and double-quoted string literals; everything else is [`Other`].
    ///
    /// [`Other`]: HostShape::Other
    pub fn from_text(text: &str) -> Self {
        match text {
            "string" => return HostShape::Primitive(PrimitiveKind::String),
            "number" => return HostShape::Primitive(PrimitiveKind::Number),
            "unknown" => return HostShape::Primitive(PrimitiveKind::Unknown),
            "object" => return HostShape::Primitive(PrimitiveKind::Object),
            _ => {}
        }
        if let Some(value) = parse_number_literal(text) {
            return HostShape::NumberLiteral(value);
        }
        if let Some(inner) = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .filter(|inner| !inner.contains('"'))
        {
            return HostShape::StringLiteral(inner.to_string());
        }
        HostShape::Other {
            text: text.to_string(),
        }
    }
}

/// `-?\d+\.?\d*`
fn parse_number_literal(text: &str) -> Option<f64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (integral, fractional) = match digits.split_once('.') {
        Some((integral, fractional)) => (integral, fractional),
        None => (digits, ""),
    };
    if integral.is_empty()
        || !integral.bytes().all(|b| b.is_ascii_digit())
        || !fractional.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    text.trim_end_matches('.').parse().ok()
}

/// Access to the host checker's types.
pub trait HostTypeQuery {
    type Handle: Copy + Eq + Hash;

    fn describe(&self, handle: Self::Handle) -> HostShape<Self::Handle>;
}

/// Memoizing host-to-arena translator for one translation pass.
pub struct TypeTranslator<'a, Q: HostTypeQuery> {
    arena: &'a TypeArena,
    query: &'a Q,
    cache: FxHashMap<Q::Handle, TypeId>,
}

impl<'a, Q: HostTypeQuery> TypeTranslator<'a, Q> {
    pub fn new(arena: &'a TypeArena, query: &'a Q) -> Self {
        Self {
            arena,
            query,
            cache: FxHashMap::default(),
        }
    }

    pub fn arena(&self) -> &'a TypeArena {
        self.arena
    }

    /// Number of distinct host types translated so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn translate(&mut self, handle: Q::Handle) -> TypeId {
        if let Some(&id) = self.cache.get(&handle) {
            return id;
        }

        let shape = self.query.describe(handle);
        if let HostShape::Primitive(kind) = shape {
            let id = kind.type_id();
            self.cache.insert(handle, id);
            return id;
        }

        // Register before descending so cycles land on this cell.
        let id = self.arena.placeholder();
        self.cache.insert(handle, id);

        match shape {
            HostShape::Primitive(kind) => {
                if let Some(data) = self.arena.lookup(kind.type_id()) {
                    self.arena.fill_shared(id, data);
                }
            }
            HostShape::StringLiteral(value) => self.arena.fill(id, TypeData::StringLiteral(value)),
            HostShape::NumberLiteral(value) => self.arena.fill(id, TypeData::NumberLiteral(value)),
            HostShape::ClassOrInterface { name, properties } => {
                let members = self.translate_properties(properties);
                self.arena.fill(id, TypeData::Interface { name, members });
            }
            HostShape::Anonymous {
                text,
                has_call_signature: true,
                ..
            }
            | HostShape::Other { text } => self.arena.fill(id, TypeData::Unsupported(text)),
            HostShape::Anonymous { properties, .. } => {
                let members = self.translate_properties(properties);
                self.arena.fill(id, TypeData::Structural { members });
            }
            HostShape::Reference {
                name,
                args,
                tags,
                variances,
            } => {
                let args: Vec<TypeId> = args.into_iter().map(|arg| self.translate(arg)).collect();
                let reference = TypeArena::reference_data(name, &args, tags, variances);
                self.arena.fill(id, TypeData::Reference(reference));
            }
            HostShape::Intersection(members) => {
                let members: Vec<TypeId> = members.into_iter().map(|m| self.translate(m)).collect();
                self.fill_intersection(id, &members);
            }
        }

        trace!(?id, "translated host type");
        id
    }

    fn translate_properties(&mut self, properties: Vec<HostProperty<Q::Handle>>) -> Vec<Member> {
        properties
            .into_iter()
            .map(|property| Member::new(property.name, self.translate(property.ty)))
            .collect()
    }

    fn fill_intersection(&mut self, id: TypeId, members: &[TypeId]) {
        match self.arena.normalize_intersection(members) {
            NormalizedIntersection::Empty => self.arena.fill(id, TypeData::Unknown),
            NormalizedIntersection::Single(only) => match self.arena.lookup(only) {
                Some(data) => self.arena.fill_shared(id, data),
                // The survivor is a cell still being translated; keep the
                // indirection so the cycle stays intact.
                None => self
                    .arena
                    .fill(id, TypeData::Intersection(smallvec![only])),
            },
            NormalizedIntersection::Many(members) => {
                self.arena.fill(id, TypeData::Intersection(members));
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/translate_tests.rs"]
mod tests;
