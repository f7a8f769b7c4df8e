//! Type arena.
//!
//! Every translated or synthesized type lives in one cell of a [`TypeArena`]
//! and is referred to by [`TypeId`]. Cells are allocated either filled
//! ([`TypeArena::alloc`] and the typed constructors) or empty
//! ([`TypeArena::placeholder`]) and filled exactly once later, which is how
//! self-referential host types are translated without infinite recursion.
//!
//! The arena is single-threaded: it uses a `RefCell` so constructors can take
//! `&self` while relation and formatting walks hold shared references.

use crate::format::TypeFormatter;
use crate::relation::AssignabilityChecker;
use crate::types::{Member, Tag, TypeData, TypeId, TypeReference, Variance};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// Result of normalizing an intersection member list.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedIntersection {
    /// Nothing left after dropping `unknown` members.
    Empty,
    /// Exactly one distinct member.
    Single(TypeId),
    /// Two or more distinct, non-intersection members.
    Many(SmallVec<[TypeId; 4]>),
}

pub struct TypeArena {
    cells: RefCell<Vec<Option<Rc<TypeData>>>>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let cells = vec![
            Some(Rc::new(TypeData::String)),
            Some(Rc::new(TypeData::Number)),
            Some(Rc::new(TypeData::Unknown)),
            Some(Rc::new(TypeData::Object)),
        ];
        debug_assert_eq!(cells.len(), TypeId::FIRST_DYNAMIC as usize);
        Self {
            cells: RefCell::new(cells),
        }
    }

    /// Number of cells, reserved ones included.
    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocate an empty cell to be filled later with [`fill`](Self::fill).
    pub fn placeholder(&self) -> TypeId {
        let mut cells = self.cells.borrow_mut();
        let id = TypeId(cells.len() as u32);
        cells.push(None);
        id
    }

    /// Fill a cell created by [`placeholder`](Self::placeholder).
    ///
    /// Filling a cell twice keeps the first value.
    pub fn fill(&self, id: TypeId, data: TypeData) {
        self.fill_shared(id, Rc::new(data));
    }

    /// Fill a placeholder with data already held by another cell.
    pub fn fill_shared(&self, id: TypeId, data: Rc<TypeData>) {
        let mut cells = self.cells.borrow_mut();
        let Some(slot) = cells.get_mut(id.index()) else {
            debug_assert!(false, "type cell {id:?} out of range");
            return;
        };
        debug_assert!(slot.is_none(), "type cell {id:?} filled twice");
        if slot.is_none() {
            *slot = Some(data);
        }
    }

    pub fn alloc(&self, data: TypeData) -> TypeId {
        let mut cells = self.cells.borrow_mut();
        let id = TypeId(cells.len() as u32);
        cells.push(Some(Rc::new(data)));
        id
    }

    /// Data of a cell, or `None` for an unfilled placeholder.
    pub fn lookup(&self, id: TypeId) -> Option<Rc<TypeData>> {
        self.cells.borrow().get(id.index()).and_then(Clone::clone)
    }

    pub fn is_filled(&self, id: TypeId) -> bool {
        self.lookup(id).is_some()
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn literal_string(&self, value: impl Into<String>) -> TypeId {
        self.alloc(TypeData::StringLiteral(value.into()))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.alloc(TypeData::NumberLiteral(value))
    }

    pub fn unsupported(&self, text: impl Into<String>) -> TypeId {
        self.alloc(TypeData::Unsupported(text.into()))
    }

    pub fn interface(&self, name: impl Into<String>, members: Vec<Member>) -> TypeId {
        self.alloc(TypeData::Interface {
            name: name.into(),
            members,
        })
    }

    pub fn structural(&self, members: Vec<Member>) -> TypeId {
        self.alloc(TypeData::Structural { members })
    }

    /// Build reference data with its tag set sorted and deduplicated.
    pub fn reference_data(
        name: impl Into<String>,
        args: &[TypeId],
        mut tags: Vec<Tag>,
        variances: Option<Vec<Variance>>,
    ) -> TypeReference {
        tags.sort();
        tags.dedup();
        TypeReference {
            name: name.into(),
            args: args.iter().copied().collect(),
            tags,
            variances,
        }
    }

    pub fn reference(
        &self,
        name: impl Into<String>,
        args: &[TypeId],
        tags: Vec<Tag>,
        variances: Option<Vec<Variance>>,
    ) -> TypeId {
        self.alloc(TypeData::Reference(Self::reference_data(
            name, args, tags, variances,
        )))
    }

    /// A copy of reference `base` with its arguments replaced.
    ///
    /// Returns `None` when `base` is not a filled reference cell.
    pub fn reference_with_args(&self, base: TypeId, args: &[TypeId]) -> Option<TypeId> {
        let data = self.lookup(base)?;
        let TypeData::Reference(reference) = &*data else {
            return None;
        };
        Some(self.alloc(TypeData::Reference(TypeReference {
            name: reference.name.clone(),
            args: args.iter().copied().collect(),
            tags: reference.tags.clone(),
            variances: reference.variances.clone(),
        })))
    }

    /// Build a normalized intersection.
    ///
    /// Nested intersections are flattened, `unknown` members dropped and
    /// mutually assignable members kept once. A single survivor is returned
    /// as-is and an empty list yields `TypeId::UNKNOWN`.
    pub fn intersection(&self, members: &[TypeId]) -> TypeId {
        match self.normalize_intersection(members) {
            NormalizedIntersection::Empty => TypeId::UNKNOWN,
            NormalizedIntersection::Single(id) => id,
            NormalizedIntersection::Many(members) => self.alloc(TypeData::Intersection(members)),
        }
    }

    pub fn intersection2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.intersection(&[left, right])
    }

    pub fn normalize_intersection(&self, members: &[TypeId]) -> NormalizedIntersection {
        let mut visited = FxHashSet::default();
        let mut flat: SmallVec<[TypeId; 4]> = SmallVec::new();
        for &member in members {
            self.flatten_into(member, &mut visited, &mut flat);
        }

        let mut distinct: SmallVec<[TypeId; 4]> = SmallVec::new();
        for candidate in flat {
            if !distinct
                .iter()
                .any(|&existing| self.equal(existing, candidate))
            {
                distinct.push(candidate);
            }
        }

        trace!(
            input = members.len(),
            output = distinct.len(),
            "normalized intersection"
        );

        match distinct.len() {
            0 => NormalizedIntersection::Empty,
            1 => NormalizedIntersection::Single(distinct[0]),
            _ => NormalizedIntersection::Many(distinct),
        }
    }

    fn flatten_into(
        &self,
        id: TypeId,
        visited: &mut FxHashSet<TypeId>,
        out: &mut SmallVec<[TypeId; 4]>,
    ) {
        if !visited.insert(id) {
            return;
        }
        match self.lookup(id).as_deref() {
            Some(TypeData::Intersection(members)) => {
                for &member in members {
                    self.flatten_into(member, visited, out);
                }
            }
            Some(TypeData::Unknown) => {}
            _ => out.push(id),
        }
    }

    // =========================================================================
    // Relations and rendering
    // =========================================================================

    /// Structural assignability `source ≤ target`.
    pub fn is_assignable_to(&self, source: TypeId, target: TypeId) -> bool {
        AssignabilityChecker::new(self).is_assignable(source, target)
    }

    /// Mutual assignability.
    pub fn equal(&self, left: TypeId, right: TypeId) -> bool {
        self.is_assignable_to(left, right) && self.is_assignable_to(right, left)
    }

    /// Canonical rendering used in diagnostics and type comments.
    pub fn stringify(&self, id: TypeId) -> String {
        TypeFormatter::new(self).format(id)
    }
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod tests;
