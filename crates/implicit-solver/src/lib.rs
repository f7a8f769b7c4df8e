//! Type model for implicit resolution.
//!
//! Host types are translated into a [`TypeArena`] of shared cells and then
//! compared with a small structural assignability relation:
//!
//! - **Arena of cells**: placeholder-then-fill, so cyclic host types translate
//!   to cyclic cell graphs instead of recursing forever
//! - **Eager normalization**: intersections are flat, deduplicated and never
//!   contain `unknown`
//! - **Coinductive relation**: a pair already under comparison is assumed to
//!   hold, with a hard depth limit behind it
pub mod arena;
pub mod format;
pub mod queries;
pub mod recursion;
pub mod relation;
pub mod translate;
pub mod types;

pub use arena::{NormalizedIntersection, TypeArena};
pub use format::{TypeFormatter, format_number};
pub use relation::AssignabilityChecker;
pub use translate::{HostProperty, HostShape, HostTypeQuery, PrimitiveKind, TypeTranslator};
pub use types::{Member, Tag, TypeData, TypeId, TypeReference, Variance};
