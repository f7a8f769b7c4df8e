//! Centralized limits and thresholds for the resolver.
//!
//! Both the assignability relation and the rule engine recurse over type
//! structure. Structure is finite, but translated host types may be cyclic and
//! refinement rules build new goals from old ones, so each recursion carries a
//! hard ceiling in addition to its own cycle detection.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth of a single assignability check.
///
/// Cyclic shapes are handled coinductively (a pair already under comparison
/// is assumed related), so this only trips on pathologically deep but acyclic
/// types. Exceeding it answers "not assignable".
pub const MAX_RELATION_DEPTH: u32 = 100;

/// Maximum nesting depth of recursive `resolve` calls within one resolution.
///
/// Every refinement rule strictly shrinks its residual or declines, so real
/// derivations stay far below this. Exceeding it makes the goal decline.
pub const MAX_RESOLUTION_DEPTH: u32 = 64;

/// Maximum number of goals attempted within one resolution.
pub const MAX_RESOLUTION_STEPS: u32 = 10_000;

/// Maximum depth when rendering a type for diagnostics.
pub const MAX_FORMAT_DEPTH: u32 = 32;
