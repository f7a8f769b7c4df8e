//! Recursion guard for cycle detection and depth limiting in recursive
//! type computations.
//!
//! # Design
//!
//! Translated host types may be cyclic, so every walk over type structure
//! (assignability, formatting) needs two safety mechanisms:
//! 1. **Cycle detection** via a visiting set (`FxHashSet<K>`)
//! 2. **Depth limiting** to prevent stack overflow
//!
//! [`RecursionProfile`] names the limit used at each call site so the
//! numbers live in one place (`implicit_common::limits`).
//!
//! In debug builds, dropping a guard with active entries panics, catching
//! forgotten `leave()` calls.

use implicit_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Assignability between two types.
    ///
    /// Used by `AssignabilityChecker`. A revisited pair is a cycle and is
    /// answered coinductively by the caller.
    Relation,

    /// Rendering a type for diagnostics and type comments.
    ///
    /// Used by `TypeFormatter`.
    Formatting,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32 },
}

impl RecursionProfile {
    /// Maximum recursion depth for this profile.
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Relation => limits::MAX_RELATION_DEPTH,
            Self::Formatting => limits::MAX_FORMAT_DEPTH,
            Self::Custom { max_depth } => max_depth,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited; a cycle.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks recursion state for cycle detection and depth limiting.
///
/// ```ignore
/// let mut guard = RecursionGuard::with_profile(RecursionProfile::Relation);
///
/// match guard.enter(key) {
///     RecursionResult::Entered => {
///         let result = do_work();
///         guard.leave(key);
///         result
///     }
///     RecursionResult::Cycle => handle_cycle(),
///     RecursionResult::DepthExceeded => handle_exceeded(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller must call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a recursive computation for `key`.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Sticky: stays `true` once any limit was hit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_detects_cycle() {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Relation);
        assert!(guard.enter(1u32).is_entered());
        assert!(guard.enter(1u32).is_cycle());
        assert!(guard.is_visiting(&1));
        guard.leave(1);
        assert_eq!(guard.depth(), 0);
    }

    #[test]
    fn test_guard_depth_limit_is_sticky() {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Custom { max_depth: 2 });
        assert!(guard.enter(1u32).is_entered());
        assert!(guard.enter(2u32).is_entered());
        assert_eq!(guard.enter(3u32), RecursionResult::DepthExceeded);
        guard.leave(2);
        guard.leave(1);
        assert!(guard.is_exceeded());
    }
}
