//! Rules that apply to every goal.

use super::Rule;
use crate::context::{Resolution, ResolutionContext};
use implicit_solver::TypeId;

pub fn rules() -> Vec<Rule> {
    vec![Rule::new("in_scope", in_scope)]
}

/// Any visible value whose type is assignable to the goal.
pub fn in_scope(context: &mut ResolutionContext<'_>, target: TypeId) -> Option<Resolution> {
    context.find_assignable(target)
}
