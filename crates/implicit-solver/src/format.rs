//! Type formatting for diagnostics and type comments.

use crate::arena::TypeArena;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{Member, TypeData, TypeId};

/// Renders types in the canonical form used by derivation diagnostics:
/// `Refinement<unknown, number & Brand<"Int">>`, `{ a: string; b: number }`.
pub struct TypeFormatter<'a> {
    arena: &'a TypeArena,
    guard: RecursionGuard<TypeId>,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self {
            arena,
            guard: RecursionGuard::with_profile(RecursionProfile::Formatting),
        }
    }

    pub fn format(&mut self, id: TypeId) -> String {
        let Some(data) = self.arena.lookup(id) else {
            return "...".to_string();
        };

        match self.guard.enter(id) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle | RecursionResult::DepthExceeded => {
                return match &*data {
                    TypeData::Interface { name, .. } => name.clone(),
                    _ => "...".to_string(),
                };
            }
        }

        let rendered = match &*data {
            TypeData::String => "string".to_string(),
            TypeData::Number => "number".to_string(),
            TypeData::Unknown => "unknown".to_string(),
            TypeData::Object => "object".to_string(),
            TypeData::StringLiteral(value) => format!("\"{value}\""),
            TypeData::NumberLiteral(value) => format_number(*value),
            TypeData::Unsupported(text) => text.clone(),
            TypeData::Interface { members, .. } | TypeData::Structural { members } => {
                self.format_members(members)
            }
            TypeData::Reference(reference) => {
                if reference.args.is_empty() {
                    reference.name.clone()
                } else {
                    let args: Vec<String> =
                        reference.args.iter().map(|&arg| self.format(arg)).collect();
                    format!("{}<{}>", reference.name, args.join(", "))
                }
            }
            TypeData::Intersection(members) => {
                let parts: Vec<String> = members.iter().map(|&m| self.format(m)).collect();
                parts.join(" & ")
            }
        };

        self.guard.leave(id);
        rendered
    }

    fn format_members(&mut self, members: &[Member]) -> String {
        if members.is_empty() {
            return "{}".to_string();
        }
        let fields: Vec<String> = members
            .iter()
            .map(|member| format!("{}: {}", member.name, self.format(member.ty)))
            .collect();
        format!("{{ {} }}", fields.join("; "))
    }
}

/// Render a number the way JavaScript's `String(n)` does for the values that
/// occur in type literals.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // Covers -0.
        return "0".to_string();
    }
    value.to_string()
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
