//! Per-file naming state: module aliases and fresh identifiers.

use super::ir::ImportDecl;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

/// Generates identifiers that collide neither with each other nor with
/// names reserved by the host file.
#[derive(Clone, Debug, Default)]
pub struct UniqueNames {
    taken: FxHashSet<String>,
    counters: FxHashMap<String, u32>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as used by the host file.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// `base`, then `base_1`, `base_2`, ... skipping reserved names.
    pub fn fresh(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            let candidate = if *counter == 0 {
                base.to_string()
            } else {
                format!("{base}_{counter}")
            };
            *counter += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Module path to generated alias, in first-use order.
#[derive(Clone, Debug, Default)]
pub struct ImportMap {
    aliases: IndexMap<String, String>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for `module_path`, generating one on first request.
    pub fn alias_for(&mut self, module_path: &str, names: &mut UniqueNames) -> String {
        if let Some(alias) = self.aliases.get(module_path) {
            return alias.clone();
        }
        let alias = names.fresh("module");
        self.aliases.insert(module_path.to_string(), alias.clone());
        alias
    }

    pub fn get(&self, module_path: &str) -> Option<&str> {
        self.aliases.get(module_path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// One declaration per distinct module, in first-use order.
    pub fn declarations(&self) -> Vec<ImportDecl> {
        self.aliases
            .iter()
            .map(|(path, alias)| ImportDecl {
                alias: alias.clone(),
                path: path.clone(),
            })
            .collect()
    }
}

/// Naming state shared by every resolution in one file.
#[derive(Clone, Debug, Default)]
pub struct EmitState {
    pub imports: ImportMap,
    pub names: UniqueNames,
}

impl EmitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module_alias(&mut self, module_path: &str) -> String {
        self.imports.alias_for(module_path, &mut self.names)
    }

    pub fn fresh_name(&mut self, base: &str) -> String {
        self.names.fresh(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_names_are_sequential() {
        let mut names = UniqueNames::new();
        assert_eq!(names.fresh("derivation"), "derivation");
        assert_eq!(names.fresh("derivation"), "derivation_1");
        assert_eq!(names.fresh("module"), "module");
        assert_eq!(names.fresh("derivation"), "derivation_2");
    }

    #[test]
    fn test_fresh_names_skip_reserved() {
        let mut names = UniqueNames::new();
        names.reserve("derivation");
        names.reserve("derivation_1");
        assert_eq!(names.fresh("derivation"), "derivation_2");
    }

    #[test]
    fn test_module_alias_is_deduplicated() {
        let mut state = EmitState::new();
        let first = state.module_alias("@effect-ts/prelude");
        let other = state.module_alias("./guards");
        let again = state.module_alias("@effect-ts/prelude");

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(state.imports.len(), 2);
        assert_eq!(
            state.imports.declarations(),
            vec![
                ImportDecl {
                    alias: "module".to_string(),
                    path: "@effect-ts/prelude".to_string()
                },
                ImportDecl {
                    alias: "module_1".to_string(),
                    path: "./guards".to_string()
                },
            ]
        );
    }
}
