//! JSON derivation requests.
//!
//! A request stands in for a host checker: it describes the types involved,
//! what is in scope, and which types to derive at which locations.
//!
//! ```json
//! {
//!   "file": "src/person.ts",
//!   "prelude": "@refined/prelude",
//!   "types": {
//!     "Name": { "kind": "intersection", "members": ["string", "NameBrand"] },
//!     "NameBrand": { "kind": "reference", "name": "Brand", "args": ["\"Name\""] },
//!     "IsName": {
//!       "kind": "reference",
//!       "name": "Refinement",
//!       "args": ["unknown", "Name"],
//!       "variances": ["contravariant", "invariant"]
//!     }
//!   },
//!   "targets": [{ "name": "isName", "type": "IsName", "line": 3, "column": 14 }]
//! }
//! ```
//!
//! Type references are names from `types`, or leaf texts (`string`,
//! `number`, `unknown`, `object`, `"literal"`, `42`).

use anyhow::{Context, Result, bail};
use implicit_common::{DeriveOptions, SourceLocation};
use implicit_resolver::emit::Printer;
use implicit_resolver::{
    Evaluator, Expr, ImplicitScope, ImportDecl, Predicate, RefinedPrelude, RuleSet,
    Statement,
};
use implicit_solver::{
    HostProperty, HostShape, HostTypeQuery, Tag, TypeArena, TypeTranslator, Variance,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

// =============================================================================
// Request model
// =============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeriveRequest {
    /// File the derivation sites belong to.
    #[serde(default = "default_file")]
    pub file: String,
    #[serde(default)]
    pub options: DeriveOptions,
    /// Module path under which the refined prelude is visible.
    #[serde(default)]
    pub prelude: Option<String>,
    #[serde(default)]
    pub types: BTreeMap<String, TypeDecl>,
    #[serde(default)]
    pub modules: Vec<ModuleDecl>,
    #[serde(default)]
    pub locals: Vec<LocalDecl>,
    pub targets: Vec<TargetDecl>,
}

fn default_file() -> String {
    "input.ts".to_string()
}

/// One host type, with children named by type reference.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeDecl {
    /// A class or interface.
    Interface {
        name: String,
        #[serde(default)]
        properties: Vec<PropertyDecl>,
    },
    /// An anonymous object literal type, or a function type when
    /// `callSignature` is set.
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        properties: Vec<PropertyDecl>,
        #[serde(default)]
        call_signature: bool,
    },
    Intersection { members: Vec<String> },
    /// An instantiated generic declaration.
    Reference {
        name: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        tags: Vec<Tag>,
        #[serde(default)]
        variances: Option<Vec<Variance>>,
    },
    /// A leaf classified from its rendering.
    Text { text: String },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDecl {
    pub path: String,
    pub exports: Vec<ExportDecl>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDecl {
    /// Binding for the derived value; generated when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    pub line: u32,
    pub column: u32,
}

impl DeriveRequest {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid derivation request")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

// =============================================================================
// Host graph
// =============================================================================

/// The request's type table as a [`HostTypeQuery`]; handles are indices.
#[derive(Debug, Default)]
pub struct HostGraph {
    nodes: Vec<HostShape<usize>>,
    handles: FxHashMap<String, usize>,
}

impl HostGraph {
    pub fn new(types: &BTreeMap<String, TypeDecl>) -> Result<Self> {
        let mut graph = Self::default();
        // Names first, so declarations can mention each other in any order.
        for name in types.keys() {
            graph.handles.insert(name.clone(), graph.nodes.len());
            graph.nodes.push(HostShape::Other { text: name.clone() });
        }
        for (handle, (name, decl)) in types.iter().enumerate() {
            let shape = graph
                .shape(name, decl)
                .with_context(|| format!("in type `{name}`"))?;
            graph.nodes[handle] = shape;
        }
        Ok(graph)
    }

    /// Handle for a type reference, classifying leaf texts on first use.
    pub fn handle(&mut self, reference: &str) -> Result<usize> {
        if let Some(&handle) = self.handles.get(reference) {
            return Ok(handle);
        }
        let shape = HostShape::from_text(reference);
        if matches!(shape, HostShape::Other { .. }) && is_identifier(reference) {
            bail!("unknown type `{reference}`");
        }
        let handle = self.nodes.len();
        self.nodes.push(shape);
        self.handles.insert(reference.to_string(), handle);
        Ok(handle)
    }

    fn shape(&mut self, name: &str, decl: &TypeDecl) -> Result<HostShape<usize>> {
        let shape = match decl {
            TypeDecl::Interface { name, properties } => HostShape::ClassOrInterface {
                name: name.clone(),
                properties: self.properties(properties)?,
            },
            TypeDecl::Object {
                text,
                properties,
                call_signature,
            } => HostShape::Anonymous {
                text: text.clone().unwrap_or_else(|| name.to_string()),
                properties: self.properties(properties)?,
                has_call_signature: *call_signature,
            },
            TypeDecl::Intersection { members } => HostShape::Intersection(
                members
                    .iter()
                    .map(|member| self.handle(member))
                    .collect::<Result<_>>()?,
            ),
            TypeDecl::Reference {
                name,
                args,
                tags,
                variances,
            } => HostShape::Reference {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|arg| self.handle(arg))
                    .collect::<Result<_>>()?,
                tags: tags.clone(),
                variances: variances.clone(),
            },
            TypeDecl::Text { text } => HostShape::from_text(text),
        };
        Ok(shape)
    }

    fn properties(&mut self, properties: &[PropertyDecl]) -> Result<Vec<HostProperty<usize>>> {
        properties
            .iter()
            .map(|property| {
                Ok(HostProperty {
                    name: property.name.clone(),
                    ty: self.handle(&property.ty)?,
                })
            })
            .collect()
    }
}

impl HostTypeQuery for HostGraph {
    type Handle = usize;

    fn describe(&self, handle: usize) -> HostShape<usize> {
        self.nodes
            .get(handle)
            .cloned()
            .unwrap_or_else(|| HostShape::Other {
                text: format!("<missing type {handle}>"),
            })
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// =============================================================================
// Running a request
// =============================================================================

/// A derived target, bound in the output program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedTarget {
    pub name: String,
    pub location: SourceLocation,
    /// Rendering of the requested type.
    pub rendered: String,
    pub expr: Expr,
}

#[derive(Clone, Debug)]
pub struct DeriveOutput {
    pub imports: Vec<ImportDecl>,
    /// Derivation statements and target bindings, in emission order.
    pub statements: Vec<Statement>,
    pub targets: Vec<DerivedTarget>,
    pub prelude: Option<String>,
}

impl DeriveOutput {
    /// The output program as JavaScript.
    pub fn code(&self) -> String {
        let mut printer = Printer::new();
        printer.emit_program(&self.imports, &self.statements);
        printer.finish()
    }

    /// Evaluate target `index` against the refined prelude's runtime.
    pub fn predicate(&self, index: usize) -> Result<Predicate> {
        let Some(prelude) = &self.prelude else {
            bail!("the request has no prelude to evaluate against");
        };
        let Some(target) = self.targets.get(index) else {
            bail!("no target #{index}");
        };
        Evaluator::new(prelude.clone())
            .run(&self.imports, &self.statements, &Expr::id(target.name.clone()))
            .with_context(|| format!("evaluating `{}`", target.name))
    }
}

/// Resolve every target of `request` in one file context.
///
/// Fails on the first target no rule can resolve; the error wraps the
/// [`DerivationError`](implicit_resolver::DerivationError).
pub fn run(request: &DeriveRequest) -> Result<DeriveOutput> {
    let mut graph = HostGraph::new(&request.types)?;

    // Classify every reference before the translator borrows the graph.
    let mut exports = Vec::new();
    for module in &request.modules {
        for export in &module.exports {
            exports.push((module, export, graph.handle(&export.ty)?));
        }
    }
    let locals = request
        .locals
        .iter()
        .map(|local| Ok((local, graph.handle(&local.ty)?)))
        .collect::<Result<Vec<_>>>()?;
    let targets = request
        .targets
        .iter()
        .map(|target| Ok((target, graph.handle(&target.ty)?)))
        .collect::<Result<Vec<_>>>()?;

    let arena = TypeArena::new();
    let rules = RuleSet::standard();
    let mut translator = TypeTranslator::new(&arena, &graph);
    let mut scope = ImplicitScope::new(&arena, &rules, request.options);

    if let Some(prelude) = &request.prelude {
        RefinedPrelude::declare(&arena).register(&mut scope, prelude);
    }
    for (module, export, handle) in exports {
        let ty = translator.translate(handle);
        scope.push_module(ty, export.tags.clone(), module.path.clone(), export.name.clone());
    }
    for (local, handle) in locals {
        let ty = translator.translate(handle);
        scope.push_local(ty, local.name.clone());
    }
    for (target, _) in &targets {
        if let Some(name) = &target.name {
            scope.emit_state().borrow_mut().names.reserve(name.clone());
        }
    }
    debug!(types = translator.cached(), "translated scope");

    let mut statements = Vec::new();
    let mut derived = Vec::with_capacity(targets.len());
    for (target, handle) in targets {
        let ty = translator.translate(handle);
        let location = SourceLocation::new(request.file.clone(), target.line, target.column);
        let resolved = scope.resolve_implementation(ty, &location, &mut statements)?;
        scope.register_derivations(&resolved.derivations);

        let name = match &target.name {
            Some(name) => name.clone(),
            None => scope.emit_state().borrow_mut().fresh_name("derived"),
        };
        info!(%location, %name, derivations = resolved.derivations.len(), "derived");
        statements.push(Statement::constant(name.clone(), resolved.expr.clone()));
        derived.push(DerivedTarget {
            name,
            location,
            rendered: arena.stringify(ty),
            expr: resolved.expr,
        });
    }

    let imports = scope.emit_state().borrow().imports.declarations();
    Ok(DeriveOutput {
        imports,
        statements,
        targets: derived,
        prelude: request.prelude.clone(),
    })
}
