//! Reference evaluator for emitted derivations.
//!
//! Interprets the IR produced by a resolution against the refined prelude's
//! runtime semantics, so generated programs can be checked against values
//! without a JavaScript engine. Values are JSON; `typeof` follows JavaScript
//! (`null`, arrays and objects are all `"object"`).

use crate::emit::{Expr, ImportDecl, Statement};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fmt;

/// A compiled refinement predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Always,
    IsUnknown,
    IsNumber,
    IsString,
    IsObject,
    IsInt,
    Min(f64),
    Max(f64),
    /// `left` then `right`, short-circuiting.
    Compose(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Always | Predicate::IsUnknown => true,
            Predicate::IsNumber => value.is_number(),
            Predicate::IsString => value.is_string(),
            Predicate::IsObject => matches!(value, Value::Null | Value::Array(_) | Value::Object(_)),
            Predicate::IsInt => value
                .as_f64()
                .is_some_and(|n| n.is_finite() && n.fract() == 0.0),
            Predicate::Min(bound) => measure(value).is_some_and(|n| n >= *bound),
            Predicate::Max(bound) => measure(value).is_some_and(|n| n <= *bound),
            Predicate::Compose(left, right) => left.test(value) && right.test(value),
        }
    }
}

/// The number itself, or the `length` of a string, array or object.
fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.encode_utf16().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(fields) => fields.get("length")?.as_f64(),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    UnboundIdentifier(String),
    UnknownModule(String),
    UnknownExport(String),
    NotCallable(String),
    BadArguments { callee: String, expected: usize, found: usize },
    NotAPredicate(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundIdentifier(name) => write!(f, "unbound identifier `{name}`"),
            EvalError::UnknownModule(path) => write!(f, "module \"{path}\" is not the prelude"),
            EvalError::UnknownExport(name) => write!(f, "the prelude has no export `{name}`"),
            EvalError::NotCallable(what) => write!(f, "`{what}` is not callable"),
            EvalError::BadArguments {
                callee,
                expected,
                found,
            } => write!(f, "`{callee}` expects {expected} argument(s), found {found}"),
            EvalError::NotAPredicate(what) => write!(f, "`{what}` does not evaluate to a refinement"),
        }
    }
}

impl std::error::Error for EvalError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    AlwaysTrue,
    Min,
    Max,
    Compose,
}

impl Combinator {
    fn name(self) -> &'static str {
        match self {
            Combinator::AlwaysTrue => "isAlwaysTrue",
            Combinator::Min => "isMin",
            Combinator::Max => "isMax",
            Combinator::Compose => "compose",
        }
    }

    fn arity(self) -> usize {
        match self {
            Combinator::AlwaysTrue => 0,
            Combinator::Min | Combinator::Max => 1,
            Combinator::Compose => 2,
        }
    }
}

#[derive(Clone, Debug)]
enum RuntimeValue {
    Module,
    Predicate(Predicate),
    Combinator(Combinator),
    Number(f64),
}

pub struct Evaluator {
    prelude_path: String,
    bindings: FxHashMap<String, RuntimeValue>,
}

impl Evaluator {
    pub fn new(prelude_path: impl Into<String>) -> Self {
        Self {
            prelude_path: prelude_path.into(),
            bindings: FxHashMap::default(),
        }
    }

    /// Bind `imports`, run `statements` in order and evaluate `expr`.
    pub fn run(
        &mut self,
        imports: &[ImportDecl],
        statements: &[Statement],
        expr: &Expr,
    ) -> Result<Predicate, EvalError> {
        for import in imports {
            if import.path != self.prelude_path {
                return Err(EvalError::UnknownModule(import.path.clone()));
            }
            self.bindings.insert(import.alias.clone(), RuntimeValue::Module);
        }
        for statement in statements {
            let Statement::Const { name, init, .. } = statement;
            let value = self.eval(init)?;
            self.bindings.insert(name.clone(), value);
        }
        match self.eval(expr)? {
            RuntimeValue::Predicate(predicate) => Ok(predicate),
            _ => Err(EvalError::NotAPredicate(describe(expr))),
        }
    }

    fn eval(&self, expr: &Expr) -> Result<RuntimeValue, EvalError> {
        match expr {
            Expr::Identifier(name) => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundIdentifier(name.clone())),
            Expr::NumericLiteral(text) => text
                .parse()
                .map(RuntimeValue::Number)
                .map_err(|_| EvalError::NotAPredicate(text.clone())),
            Expr::PropertyAccess { object, property } => match self.eval(object)? {
                RuntimeValue::Module => prelude_export(property),
                _ => Err(EvalError::UnknownExport(property.clone())),
            },
            Expr::Call { callee, arguments } => {
                let RuntimeValue::Combinator(combinator) = self.eval(callee)? else {
                    return Err(EvalError::NotCallable(describe(callee)));
                };
                if arguments.len() != combinator.arity() {
                    return Err(EvalError::BadArguments {
                        callee: combinator.name().to_string(),
                        expected: combinator.arity(),
                        found: arguments.len(),
                    });
                }
                let args = arguments
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                apply(combinator, args, arguments)
            }
        }
    }
}

fn prelude_export(name: &str) -> Result<RuntimeValue, EvalError> {
    let value = match name {
        "isUnknown" => RuntimeValue::Predicate(Predicate::IsUnknown),
        "isNumber" => RuntimeValue::Predicate(Predicate::IsNumber),
        "isString" => RuntimeValue::Predicate(Predicate::IsString),
        "isObject" => RuntimeValue::Predicate(Predicate::IsObject),
        "isInt" => RuntimeValue::Predicate(Predicate::IsInt),
        "isAlwaysTrue" => RuntimeValue::Combinator(Combinator::AlwaysTrue),
        "isMin" => RuntimeValue::Combinator(Combinator::Min),
        "isMax" => RuntimeValue::Combinator(Combinator::Max),
        "compose" => RuntimeValue::Combinator(Combinator::Compose),
        _ => return Err(EvalError::UnknownExport(name.to_string())),
    };
    Ok(value)
}

fn apply(
    combinator: Combinator,
    args: Vec<RuntimeValue>,
    sources: &[Expr],
) -> Result<RuntimeValue, EvalError> {
    let predicate = match (combinator, args.as_slice()) {
        (Combinator::AlwaysTrue, []) => Predicate::Always,
        (Combinator::Min, [RuntimeValue::Number(bound)]) => Predicate::Min(*bound),
        (Combinator::Max, [RuntimeValue::Number(bound)]) => Predicate::Max(*bound),
        (Combinator::Compose, [RuntimeValue::Predicate(left), RuntimeValue::Predicate(right)]) => {
            Predicate::Compose(Box::new(left.clone()), Box::new(right.clone()))
        }
        _ => {
            let rendered: Vec<String> = sources.iter().map(describe).collect();
            return Err(EvalError::NotAPredicate(format!(
                "{}({})",
                combinator.name(),
                rendered.join(", ")
            )));
        }
    };
    Ok(RuntimeValue::Predicate(predicate))
}

fn describe(expr: &Expr) -> String {
    crate::emit::print_expr(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prelude_call(export: &str, arguments: Vec<Expr>) -> Expr {
        Expr::call(Expr::prop(Expr::id("module"), export), arguments)
    }

    fn imports() -> Vec<ImportDecl> {
        vec![ImportDecl {
            alias: "module".to_string(),
            path: "refined".to_string(),
        }]
    }

    #[test]
    fn test_min_measures_length() {
        let min = Predicate::Min(3.0);
        assert!(min.test(&json!(3)));
        assert!(!min.test(&json!(2.5)));
        assert!(min.test(&json!("abc")));
        assert!(!min.test(&json!("ab")));
        assert!(min.test(&json!([1, 2, 3])));
        assert!(min.test(&json!({ "length": 4 })));
        assert!(!min.test(&json!({})));
        assert!(!min.test(&json!(true)));
    }

    #[test]
    fn test_string_length_counts_utf16_units() {
        // One astral code point is two UTF-16 units.
        assert!(Predicate::Min(2.0).test(&json!("😀")));
        assert!(!Predicate::Max(1.0).test(&json!("😀")));
    }

    #[test]
    fn test_is_object_matches_typeof() {
        assert!(Predicate::IsObject.test(&json!(null)));
        assert!(Predicate::IsObject.test(&json!([])));
        assert!(!Predicate::IsObject.test(&json!("x")));
    }

    #[test]
    fn test_run_composes_statements() {
        let statements = vec![
            Statement::derivation("d", prelude_call("isMin", vec![Expr::number("0")]), None),
            Statement::derivation(
                "d_1",
                prelude_call(
                    "compose",
                    vec![Expr::prop(Expr::id("module"), "isInt"), Expr::id("d")],
                ),
                None,
            ),
        ];
        let predicate = Evaluator::new("refined")
            .run(&imports(), &statements, &Expr::id("d_1"))
            .unwrap();
        assert!(predicate.test(&json!(4)));
        assert!(!predicate.test(&json!(-4)));
        assert!(!predicate.test(&json!(0.5)));
    }

    #[test]
    fn test_run_reports_errors() {
        let mut evaluator = Evaluator::new("refined");
        assert_eq!(
            evaluator.run(&imports(), &[], &Expr::id("missing")),
            Err(EvalError::UnboundIdentifier("missing".to_string()))
        );
        assert_eq!(
            evaluator.run(&imports(), &[], &prelude_call("isMin", vec![])),
            Err(EvalError::BadArguments {
                callee: "isMin".to_string(),
                expected: 1,
                found: 0
            })
        );
        let foreign = vec![ImportDecl {
            alias: "module_1".to_string(),
            path: "elsewhere".to_string(),
        }];
        assert_eq!(
            Evaluator::new("refined").run(&foreign, &[], &Expr::id("module_1")),
            Err(EvalError::UnknownModule("elsewhere".to_string()))
        );
    }
}
