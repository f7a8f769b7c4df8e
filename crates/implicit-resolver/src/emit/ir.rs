//! Output IR for resolved derivations.
//!
//! Resolution produces plans; realizing a plan produces these nodes, and the
//! [`Printer`](super::Printer) turns them into JavaScript text. Hosts that
//! splice into their own syntax trees can walk the IR instead of printing it.

/// An expression in emitted code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Identifier: `derivation_1`
    Identifier(String),

    /// Numeric literal, kept exactly as written: `0`, `-2.5`
    NumericLiteral(String),

    /// Property access: `module.isNumber`
    PropertyAccess { object: Box<Expr>, property: String },

    /// Call expression: `callee(arg1, arg2)`
    Call { callee: Box<Expr>, arguments: Vec<Expr> },
}

impl Expr {
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::NumericLiteral(text.into())
    }

    pub fn prop(object: Self, property: impl Into<String>) -> Self {
        Self::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn call(callee: Self, arguments: Vec<Self>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// A statement in emitted code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// `// comment` on its own line, then `const name = init;`
    Const {
        name: String,
        init: Expr,
        /// Prefix the initializer with `/*#__PURE__*/`.
        pure: bool,
        leading_comment: Option<String>,
    },
}

impl Statement {
    pub fn constant(name: impl Into<String>, init: Expr) -> Self {
        Self::Const {
            name: name.into(),
            init,
            pure: false,
            leading_comment: None,
        }
    }

    /// A shared derivation binding: pure initializer, optional type comment.
    pub fn derivation(name: impl Into<String>, init: Expr, comment: Option<String>) -> Self {
        Self::Const {
            name: name.into(),
            init,
            pure: true,
            leading_comment: comment,
        }
    }

    pub fn bound_name(&self) -> &str {
        match self {
            Self::Const { name, .. } => name,
        }
    }
}

/// `import * as alias from "path";`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub alias: String,
    pub path: String,
}
