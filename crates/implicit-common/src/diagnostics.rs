//! Diagnostic types and message lookup for the resolver.
//!
//! Derivation failures are fatal: the resolver reports them once, at the
//! boundary where a derivation site asked for a value. The message templates
//! below use `{0}`, `{1}`, ... placeholders filled by [`format_message`].

use serde::Serialize;

use crate::position::SourceLocation;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNSUPPORTED_DERIVATION: u32 = 9001;
    pub const INVALID_DERIVE_OPTIONS: u32 = 9002;
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNSUPPORTED_DERIVATION,
        category: DiagnosticCategory::Error,
        message: "unsupported derivation at: {0} cannot resolve {1}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_DERIVE_OPTIONS,
        category: DiagnosticCategory::Error,
        message: "invalid derive options: {0}",
    },
];

/// A resolver diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic anchored at `location`.
    #[must_use]
    pub fn error(location: &SourceLocation, message: String, code: u32) -> Self {
        Self {
            file: location.file.clone(),
            line: location.line,
            column: location.column,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Create an error diagnostic from a registered message template.
    ///
    /// Unknown codes fall back to the joined arguments so no information is lost.
    #[must_use]
    pub fn from_code(location: &SourceLocation, code: u32, args: &[&str]) -> Self {
        let message = match get_message_template(code) {
            Some(template) => format_message(template, args),
            None => args.join(" "),
        };
        let category = get_diagnostic_category(code).unwrap_or(DiagnosticCategory::Error);
        Self {
            category,
            ..Self::error(location, message, code)
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message_text)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}
