//! JavaScript printer for the derivation IR.

use super::ir::{Expr, ImportDecl, Statement};

pub struct Printer {
    output: String,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                c => self.output.push(c),
            }
        }
    }

    pub fn emit_import(&mut self, import: &ImportDecl) {
        self.write("import * as ");
        self.write(&import.alias);
        self.write(" from \"");
        self.write_escaped(&import.path);
        self.write("\";");
        self.write_line();
    }

    pub fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Const {
                name,
                init,
                pure,
                leading_comment,
            } => {
                if let Some(comment) = leading_comment {
                    // A line comment cannot span lines.
                    for line in comment.lines() {
                        self.write("// ");
                        self.write(line);
                        self.write_line();
                    }
                }
                self.write("const ");
                self.write(name);
                self.write(" = ");
                if *pure {
                    self.write("/*#__PURE__*/ ");
                }
                self.emit_expr(init);
                self.write(";");
                self.write_line();
            }
        }
    }

    pub fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) => self.write(name),
            Expr::NumericLiteral(text) => self.write(text),
            Expr::PropertyAccess { object, property } => {
                self.emit_expr(object);
                self.write(".");
                self.write(property);
            }
            Expr::Call { callee, arguments } => {
                self.emit_expr(callee);
                self.write("(");
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(argument);
                }
                self.write(")");
            }
        }
    }

    /// Imports, then statements, in order.
    pub fn emit_program(&mut self, imports: &[ImportDecl], statements: &[Statement]) {
        for import in imports {
            self.emit_import(import);
        }
        for statement in statements {
            self.emit_statement(statement);
        }
    }
}

/// Print a single expression.
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new();
    printer.emit_expr(expr);
    printer.finish()
}
