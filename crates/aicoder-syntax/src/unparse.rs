//! Serialization back to source text

use crate::tree::{Module, Stmt, StmtKind};

/// One nesting level
pub const INDENT: &str = "    ";

impl Module {
    /// Print the tree as Python source
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        write_block(&mut out, &self.body, 0);
        out
    }
}

fn write_block(out: &mut String, stmts: &[Stmt], depth: usize) {
    for stmt in stmts {
        write_stmt(out, stmt, depth);
    }
}

fn write_body(out: &mut String, body: &[Stmt], depth: usize) {
    if body.is_empty() {
        write_block(out, &[Stmt::pass()], depth);
    } else {
        write_block(out, body, depth);
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    let indent = INDENT.repeat(depth);
    for _ in 0..stmt.blank_lines {
        out.push('\n');
    }

    match &stmt.kind {
        StmtKind::Import(import) => import.text.write_indented(out, &indent),
        StmtKind::ImportFrom(import) => import.text.write_indented(out, &indent),
        StmtKind::Assign(assign) => assign.text.write_indented(out, &indent),
        StmtKind::Expr(expr) => expr.text.write_indented(out, &indent),
        StmtKind::Simple(simple) => simple.text.write_indented(out, &indent),
        StmtKind::Comment(text) => text.write_indented(out, &indent),
        StmtKind::FunctionDef(function) => {
            for decorator in &function.decorators {
                decorator.text.write_indented(out, &indent);
            }
            function.header.write_indented(out, &indent);
            write_body(out, &function.body, depth + 1);
        }
        StmtKind::ClassDef(class) => {
            for decorator in &class.decorators {
                decorator.text.write_indented(out, &indent);
            }
            class.header.write_indented(out, &indent);
            write_body(out, &class.body, depth + 1);
        }
        StmtKind::Compound(compound) => {
            for clause in &compound.clauses {
                clause.header.write_indented(out, &indent);
                write_body(out, &clause.body, depth + 1);
            }
        }
    }
}
