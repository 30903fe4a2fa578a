//! Statement-level tree
//!
//! A [`Module`] is an ordered list of [`Stmt`]s. Each statement carries a
//! [`StmtKind`] tag; compound statements own nested statement lists, so the
//! tree can be mutated in place and printed back with
//! [`Module::to_source`](crate::Module::to_source).

use crate::expr::{clean_docstring, Constant, Expr};
use crate::source::{Location, SourceText};

/// Parsed program
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    /// Top-level statements in declaration order
    pub body: Vec<Stmt>,
}

/// A statement together with its layout metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    /// What the statement is
    pub kind: StmtKind,
    /// Where it was parsed from; `None` for nodes inserted by a splice
    pub location: Option<Location>,
    /// Blank lines printed before the statement
    pub blank_lines: usize,
}

/// Statement variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// `import a.b as c, d`
    Import(Import),
    /// `from m import a as b`
    ImportFrom(ImportFrom),
    /// `name = value` with a single bare-identifier target
    Assign(Assign),
    /// A statement that is a single expression (docstrings, calls)
    Expr(ExprStmt),
    /// `def` / `async def`
    FunctionDef(FunctionDef),
    /// `class`
    ClassDef(ClassDef),
    /// `if`, `for`, `while`, `try`, `with`, `match` and their clauses
    Compound(Compound),
    /// Any other simple statement (`return`, `raise`, `x += 1`, ...)
    Simple(Simple),
    /// A standalone `# comment` line
    Comment(SourceText),
}

/// `import` alias
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias {
    /// Imported (possibly dotted) name
    pub name: String,
    /// `as` name
    pub asname: Option<String>,
}

impl Alias {
    /// Name this alias binds in the importing namespace
    ///
    /// `import a.b` binds `a`; `import a.b as c` binds `c`.
    #[must_use]
    pub fn bound_name(&self) -> &str {
        match &self.asname {
            Some(asname) => asname,
            None => self.name.split('.').next().unwrap_or(&self.name),
        }
    }
}

/// `import ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Imported modules
    pub names: Vec<Alias>,
    /// Original text
    pub text: SourceText,
}

/// `from ... import ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFrom {
    /// Module path, `None` for `from . import x`
    pub module: Option<String>,
    /// Number of leading dots in a relative import
    pub level: usize,
    /// Imported attributes
    pub names: Vec<Alias>,
    /// `from m import *`
    pub wildcard: bool,
    /// Original text
    pub text: SourceText,
}

/// `name = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    /// Target identifier
    pub target: String,
    /// Assigned value
    pub value: Expr,
    /// Original text
    pub text: SourceText,
}

/// Expression statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    /// The expression
    pub value: Expr,
    /// Original text
    pub text: SourceText,
}

/// Simple statement kept as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simple {
    /// Original text
    pub text: SourceText,
    /// Expressions in source order
    pub exprs: Vec<Expr>,
}

/// `@decorator`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorator {
    /// Decorator expression
    pub expr: Expr,
    /// Original text, `@` included
    pub text: SourceText,
}

/// How a parameter binds arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Before `/`
    PositionalOnly,
    /// Regular positional-or-keyword
    Regular,
    /// `*args`
    VarArgs,
    /// After `*` or `*args`
    KeywordOnly,
    /// `**kwargs`
    KwArgs,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Parameter name, without stars
    pub name: String,
    /// Binding kind
    pub kind: ParamKind,
    /// Annotation source text
    pub annotation: Option<String>,
    /// Default value source text
    pub default: Option<String>,
}

/// `def name(params): body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Parameters in declaration order
    pub params: Vec<Param>,
    /// Decorators in source order
    pub decorators: Vec<Decorator>,
    /// `def ...:` line(s), comments up to the body included
    pub header: SourceText,
    /// Body statements
    pub body: Vec<Stmt>,
    /// `async def`
    pub is_async: bool,
    /// Location of the `def` keyword
    pub location: Location,
}

impl FunctionDef {
    /// Whether one of the decorators is the bare identifier `marker`
    #[must_use]
    pub fn is_annotated(&self, marker: &str) -> bool {
        self.decorators
            .iter()
            .any(|decorator| decorator.expr.as_name() == Some(marker))
    }

    /// Parameter names in declaration order
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Docstring, cleaned of its indentation margin
    #[must_use]
    pub fn docstring(&self) -> Option<String> {
        match self.body.first().map(|stmt| &stmt.kind) {
            Some(StmtKind::Expr(ExprStmt {
                value: Expr::Constant(Constant::Str(doc)),
                ..
            })) => Some(clean_docstring(doc)),
            _ => None,
        }
    }

    /// Every expression in the body, pre-order
    #[must_use]
    pub fn body_exprs(&self) -> Vec<&Expr> {
        let mut out = Vec::new();
        walk_stmts(&self.body, &mut out);
        out
    }
}

/// `class Name(bases): body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Class name
    pub name: String,
    /// Decorators in source order
    pub decorators: Vec<Decorator>,
    /// `class ...:` line(s)
    pub header: SourceText,
    /// Body statements
    pub body: Vec<Stmt>,
}

/// One `header: body` arm of a compound statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// `if x:`, `elif y:`, `else:`, `except E as e:`, ...
    pub header: SourceText,
    /// Expressions in the header
    pub exprs: Vec<Expr>,
    /// Clause body
    pub body: Vec<Stmt>,
}

/// Compound statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    /// Clauses in source order
    pub clauses: Vec<Clause>,
}

impl Stmt {
    /// Statement with no location and no leading blank lines
    #[inline]
    #[must_use]
    pub fn detached(kind: StmtKind) -> Self {
        Self {
            kind,
            location: None,
            blank_lines: 0,
        }
    }

    /// `pass`
    #[must_use]
    pub fn pass() -> Self {
        Self::detached(StmtKind::Simple(Simple {
            text: SourceText::single("pass"),
            exprs: Vec::new(),
        }))
    }

    /// Drop source locations here and in every nested statement
    pub fn clear_locations(&mut self) {
        self.location = None;
        for body in self.child_bodies_mut() {
            for stmt in body.iter_mut() {
                stmt.clear_locations();
            }
        }
    }

    /// Nested statement lists, in source order
    #[must_use]
    pub fn child_bodies(&self) -> Vec<&Vec<Stmt>> {
        match &self.kind {
            StmtKind::FunctionDef(function) => vec![&function.body],
            StmtKind::ClassDef(class) => vec![&class.body],
            StmtKind::Compound(compound) => compound.clauses.iter().map(|c| &c.body).collect(),
            _ => Vec::new(),
        }
    }

    /// Mutable nested statement lists, in source order
    pub fn child_bodies_mut(&mut self) -> Vec<&mut Vec<Stmt>> {
        match &mut self.kind {
            StmtKind::FunctionDef(function) => vec![&mut function.body],
            StmtKind::ClassDef(class) => vec![&mut class.body],
            StmtKind::Compound(compound) => {
                compound.clauses.iter_mut().map(|c| &mut c.body).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Collect expressions of `stmts` (and nested bodies) in pre-order
pub fn walk_stmts<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a Expr>) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Import(_) | StmtKind::ImportFrom(_) | StmtKind::Comment(_) => {}
            StmtKind::Assign(assign) => assign.value.walk(out),
            StmtKind::Expr(expr) => expr.value.walk(out),
            StmtKind::Simple(simple) => {
                for expr in &simple.exprs {
                    expr.walk(out);
                }
            }
            StmtKind::FunctionDef(function) => {
                for decorator in &function.decorators {
                    decorator.expr.walk(out);
                }
                walk_stmts(&function.body, out);
            }
            StmtKind::ClassDef(class) => {
                for decorator in &class.decorators {
                    decorator.expr.walk(out);
                }
                walk_stmts(&class.body, out);
            }
            StmtKind::Compound(compound) => {
                for clause in &compound.clauses {
                    for expr in &clause.exprs {
                        expr.walk(out);
                    }
                    walk_stmts(&clause.body, out);
                }
            }
        }
    }
}
