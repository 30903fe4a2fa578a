//! Function lookup and body replacement
//!
//! Lookups are first-match in pre-order: a function is visited before the
//! functions nested in its body, and earlier siblings before later ones.

use crate::error::SpliceError;
use crate::source::Location;
use crate::tree::{FunctionDef, Module, Stmt, StmtKind};

impl Module {
    /// Parse source text into a module
    ///
    /// # Errors
    /// See [`parse_module`](crate::parse_module).
    #[inline]
    pub fn parse(source: &str) -> Result<Self, crate::ParseError> {
        crate::parse::parse_module(source)
    }

    /// Every function definition, pre-order
    #[must_use]
    pub fn functions(&self) -> Vec<&FunctionDef> {
        let mut out = Vec::new();
        collect_functions(&self.body, &mut out);
        out
    }

    /// Functions carrying the bare decorator `marker`, pre-order
    #[must_use]
    pub fn annotated_functions(&self, marker: &str) -> Vec<&FunctionDef> {
        self.functions()
            .into_iter()
            .filter(|f| f.is_annotated(marker))
            .collect()
    }

    /// First function named `name`
    #[must_use]
    pub fn find_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions().into_iter().find(|f| f.name == name)
    }

    /// Whether any function is named `name`
    #[inline]
    #[must_use]
    pub fn defines_function(&self, name: &str) -> bool {
        self.find_function(name).is_some()
    }

    /// First function named `name`, mutably
    pub fn find_function_mut(&mut self, name: &str) -> Option<&mut FunctionDef> {
        find_in_mut(&mut self.body, name)
    }

    /// Replace the body of the first function named `name`
    ///
    /// Name, parameters and decorators are left untouched.
    ///
    /// # Errors
    /// [`SpliceError::FunctionNotFound`] when no function has that name.
    pub fn replace_function_body(&mut self, name: &str, body: Vec<Stmt>) -> Result<(), SpliceError> {
        let function = self
            .find_function_mut(name)
            .ok_or_else(|| SpliceError::FunctionNotFound(name.to_string()))?;
        function.set_body(body);
        Ok(())
    }
}

impl FunctionDef {
    /// Install a new body and repair its layout metadata
    ///
    /// Statements without a location take the function's location, the
    /// first statement loses its leading blank lines, and an empty body
    /// becomes `pass`.
    pub fn set_body(&mut self, mut body: Vec<Stmt>) {
        fill_missing_locations(&mut body, self.location);
        match body.first_mut() {
            Some(first) => first.blank_lines = 0,
            None => {
                let mut pass = Stmt::pass();
                pass.location = Some(self.location);
                body.push(pass);
            }
        }
        self.body = body;
    }
}

fn fill_missing_locations(stmts: &mut [Stmt], parent: Location) {
    for stmt in stmts {
        let location = *stmt.location.get_or_insert(parent);
        for body in stmt.child_bodies_mut() {
            fill_missing_locations(body, location);
        }
    }
}

fn collect_functions<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a FunctionDef>) {
    for stmt in stmts {
        if let StmtKind::FunctionDef(function) = &stmt.kind {
            out.push(function);
        }
        for body in stmt.child_bodies() {
            collect_functions(body, out);
        }
    }
}

fn find_in_mut<'a>(stmts: &'a mut [Stmt], name: &str) -> Option<&'a mut FunctionDef> {
    stmts.iter_mut().find_map(|stmt| find_in_stmt_mut(stmt, name))
}

fn find_in_stmt_mut<'a>(stmt: &'a mut Stmt, name: &str) -> Option<&'a mut FunctionDef> {
    match &mut stmt.kind {
        StmtKind::FunctionDef(function) => {
            if function.name == name {
                Some(function)
            } else {
                find_in_mut(&mut function.body, name)
            }
        }
        StmtKind::ClassDef(class) => find_in_mut(&mut class.body, name),
        StmtKind::Compound(compound) => compound
            .clauses
            .iter_mut()
            .find_map(|clause| find_in_mut(&mut clause.body, name)),
        _ => None,
    }
}
