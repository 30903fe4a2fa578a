//! tree-sitter-python front end
//!
//! Parses source text with tree-sitter and lowers the concrete syntax tree
//! into the [`Module`] model. Any `ERROR` or `MISSING` node is reported as a
//! [`ParseError::SyntaxError`]; a partially recovered tree is never returned.

use std::ops::Range;

use tree_sitter::{Node, Parser};

use crate::error::ParseError;
use crate::expr::{decode_escapes, split_string_literal, Constant, Expr, FString, UnaryOp};
use crate::source::{Location, SourceText};
use crate::tree::{
    Alias, Assign, ClassDef, Clause, Compound, Decorator, ExprStmt, FunctionDef, Import,
    ImportFrom, Module, Param, ParamKind, Simple, Stmt, StmtKind,
};

/// Blank lines preserved between statements
const MAX_BLANK_LINES: usize = 2;

/// Parse Python source into a [`Module`]
///
/// # Errors
/// Returns [`ParseError::SyntaxError`] with the first error position when
/// the text is not valid Python.
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::ParserInit(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(ParseError::ParseFailed)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(first_syntax_error(root, source));
    }

    let lowerer = Lowerer { source };
    Ok(Module {
        body: lowerer.statements(root),
    })
}

fn first_syntax_error(node: Node<'_>, source: &str) -> ParseError {
    if node.is_error() || node.is_missing() {
        let loc = Location::from(node.start_position());
        let message = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            let text = node.utf8_text(source.as_bytes()).unwrap_or("");
            let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
            format!("unexpected `{snippet}`")
        };
        return ParseError::SyntaxError {
            line: loc.line,
            column: loc.column,
            message,
        };
    }

    children(node)
        .into_iter()
        .find(|child| child.has_error())
        .map_or_else(
            || {
                let loc = Location::from(node.start_position());
                ParseError::SyntaxError {
                    line: loc.line,
                    column: loc.column,
                    message: "invalid syntax".to_string(),
                }
            },
            |child| first_syntax_error(child, source),
        )
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Byte ranges, relative to `base`, of string literals spanning lines
fn multiline_strings(node: Node<'_>, base: usize) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    collect_multiline_strings(node, base, &mut out);
    out
}

fn collect_multiline_strings(node: Node<'_>, base: usize, out: &mut Vec<Range<usize>>) {
    if node.start_position().row == node.end_position().row || node.kind() == "block" {
        return;
    }
    if node.kind() == "string" {
        out.push(node.start_byte() - base..node.end_byte() - base);
        return;
    }
    for child in children(node) {
        collect_multiline_strings(child, base, out);
    }
}

/// Attach a same-line comment to a leaf statement
fn push_trailing(stmt: &mut Stmt, comment: &str) -> bool {
    let text = match &mut stmt.kind {
        StmtKind::Import(import) => &mut import.text,
        StmtKind::ImportFrom(import) => &mut import.text,
        StmtKind::Assign(assign) => &mut assign.text,
        StmtKind::Expr(expr) => &mut expr.text,
        StmtKind::Simple(simple) => &mut simple.text,
        _ => return false,
    };
    text.push_trailing(comment);
    true
}

fn has_block(node: Node<'_>) -> bool {
    named_children(node).iter().any(|child| child.kind() == "block")
}

struct Lowerer<'s> {
    source: &'s str,
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn source_text(&self, node: Node<'_>) -> SourceText {
        SourceText::with_literals(
            self.text(node),
            node.start_position().column,
            &multiline_strings(node, node.start_byte()),
        )
    }

    /// Last row holding text of `node`, trailing newlines and dedents ignored
    fn last_row(&self, node: Node<'_>) -> usize {
        node.start_position().row + self.text(node).trim_end().matches('\n').count()
    }

    /// Text from `start` up to where `block` begins, e.g. `def f(x):`
    fn header_text(&self, start: Node<'_>, block: Node<'_>) -> SourceText {
        let text = self
            .source
            .get(start.start_byte()..block.start_byte())
            .unwrap_or("")
            .trim_end();
        SourceText::with_literals(
            text,
            start.start_position().column,
            &multiline_strings(start, start.start_byte()),
        )
    }

    fn statements(&self, parent: Node<'_>) -> Vec<Stmt> {
        let mut cursor = parent.walk();
        let nodes: Vec<Node<'_>> = parent.named_children(&mut cursor).collect();

        let mut out: Vec<Stmt> = Vec::with_capacity(nodes.len());
        let mut prev_row: Option<usize> = None;
        let mut prev_end = 0;
        for node in nodes {
            if node.kind() == "comment" && prev_row == Some(node.start_position().row) {
                let comment = format!("{}{}", self.gap(prev_end, node), self.text(node));
                if out.last_mut().is_some_and(|stmt| push_trailing(stmt, &comment)) {
                    prev_end = node.end_byte();
                    continue;
                }
            }
            prev_end = node.end_byte();

            let blank_lines = prev_row.map_or(0, |row| {
                node.start_position()
                    .row
                    .saturating_sub(row + 1)
                    .min(MAX_BLANK_LINES)
            });
            prev_row = Some(self.last_row(node));
            out.push(Stmt {
                kind: self.statement(node),
                location: Some(Location::from(node.start_position())),
                blank_lines,
            });
        }
        out
    }

    /// Whitespace between `end` and `node` on one line, or two spaces
    fn gap(&self, end: usize, node: Node<'_>) -> &'s str {
        self.source
            .get(end..node.start_byte())
            .filter(|gap| !gap.is_empty() && !gap.contains('\n') && gap.trim().is_empty())
            .unwrap_or("  ")
    }

    fn statement(&self, node: Node<'_>) -> StmtKind {
        match node.kind() {
            "comment" => StmtKind::Comment(self.source_text(node)),
            "import_statement" => StmtKind::Import(self.import(node)),
            "import_from_statement" => StmtKind::ImportFrom(self.import_from(node)),
            "expression_statement" => self.expression_statement(node),
            "function_definition" => StmtKind::FunctionDef(self.function(node, node, Vec::new())),
            "class_definition" => StmtKind::ClassDef(self.class(node, Vec::new())),
            "decorated_definition" => self.decorated(node),
            _ if has_block(node) => StmtKind::Compound(self.compound(node)),
            _ => StmtKind::Simple(self.simple(node)),
        }
    }

    fn alias(&self, node: Node<'_>) -> Alias {
        if node.kind() == "aliased_import" {
            Alias {
                name: node
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default(),
                asname: node
                    .child_by_field_name("alias")
                    .map(|n| self.text(n).to_string()),
            }
        } else {
            Alias {
                name: self.text(node).to_string(),
                asname: None,
            }
        }
    }

    fn import(&self, node: Node<'_>) -> Import {
        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.alias(n))
            .collect();
        Import {
            names,
            text: self.source_text(node),
        }
    }

    fn import_from(&self, node: Node<'_>) -> ImportFrom {
        let (module, level) = match node.child_by_field_name("module_name") {
            Some(module) if module.kind() == "relative_import" => {
                let text = self.text(module);
                let dots = text.chars().take_while(|c| *c == '.').count();
                let rest = text[dots..].trim();
                ((!rest.is_empty()).then(|| rest.to_string()), dots)
            }
            Some(module) => (Some(self.text(module).to_string()), 0),
            None => (None, 0),
        };

        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.alias(n))
            .collect();
        let wildcard = named_children(node)
            .iter()
            .any(|child| child.kind() == "wildcard_import");

        ImportFrom {
            module,
            level,
            names,
            wildcard,
            text: self.source_text(node),
        }
    }

    fn expression_statement(&self, node: Node<'_>) -> StmtKind {
        let inner = named_children(node);
        if let [single] = inner.as_slice() {
            if single.kind() == "assignment" {
                let left = single.child_by_field_name("left");
                let right = single.child_by_field_name("right");
                if let (Some(left), Some(right)) = (left, right) {
                    if left.kind() == "identifier" && right.kind() != "assignment" {
                        return StmtKind::Assign(Assign {
                            target: self.text(left).to_string(),
                            value: self.expr(right),
                            text: self.source_text(node),
                        });
                    }
                }
            } else if single.kind() != "augmented_assignment" {
                return StmtKind::Expr(ExprStmt {
                    value: self.expr(*single),
                    text: self.source_text(node),
                });
            }
        }
        StmtKind::Simple(self.simple(node))
    }

    fn simple(&self, node: Node<'_>) -> Simple {
        Simple {
            text: self.source_text(node),
            exprs: self.exprs(node),
        }
    }

    /// Decorators in order; comments between them and the definition are
    /// kept on the decorator they follow
    fn decorated(&self, node: Node<'_>) -> StmtKind {
        let mut decorators: Vec<Decorator> = Vec::new();
        let mut prev: Option<Node<'_>> = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "decorator" => {
                    decorators.push(Decorator {
                        expr: named_children(child)
                            .first()
                            .map_or(Expr::Name(String::new()), |e| self.expr(*e)),
                        text: self.source_text(child),
                    });
                    prev = Some(child);
                }
                "comment" => {
                    let (Some(last), Some(before)) = (decorators.last_mut(), prev) else {
                        continue;
                    };
                    if self.last_row(before) == child.start_position().row {
                        let gap = self.gap(before.end_byte(), child);
                        last.text.push_trailing(&format!("{gap}{}", self.text(child)));
                    } else {
                        last.text.push_line(self.text(child));
                    }
                    prev = Some(child);
                }
                _ => {}
            }
        }

        match node.child_by_field_name("definition") {
            Some(def) if def.kind() == "function_definition" => {
                StmtKind::FunctionDef(self.function(def, node, decorators))
            }
            Some(def) if def.kind() == "class_definition" => {
                StmtKind::ClassDef(self.class(def, decorators))
            }
            _ => StmtKind::Simple(self.simple(node)),
        }
    }

    fn function(&self, node: Node<'_>, outer: Node<'_>, decorators: Vec<Decorator>) -> FunctionDef {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.parameters(p))
            .unwrap_or_default();
        let body = node.child_by_field_name("body");
        let is_async = children(node).first().is_some_and(|c| c.kind() == "async");

        FunctionDef {
            name,
            params,
            decorators,
            header: body.map_or_else(|| self.source_text(node), |b| self.header_text(node, b)),
            body: body.map(|b| self.statements(b)).unwrap_or_default(),
            is_async,
            location: Location::from(outer.start_position()),
        }
    }

    fn parameters(&self, node: Node<'_>) -> Vec<Param> {
        let mut params: Vec<Param> = Vec::new();
        let mut keyword_only = false;

        for child in named_children(node) {
            let regular = if keyword_only {
                ParamKind::KeywordOnly
            } else {
                ParamKind::Regular
            };
            let field = |name: &str| child.child_by_field_name(name).map(|n| self.text(n).to_string());

            let param = match child.kind() {
                "identifier" => Some(Param {
                    name: self.text(child).to_string(),
                    kind: regular,
                    annotation: None,
                    default: None,
                }),
                "default_parameter" | "typed_default_parameter" => Some(Param {
                    name: field("name").unwrap_or_default(),
                    kind: regular,
                    annotation: field("type"),
                    default: field("value"),
                }),
                "typed_parameter" => named_children(child).first().map(|inner| {
                    let (name, kind) = self.splat(*inner, regular);
                    if kind == ParamKind::VarArgs {
                        keyword_only = true;
                    }
                    Param {
                        name,
                        kind,
                        annotation: field("type"),
                        default: None,
                    }
                }),
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    let (name, kind) = self.splat(child, regular);
                    if kind == ParamKind::VarArgs {
                        keyword_only = true;
                    }
                    Some(Param {
                        name,
                        kind,
                        annotation: None,
                        default: None,
                    })
                }
                "keyword_separator" => {
                    keyword_only = true;
                    None
                }
                "positional_separator" => {
                    for param in &mut params {
                        param.kind = ParamKind::PositionalOnly;
                    }
                    None
                }
                _ => None,
            };
            params.extend(param);
        }

        params
    }

    fn splat(&self, node: Node<'_>, regular: ParamKind) -> (String, ParamKind) {
        let kind = match node.kind() {
            "list_splat_pattern" => ParamKind::VarArgs,
            "dictionary_splat_pattern" => ParamKind::KwArgs,
            _ => return (self.text(node).to_string(), regular),
        };
        let name = named_children(node)
            .first()
            .map_or_else(String::new, |n| self.text(*n).to_string());
        (name, kind)
    }

    fn class(&self, node: Node<'_>, decorators: Vec<Decorator>) -> ClassDef {
        let body = node.child_by_field_name("body");
        ClassDef {
            name: node
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string())
                .unwrap_or_default(),
            decorators,
            header: body.map_or_else(|| self.source_text(node), |b| self.header_text(node, b)),
            body: body.map(|b| self.statements(b)).unwrap_or_default(),
        }
    }

    fn compound(&self, node: Node<'_>) -> Compound {
        let mut clauses = Vec::new();
        self.collect_clauses(node, &mut clauses);
        Compound { clauses }
    }

    /// Flatten `if/elif/else`, `try/except/finally` and friends into clauses
    fn collect_clauses(&self, node: Node<'_>, clauses: &mut Vec<Clause>) {
        let mut header_exprs = Vec::new();
        for child in named_children(node) {
            if child.kind() == "block" {
                clauses.push(Clause {
                    header: self.header_text(node, child),
                    exprs: std::mem::take(&mut header_exprs),
                    body: self.statements(child),
                });
            } else if has_block(child) {
                self.collect_clauses(child, clauses);
            } else {
                header_exprs.push(self.expr(child));
            }
        }
    }

    fn exprs(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node).into_iter().map(|n| self.expr(n)).collect()
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        match node.kind() {
            "identifier" => Expr::Name(self.text(node).to_string()),
            "string" => self.string(node),
            "concatenated_string" => self.concatenated_string(node),
            "integer" => Expr::Constant(Constant::Int(self.text(node).to_string())),
            "float" => Expr::Constant(Constant::Float(self.text(node).to_string())),
            "true" => Expr::Constant(Constant::Bool(true)),
            "false" => Expr::Constant(Constant::Bool(false)),
            "none" => Expr::Constant(Constant::None),
            "ellipsis" => Expr::Constant(Constant::Ellipsis),
            "list" => Expr::List(self.exprs(node)),
            "tuple" => Expr::Tuple(self.exprs(node)),
            "set" => Expr::Set(self.exprs(node)),
            "dictionary" => self.dictionary(node),
            "parenthesized_expression" => match named_children(node).as_slice() {
                [inner] => self.expr(*inner),
                _ => self.other(node),
            },
            "unary_operator" => {
                let op = match node.child_by_field_name("operator").map(|n| self.text(n)) {
                    Some("-") => UnaryOp::Neg,
                    Some("+") => UnaryOp::Pos,
                    Some("~") => UnaryOp::Invert,
                    _ => return self.other(node),
                };
                match node.child_by_field_name("argument") {
                    Some(argument) => Expr::UnaryOp {
                        op,
                        operand: Box::new(self.expr(argument)),
                    },
                    None => self.other(node),
                }
            }
            _ => self.other(node),
        }
    }

    fn other(&self, node: Node<'_>) -> Expr {
        Expr::Other {
            kind: node.kind().to_string(),
            children: self.exprs(node),
        }
    }

    fn dictionary(&self, node: Node<'_>) -> Expr {
        let entries = named_children(node);
        if entries.iter().any(|entry| entry.kind() != "pair") {
            return self.other(node);
        }

        let mut pairs = Vec::with_capacity(entries.len());
        for pair in entries {
            match (pair.child_by_field_name("key"), pair.child_by_field_name("value")) {
                (Some(key), Some(value)) => pairs.push((self.expr(key), self.expr(value))),
                _ => return self.other(node),
            }
        }
        Expr::Dict(pairs)
    }

    fn interpolations(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "interpolation")
            .filter_map(|interpolation| {
                interpolation
                    .child_by_field_name("expression")
                    .or_else(|| named_children(interpolation).into_iter().next())
                    .map(|expr| self.expr(expr))
            })
            .collect()
    }

    fn string(&self, node: Node<'_>) -> Expr {
        let text = self.text(node);
        let Some(parts) = split_string_literal(text) else {
            return self.other(node);
        };

        if parts.formatted {
            return Expr::FString(FString {
                text: text.to_string(),
                interpolations: self.interpolations(node),
            });
        }

        let value = if parts.raw {
            parts.body.to_string()
        } else {
            decode_escapes(parts.body)
        };
        if parts.bytes {
            Expr::Constant(Constant::Bytes(value))
        } else {
            Expr::Constant(Constant::Str(value))
        }
    }

    fn concatenated_string(&self, node: Node<'_>) -> Expr {
        let pieces: Vec<Expr> = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "string")
            .map(|child| self.string(child))
            .collect();

        if pieces.iter().any(|piece| matches!(piece, Expr::FString(_))) {
            let interpolations = pieces
                .into_iter()
                .filter_map(|piece| match piece {
                    Expr::FString(fstring) => Some(fstring.interpolations),
                    _ => None,
                })
                .flatten()
                .collect();
            return Expr::FString(FString {
                text: self.text(node).to_string(),
                interpolations,
            });
        }

        let mut value = String::new();
        let mut bytes = false;
        for piece in pieces {
            match piece {
                Expr::Constant(Constant::Str(s)) => value.push_str(&s),
                Expr::Constant(Constant::Bytes(s)) => {
                    bytes = true;
                    value.push_str(&s);
                }
                _ => return self.other(node),
            }
        }
        Expr::Constant(if bytes {
            Constant::Bytes(value)
        } else {
            Constant::Str(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_function(module: &Module) -> &FunctionDef {
        module
            .body
            .iter()
            .find_map(|stmt| match &stmt.kind {
                StmtKind::FunctionDef(f) => Some(f),
                _ => None,
            })
            .expect("no function")
    }

    #[test]
    fn lowers_imports() {
        let module = parse_module("import os.path, numpy as np\nfrom ..pkg import a as b, c\n").unwrap();
        let StmtKind::Import(import) = &module.body[0].kind else {
            panic!("expected import");
        };
        assert_eq!(import.names.len(), 2);
        assert_eq!(import.names[0].name, "os.path");
        assert_eq!(import.names[1].asname.as_deref(), Some("np"));

        let StmtKind::ImportFrom(from) = &module.body[1].kind else {
            panic!("expected from-import");
        };
        assert_eq!(from.level, 2);
        assert_eq!(from.module.as_deref(), Some("pkg"));
        assert_eq!(from.names[0].bound_name(), "b");
        assert_eq!(from.names[1].name, "c");
    }

    #[test]
    fn lowers_assignments() {
        let module = parse_module("LIMIT = -5\na.b = 1\nx += 1\n").unwrap();
        let StmtKind::Assign(assign) = &module.body[0].kind else {
            panic!("expected assign");
        };
        assert_eq!(assign.target, "LIMIT");
        assert!(matches!(assign.value, Expr::UnaryOp { op: UnaryOp::Neg, .. }));
        assert!(matches!(module.body[1].kind, StmtKind::Simple(_)));
        assert!(matches!(module.body[2].kind, StmtKind::Simple(_)));
    }

    #[test]
    fn lowers_decorated_function() {
        let source = "@ai_code\nasync def fetch(url: str, *args, retries=3, **kw):\n    \"\"\"Fetch it.\"\"\"\n";
        let module = parse_module(source).unwrap();
        let f = first_function(&module);

        assert_eq!(f.name, "fetch");
        assert!(f.is_async);
        assert!(f.is_annotated("ai_code"));
        assert_eq!(f.param_names(), vec!["url", "args", "retries", "kw"]);
        assert_eq!(f.params[0].annotation.as_deref(), Some("str"));
        assert_eq!(f.params[1].kind, ParamKind::VarArgs);
        assert_eq!(f.params[2].kind, ParamKind::KeywordOnly);
        assert_eq!(f.params[2].default.as_deref(), Some("3"));
        assert_eq!(f.params[3].kind, ParamKind::KwArgs);
        assert_eq!(f.docstring().as_deref(), Some("Fetch it."));
        assert_eq!(f.location, Location::new(1, 0));
    }

    #[test]
    fn fstring_interpolations() {
        let module = parse_module("def f():\n    return f'top {count} of {items!r}'\n").unwrap();
        let f = first_function(&module);
        let fstring = f
            .body_exprs()
            .into_iter()
            .find_map(|e| match e {
                Expr::FString(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap();

        assert_eq!(fstring.text, "f'top {count} of {items!r}'");
        let names: Vec<_> = fstring.interpolations.iter().filter_map(Expr::as_name).collect();
        assert_eq!(names, vec!["count", "items"]);
    }

    #[test]
    fn compound_clauses() {
        let source = "if x:\n    a = 1\nelif y:\n    b = 2\nelse:\n    pass\n";
        let module = parse_module(source).unwrap();
        let StmtKind::Compound(compound) = &module.body[0].kind else {
            panic!("expected compound");
        };
        let headers: Vec<String> = compound.clauses.iter().map(|c| c.header.to_string()).collect();
        assert_eq!(headers, vec!["if x:", "elif y:", "else:"]);
        assert_eq!(compound.clauses[0].exprs, vec![Expr::Name("x".to_string())]);
    }

    #[test]
    fn blank_lines_are_counted() {
        let module = parse_module("a = 1\n\n\n\n\nb = 2\nc = 3\n").unwrap();
        assert_eq!(module.body[0].blank_lines, 0);
        assert_eq!(module.body[1].blank_lines, MAX_BLANK_LINES);
        assert_eq!(module.body[2].blank_lines, 0);
    }

    #[test]
    fn comments_stay_where_they_were() {
        let source = "x = 1  # note\n@ai_code  # gen\n# why\ndef f():\n    pass\n";
        let module = parse_module(source).unwrap();
        assert_eq!(module.body.len(), 2);
        assert!(first_function(&module).is_annotated("ai_code"));
        assert_eq!(module.to_source(), source);
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = parse_module("def broken(:\n    pass\n").unwrap_err();
        assert!(matches!(err, ParseError::SyntaxError { line: 1, .. }));
    }

    #[test]
    fn string_constants_are_decoded() {
        let module = parse_module("x = 'a\\tb' 'c'\ny = r'\\n'\n").unwrap();
        let StmtKind::Assign(x) = &module.body[0].kind else {
            panic!("expected assign");
        };
        assert_eq!(x.value, Expr::Constant(Constant::Str("a\tbc".to_string())));
        let StmtKind::Assign(y) = &module.body[1].kind else {
            panic!("expected assign");
        };
        assert_eq!(y.value, Expr::Constant(Constant::Str("\\n".to_string())));
    }
}
