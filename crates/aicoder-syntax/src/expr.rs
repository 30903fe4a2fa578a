//! Expression nodes
//!
//! Only the shapes the rewriting engine inspects get their own variant:
//! literals, f-strings, bare names and literal containers. Everything else
//! is kept as [`Expr::Other`] with its children in source order so
//! traversals still reach nested literals and names.

/// Literal constant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Decoded string value
    Str(String),
    /// Decoded bytes literal, kept as text
    Bytes(String),
    /// Integer literal source text (`0x1f`, `1_000`)
    Int(String),
    /// Float or imaginary literal source text
    Float(String),
    /// `True` / `False`
    Bool(bool),
    /// `None`
    None,
    /// `...`
    Ellipsis,
}

impl Constant {
    /// Text used when constants are joined into a prompt
    #[must_use]
    pub fn as_prompt_text(&self) -> String {
        match self {
            Constant::Str(value) | Constant::Bytes(value) => value.clone(),
            Constant::Int(text) | Constant::Float(text) => text.clone(),
            Constant::Bool(true) => "True".to_string(),
            Constant::Bool(false) => "False".to_string(),
            Constant::None => "None".to_string(),
            Constant::Ellipsis => "...".to_string(),
        }
    }
}

/// A string literal with interpolated sub-expressions (`f"..."`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FString {
    /// Literal source text, prefix and quotes included
    pub text: String,
    /// Interpolated expressions in source order
    pub interpolations: Vec<Expr>,
}

/// Prefix operator on a single operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    Invert,
}

/// Expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Literal constant
    Constant(Constant),
    /// Templated string
    FString(FString),
    /// Bare identifier
    Name(String),
    /// `[a, b]`
    List(Vec<Expr>),
    /// `(a, b)`
    Tuple(Vec<Expr>),
    /// `{a, b}`
    Set(Vec<Expr>),
    /// `{k: v}`
    Dict(Vec<(Expr, Expr)>),
    /// Prefix operator
    UnaryOp {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// Any other expression, tagged with its grammar kind
    Other {
        /// tree-sitter node kind (`call`, `attribute`, ...)
        kind: String,
        /// Child expressions in source order
        children: Vec<Expr>,
    },
}

impl Expr {
    /// Bare identifier name, if this is one
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Visit this expression and its descendants in pre-order
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a Expr>) {
        out.push(self);
        match self {
            Expr::Constant(_) | Expr::Name(_) => {}
            Expr::FString(fstring) => {
                for expr in &fstring.interpolations {
                    expr.walk(out);
                }
            }
            Expr::List(items) | Expr::Tuple(items) | Expr::Set(items) => {
                for expr in items {
                    expr.walk(out);
                }
            }
            Expr::Dict(pairs) => {
                for (key, value) in pairs {
                    key.walk(out);
                    value.walk(out);
                }
            }
            Expr::UnaryOp { operand, .. } => operand.walk(out),
            Expr::Other { children, .. } => {
                for expr in children {
                    expr.walk(out);
                }
            }
        }
    }
}

/// Pieces of a string literal's source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StringParts<'a> {
    pub(crate) raw: bool,
    pub(crate) bytes: bool,
    pub(crate) formatted: bool,
    pub(crate) body: &'a str,
}

/// Split `rb'''...'''` style literal text into prefix flags and body
pub(crate) fn split_string_literal(text: &str) -> Option<StringParts<'_>> {
    let prefix_len = text
        .char_indices()
        .find(|(_, c)| *c == '\'' || *c == '"')
        .map(|(i, _)| i)?;
    let prefix = text[..prefix_len].to_ascii_lowercase();
    let rest = &text[prefix_len..];

    let quote = if rest.starts_with("\"\"\"") || rest.starts_with("'''") {
        &rest[..3]
    } else {
        &rest[..1]
    };
    if rest.len() < quote.len() * 2 || !rest.ends_with(quote) {
        return None;
    }

    Some(StringParts {
        raw: prefix.contains('r'),
        bytes: prefix.contains('b'),
        formatted: prefix.contains('f'),
        body: &rest[quote.len()..rest.len() - quote.len()],
    })
}

/// Decode backslash escapes the way the Python tokenizer does
pub(crate) fn decode_escapes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            'x' => push_code_point(&mut out, &mut chars, 2, "\\x"),
            'u' => push_code_point(&mut out, &mut chars, 4, "\\u"),
            'U' => push_code_point(&mut out, &mut chars, 8, "\\U"),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

fn push_code_point(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    width: usize,
    escape: &str,
) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }

    match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
        Some(c) if digits.len() == width => out.push(c),
        _ => {
            out.push_str(escape);
            out.push_str(&digits);
        }
    }
}

/// Strip docstring indentation like `inspect.cleandoc`
#[must_use]
pub fn clean_docstring(doc: &str) -> String {
    let lines: Vec<&str> = doc.lines().collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start());
    }
    for line in lines.iter().skip(1) {
        cleaned.push(line.get(margin..).unwrap_or_else(|| line.trim_start()).trim_end());
    }

    while cleaned.first().is_some_and(|line| line.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }

    cleaned.join("\n")
}
