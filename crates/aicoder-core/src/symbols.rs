//! Run-scoped symbol table
//!
//! Names bound by a template's top-level imports and literal assignments.
//! Built once per run by the
//! [`EnvironmentLoader`](crate::environment::EnvironmentLoader) and only
//! read afterwards.

use aicoder_syntax::{Constant, Expr, UnaryOp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Evaluated literal value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Scalar constant
    Constant(Constant),
    /// `[...]`
    List(Vec<Value>),
    /// `(...)`
    Tuple(Vec<Value>),
    /// `{...}`
    Set(Vec<Value>),
    /// `{k: v}`
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// Evaluate a literal expression
    ///
    /// Accepts constants, containers of literals and unary `+`/`-` on
    /// numbers. Anything else (names, calls, f-strings, ...) yields `None`.
    #[must_use]
    pub fn from_literal(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Constant(constant) => Some(Self::Constant(constant.clone())),
            Expr::List(items) => Self::evaluate_all(items).map(Self::List),
            Expr::Tuple(items) => Self::evaluate_all(items).map(Self::Tuple),
            Expr::Set(items) => Self::evaluate_all(items).map(Self::Set),
            Expr::Dict(pairs) => pairs
                .iter()
                .map(|(k, v)| Some((Self::from_literal(k)?, Self::from_literal(v)?)))
                .collect::<Option<Vec<_>>>()
                .map(Self::Dict),
            Expr::UnaryOp { op, operand } => Self::signed(*op, operand),
            _ => None,
        }
    }

    fn evaluate_all(items: &[Expr]) -> Option<Vec<Self>> {
        items.iter().map(Self::from_literal).collect()
    }

    fn signed(op: UnaryOp, operand: &Expr) -> Option<Self> {
        let sign = match op {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "",
            UnaryOp::Invert => return None,
        };
        match Self::from_literal(operand)? {
            Self::Constant(Constant::Int(text)) => Some(Self::Constant(Constant::Int(negate(sign, &text)))),
            Self::Constant(Constant::Float(text)) => {
                Some(Self::Constant(Constant::Float(negate(sign, &text))))
            }
            _ => None,
        }
    }
}

fn negate(sign: &str, text: &str) -> String {
    match (sign, text.strip_prefix('-')) {
        ("-", Some(positive)) => positive.to_string(),
        _ => format!("{sign}{text}"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Constant(Constant::Str(s)) => write!(f, "{s:?}"),
            Self::Constant(constant) => f.write_str(&constant.as_prompt_text()),
            Self::List(items) => {
                f.write_str("[")?;
                join(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                join(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Set(items) => {
                f.write_str("{")?;
                join(f, items)?;
                f.write_str("}")
            }
            Self::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// One parameter of an imported function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInfo {
    /// Parameter name, stars included for `*args` / `**kwargs`
    pub name: String,
    /// Annotation as text, if any
    #[serde(default)]
    pub annotation: Option<String>,
}

impl ParamInfo {
    /// Parse `name` or `name: annotation`
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((name, annotation)) => Self {
                name: name.trim().to_string(),
                annotation: Some(annotation.trim().to_string()),
            },
            None => Self {
                name: text.trim().to_string(),
                annotation: None,
            },
        }
    }
}

impl fmt::Display for ParamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.annotation {
            Some(annotation) => write!(f, "{}: {annotation}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Signature of an imported function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Parameters in declaration order
    pub params: Vec<ParamInfo>,
}

impl Signature {
    /// Build from `name` / `name: annotation` strings
    #[must_use]
    pub fn from_params<S: AsRef<str>>(params: &[S]) -> Self {
        Self {
            params: params.iter().map(|p| ParamInfo::parse(p.as_ref())).collect(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        Ok(())
    }
}

/// What a name is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// An imported module
    Module {
        /// Dotted module path
        path: String,
    },
    /// A function imported from a module (or a builtin)
    Function {
        /// `module.name`, or the bare name for builtins
        qualified_name: String,
        /// Its signature
        signature: Signature,
    },
    /// Any other module attribute (class, constant, object)
    Attribute {
        /// `module.name`
        qualified_name: String,
    },
    /// An evaluated literal global
    Literal(Value),
}

impl Symbol {
    /// Module symbol
    #[inline]
    #[must_use]
    pub fn module(path: impl Into<String>) -> Self {
        Self::Module { path: path.into() }
    }

    /// Function symbol
    #[inline]
    #[must_use]
    pub fn function(qualified_name: impl Into<String>, signature: Signature) -> Self {
        Self::Function {
            qualified_name: qualified_name.into(),
            signature,
        }
    }

    /// Non-function attribute symbol
    #[inline]
    #[must_use]
    pub fn attribute(qualified_name: impl Into<String>) -> Self {
        Self::Attribute {
            qualified_name: qualified_name.into(),
        }
    }

    /// Function signature, if this is a function
    #[inline]
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Function { signature, .. } => Some(signature),
            _ => None,
        }
    }
}

/// Name → symbol bindings for one run
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, shadowing any earlier binding
    pub fn bind(&mut self, name: impl Into<String>, symbol: Symbol) -> Option<Symbol> {
        self.entries.insert(name.into(), symbol)
    }

    /// Look up a name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    /// Whether `name` is bound
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of bindings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over bindings in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.entries.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(text: &str) -> Expr {
        Expr::Constant(Constant::Int(text.to_string()))
    }

    #[test]
    fn literal_containers_evaluate() {
        let expr = Expr::Dict(vec![(
            Expr::Constant(Constant::Str("limit".to_string())),
            Expr::List(vec![int("1"), int("2")]),
        )]);
        let value = Value::from_literal(&expr).unwrap();
        assert_eq!(value.to_string(), "{\"limit\": [1, 2]}");
    }

    #[test]
    fn non_literals_are_rejected() {
        assert_eq!(Value::from_literal(&Expr::Name("x".to_string())), None);
        assert_eq!(Value::from_literal(&Expr::List(vec![int("1"), Expr::Name("x".to_string())])), None);
        let call = Expr::Other {
            kind: "call".to_string(),
            children: vec![Expr::Name("f".to_string())],
        };
        assert_eq!(Value::from_literal(&call), None);
    }

    #[test]
    fn unary_sign_on_numbers_only() {
        let neg = Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(int("5")),
        };
        assert_eq!(Value::from_literal(&neg), Some(Value::Constant(Constant::Int("-5".to_string()))));

        let double_neg = Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(neg),
        };
        assert_eq!(Value::from_literal(&double_neg), Some(Value::Constant(Constant::Int("5".to_string()))));

        let neg_str = Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::Constant(Constant::Str("x".to_string()))),
        };
        assert_eq!(Value::from_literal(&neg_str), None);
    }

    #[test]
    fn signature_display() {
        let sig = Signature::from_params(&["url", "params: dict", "**kwargs"]);
        assert_eq!(sig.to_string(), "url, params: dict, **kwargs");
    }

    #[test]
    fn later_bindings_shadow() {
        let mut table = SymbolTable::new();
        table.bind("x", Symbol::module("json"));
        let old = table.bind("x", Symbol::Literal(Value::Constant(Constant::Int("1".to_string()))));
        assert_eq!(old, Some(Symbol::module("json")));
        assert_eq!(table.len(), 1);
        assert!(matches!(table.get("x"), Some(Symbol::Literal(_))));
    }
}
