//! AI Coder syntax layer
//!
//! A mutable, traversable model of Python programs.
//!
//! # Core Operations
//!
//! - **Parse**: tree-sitter-python CST lowered into [`Module`] / [`Stmt`] / [`Expr`]
//! - **Inspect**: pre-order function lookup, decorators, docstrings, f-strings
//! - **Splice**: [`Module::replace_function_body`] swaps a body in place
//! - **Serialize**: [`Module::to_source`] prints the tree back to text
//!
//! # Example
//!
//! ```rust,ignore
//! use aicoder_syntax::Module;
//!
//! let mut module = Module::parse("@ai_code\ndef greet():\n    \"say hello\"\n")?;
//! let body = Module::parse("return 'hello'\n")?.body;
//! module.replace_function_body("greet", body)?;
//! assert!(module.to_source().contains("return 'hello'"));
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod expr;
mod parse;
pub mod source;
mod splice;
pub mod tree;
mod unparse;

pub use error::{ParseError, SpliceError};
pub use expr::{clean_docstring, Constant, Expr, FString, UnaryOp};
pub use parse::parse_module;
pub use source::{Location, SourceText};
pub use tree::{
    walk_stmts, Alias, Assign, ClassDef, Clause, Compound, Decorator, ExprStmt, FunctionDef,
    Import, ImportFrom, Module, Param, ParamKind, Simple, Stmt, StmtKind,
};
pub use unparse::INDENT;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
