//! Error types for the syntax layer
//!
//! - Parse operations (source text → [`Module`](crate::Module))
//! - Splice operations (body replacement)

/// Errors while turning source text into a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// tree-sitter rejected the grammar
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// tree-sitter produced no tree
    #[error("parse failed")]
    ParseFailed,

    /// Source is not valid Python
    #[error("syntax error at {line}:{column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },
}

impl ParseError {
    /// Create syntax error at a position
    pub fn syntax_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Errors while mutating a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpliceError {
    /// No function with the requested name exists in the tree
    #[error("function not found: {0}")]
    FunctionNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::syntax_error(3, 4, "unexpected `)`");
        assert_eq!(err.to_string(), "syntax error at 3:4: unexpected `)`");
    }

    #[test]
    fn splice_error_display() {
        let err = SpliceError::FunctionNotFound("greet".to_string());
        assert_eq!(err.to_string(), "function not found: greet");
    }
}
