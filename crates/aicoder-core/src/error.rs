//! Error types for AI Coder
//!
//! Provides error handling for:
//! - Import resolution failures
//! - Model backend failures
//! - Unparseable model replies
//! - Configuration loading
//! - File I/O around a generation run

use aicoder_syntax::{ParseError, SpliceError};
use std::path::{Path, PathBuf};

/// Result alias for orchestrator operations
pub type CoderResult<T> = Result<T, CoderError>;

/// Main AI Coder error type
#[derive(Debug, thiserror::Error)]
pub enum CoderError {
    /// A source file could not be parsed
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: ParseError,
    },

    /// Import or attribute could not be resolved
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Code generation for a function failed
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Model backend failed outside per-function generation
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Body replacement failed
    #[error("splice failed: {0}")]
    Splice(#[from] SpliceError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Annotated function name is ambiguous in the template
    #[error("annotated function `{0}` is defined more than once")]
    DuplicateFunction(String),

    /// Template path has no output counterpart
    #[error("invalid template path {path}: {reason}")]
    InvalidPath {
        /// Offending path
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// File system error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CoderError {
    /// Create I/O error for a path
    #[inline]
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create parse error for a file
    #[inline]
    pub fn parse_error(path: impl AsRef<Path>, source: ParseError) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create invalid path error
    #[inline]
    pub fn invalid_path(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Import resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Module cannot be imported
    #[error("module not found: {module}: {reason}")]
    ModuleNotFound {
        /// Dotted module path
        module: String,
        /// Resolver-specific detail
        reason: String,
    },

    /// Module has no such attribute
    #[error("module `{module}` has no attribute `{attribute}`")]
    AttributeNotFound {
        /// Dotted module path
        module: String,
        /// Missing attribute
        attribute: String,
    },

    /// `from . import x` style imports have no package to resolve against
    #[error("relative import cannot be resolved: {}", relative_module(.level, .module))]
    RelativeImport {
        /// Number of leading dots
        level: usize,
        /// Module path after the dots
        module: Option<String>,
    },

    /// Interpreter probe could not run
    #[error("interpreter failed: {0}")]
    Interpreter(String),

    /// Interpreter probe produced unexpected output
    #[error("invalid probe response: {0}")]
    InvalidResponse(String),
}

fn relative_module(level: &usize, module: &Option<String>) -> String {
    format!("{}{}", ".".repeat(*level), module.as_deref().unwrap_or(""))
}

/// Model backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// API key environment variable is unset
    #[error("missing API key: environment variable {0} is not set")]
    MissingApiKey(String),

    /// Transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Reply carried no completion text
    #[error("backend returned no completion")]
    EmptyResponse,

    /// Scripted or local backend failure
    #[error("backend failed: {0}")]
    Other(String),
}

/// Per-function generation errors
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The model call failed
    #[error("model call for `{function}` failed: {source}")]
    Backend {
        /// Function being generated
        function: String,
        /// Underlying backend error
        #[source]
        source: BackendError,
    },

    /// The reply is not a valid statement sequence
    #[error("reply for `{function}` is not valid Python: {source}")]
    Parse {
        /// Function being generated
        function: String,
        /// Underlying parse error
        #[source]
        source: ParseError,
    },
}

impl GenerationError {
    /// Function the failure belongs to
    #[inline]
    #[must_use]
    pub fn function(&self) -> &str {
        match self {
            Self::Backend { function, .. } | Self::Parse { function, .. } => function,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the schema
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Semantically invalid setting
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coder_error_display() {
        let err = CoderError::DuplicateFunction("greet".to_string());
        assert!(err.to_string().contains("greet"));

        let err = CoderError::invalid_path("my_code.py", "no leading directory");
        assert!(err.to_string().contains("my_code.py"));
    }

    #[test]
    fn relative_import_display() {
        let err = ResolutionError::RelativeImport {
            level: 2,
            module: Some("utils".to_string()),
        };
        assert_eq!(err.to_string(), "relative import cannot be resolved: ..utils");
    }

    #[test]
    fn resolution_converts_into_coder_error() {
        let err: CoderError = ResolutionError::ModuleNotFound {
            module: "nope".to_string(),
            reason: "No module named 'nope'".to_string(),
        }
        .into();
        assert!(matches!(err, CoderError::Resolution(_)));
    }

    #[test]
    fn generation_error_names_function() {
        let err = GenerationError::Parse {
            function: "greet".to_string(),
            source: ParseError::syntax_error(1, 0, "unexpected token"),
        };
        assert_eq!(err.function(), "greet");
        assert!(err.to_string().contains("greet"));
    }
}
