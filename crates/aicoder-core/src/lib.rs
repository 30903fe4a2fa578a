//! AI Coder core
//!
//! Fills Python functions marked with a decorator (`@ai_code` by default)
//! with model-generated implementations:
//! - Loads the template's environment (imports, literal globals)
//! - Derives a prompt per function (docstring, f-string, constants)
//! - Decides between regenerating and reusing a previous implementation
//! - Splices generated bodies into the template and writes the output
//! - Runs a final whole-file cleanup pass through the model
//!
//! # Example
//!
//! ```rust,ignore
//! use aicoder_core::{AiCoder, CoderConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coder = AiCoder::from_config(CoderConfig::load()?)?;
//! let report = coder.gen_code(Path::new("prompts/src/my_code.py")).await?;
//! println!("Wrote {}", report.output_path.display());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod backend;
pub mod coder;
pub mod config;
pub mod environment;
pub mod error;
pub mod files;
pub mod generator;
pub mod policy;
pub mod prompt;
pub mod prompts;
pub mod resolver;
pub mod symbols;

pub use backend::{LanguageModel, OpenAiChatModel};
pub use coder::{AiCoder, FunctionReport, GenerationReport};
pub use config::{BackendConfig, CoderConfig, GenerationConfig, ResolverConfig, ResolverKind};
pub use environment::EnvironmentLoader;
pub use error::{
    BackendError, CoderError, CoderResult, ConfigError, GenerationError, ResolutionError,
};
pub use files::output_path;
pub use generator::{dedent, strip_code_fences, CodeGenerator};
pub use policy::{Decision, RegenerationPolicy};
pub use prompt::{Prompt, PromptSource, PromptSynthesizer};
pub use resolver::{Catalog, CatalogModule, CatalogResolver, PythonResolver, SymbolResolver};
pub use symbols::{ParamInfo, Signature, Symbol, SymbolTable, Value};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with AI Coder
    pub use crate::{
        AiCoder, CoderConfig, CoderError, CoderResult, Decision, GenerationReport, LanguageModel,
        SymbolResolver,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
