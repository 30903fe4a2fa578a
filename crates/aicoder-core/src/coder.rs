//! Orchestrator
//!
//! `gen_code` runs one template through the whole pipeline:
//!
//! 1. derive the output path and read any previous output
//! 2. parse the template and load its environment
//! 3. per annotated function: decide, then reuse or synthesize + generate
//! 4. splice, serialize, write
//! 5. send the written file through the model once more for cleanup
//!
//! Runs are sequential. A failure after step 4 leaves the step-4 file on
//! disk.

use crate::backend::{LanguageModel, OpenAiChatModel};
use crate::config::{CoderConfig, ResolverKind};
use crate::environment::EnvironmentLoader;
use crate::error::{CoderError, CoderResult, ConfigError};
use crate::files::{locate_template, output_path, read_existing, read_source, write_source};
use crate::generator::CodeGenerator;
use crate::policy::{Decision, RegenerationPolicy};
use crate::prompt::{PromptSource, PromptSynthesizer};
use crate::prompts::cleanup_instruction;
use crate::resolver::{CatalogResolver, PythonResolver, SymbolResolver};
use aicoder_syntax::Module;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What happened to one annotated function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionReport {
    /// Function name
    pub name: String,
    /// Policy decision
    pub decision: Decision,
    /// Prompt origin; `None` when the body was reused
    pub prompt_source: Option<PromptSource>,
}

/// Result of one `gen_code` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// File written
    pub output_path: PathBuf,
    /// Annotated functions in pre-order
    pub functions: Vec<FunctionReport>,
}

impl GenerationReport {
    /// Number of functions that needed a model call
    #[inline]
    #[must_use]
    pub fn generated(&self) -> usize {
        self.functions.iter().filter(|f| f.decision.regenerates()).count()
    }

    /// Number of functions carried over from the previous output
    #[inline]
    #[must_use]
    pub fn reused(&self) -> usize {
        self.functions.len() - self.generated()
    }
}

/// The code generator
pub struct AiCoder {
    config: CoderConfig,
    model: Arc<dyn LanguageModel>,
    resolver: Arc<dyn SymbolResolver>,
}

impl AiCoder {
    /// Create with explicit collaborators
    #[inline]
    #[must_use]
    pub fn new(
        config: CoderConfig,
        model: Arc<dyn LanguageModel>,
        resolver: Arc<dyn SymbolResolver>,
    ) -> Self {
        Self {
            config,
            model,
            resolver,
        }
    }

    /// Create with the backend and resolver named in `config`
    ///
    /// # Errors
    /// Backend construction failures (missing API key) and catalog loading
    /// failures.
    pub fn from_config(config: CoderConfig) -> CoderResult<Self> {
        let model = Arc::new(OpenAiChatModel::from_config(&config.backend)?);
        let resolver: Arc<dyn SymbolResolver> = match config.resolver.kind {
            ResolverKind::Python => Arc::new(
                PythonResolver::new(config.resolver.interpreter.clone())
                    .with_working_dir(config.project_root.clone()),
            ),
            ResolverKind::Catalog => {
                let path = config.resolver.catalog.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("resolver.catalog is not set".to_string())
                })?;
                Arc::new(CatalogResolver::from_path(path)?)
            }
        };
        Ok(Self::new(config, model, resolver))
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// Generate the output file for `template`
    ///
    /// A relative `template` is taken relative to the project root.
    ///
    /// # Errors
    /// Any [`CoderError`]; resolution, generation and backend failures all
    /// abort the run.
    pub async fn gen_code(&self, template: &Path) -> CoderResult<GenerationReport> {
        let (template, template_file) = locate_template(&self.config.project_root, template);
        let out_path = output_path(&self.config.project_root, &template)?;
        tracing::info!("Generating code from {} to {}", template.display(), out_path.display());

        let existing = match read_existing(&out_path).await? {
            Some(code) => {
                Some(Module::parse(&code).map_err(|e| CoderError::parse_error(&out_path, e))?)
            }
            None => None,
        };

        let code = read_source(&template_file).await?;
        let mut target =
            Module::parse(&code).map_err(|e| CoderError::parse_error(&template_file, e))?;

        let names = self.annotated_names(&target)?;
        tracing::info!("Found {} annotated functions", names.len());

        let symbols = EnvironmentLoader::new(self.resolver.as_ref()).load(&target).await?;
        let policy = RegenerationPolicy::new(existing.as_ref());
        let generator = CodeGenerator::new(self.model.as_ref())
            .with_parse_retries(self.config.generation.parse_retries);

        let mut functions = Vec::with_capacity(names.len());
        for name in names {
            let function = target
                .find_function(&name)
                .ok_or_else(|| aicoder_syntax::SpliceError::FunctionNotFound(name.clone()))?;
            let decision = policy.decide(function);

            let (body, prompt_source) = match policy.existing_body(&name) {
                Some(previous) if !decision.regenerates() => {
                    tracing::info!("Reusing existing implementation of {}", name);
                    (previous.body.clone(), None)
                }
                _ => {
                    let prompt = PromptSynthesizer::new(&target, &symbols, self.resolver.as_ref())
                        .synthesize(function)
                        .await?;
                    tracing::info!(
                        "The prompt to generate function {} ({}): {}",
                        name,
                        prompt.source,
                        prompt.text
                    );
                    let body = generator.generate_body(&name, &prompt.text).await?;
                    (body, Some(prompt.source))
                }
            };

            target.replace_function_body(&name, body)?;
            functions.push(FunctionReport {
                name,
                decision,
                prompt_source,
            });
        }

        tracing::info!("Saving the generated code to {}", out_path.display());
        write_source(&out_path, &target.to_source()).await?;

        tracing::info!("Reviewing the code...");
        let saved = read_source(&out_path).await?;
        let instruction = cleanup_instruction(&template, &self.config.marker);
        let reviewed = generator.cleanup(&saved, &instruction).await?;
        write_source(&out_path, &reviewed).await?;
        tracing::info!("Finished generating the code!");

        Ok(GenerationReport {
            output_path: out_path,
            functions,
        })
    }

    /// Annotated function names in pre-order, each unambiguous
    fn annotated_names(&self, target: &Module) -> CoderResult<Vec<String>> {
        let functions = target.functions();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for function in &functions {
            *counts.entry(function.name.as_str()).or_default() += 1;
        }

        let mut names = Vec::new();
        for function in functions.iter().filter(|f| f.is_annotated(&self.config.marker)) {
            if counts.get(function.name.as_str()).copied().unwrap_or(0) > 1 {
                return Err(CoderError::DuplicateFunction(function.name.clone()));
            }
            names.push(function.name.clone());
        }
        Ok(names)
    }
}

impl std::fmt::Debug for AiCoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiCoder").field("config", &self.config).finish_non_exhaustive()
    }
}
