//! Testing utilities for AI Coder workspace
//!
//! Shared test helpers, fixtures, and fakes.

#![allow(missing_docs)]

use aicoder_core::{AiCoder, BackendError, CatalogResolver, CoderConfig, LanguageModel};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// One recorded model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCall {
    pub prompt: String,
    pub instruction: Option<String>,
}

/// Model that replays scripted replies in order and records every call
///
/// Once the script runs out, calls fail with [`BackendError::Other`].
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ModelCall>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a reply at the end of the script
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(reply.into());
    }

    pub fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait::async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str, instruction: Option<&str>) -> Result<String, BackendError> {
        self.calls.lock().push(ModelCall {
            prompt: prompt.to_string(),
            instruction: instruction.map(ToString::to_string),
        });
        self.replies
            .lock()
            .pop_front()
            .ok_or_else(|| BackendError::Other("scripted model has no reply left".to_string()))
    }
}

/// Model that echoes the prompt back; handy as a no-op cleanup pass
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoModel;

#[async_trait::async_trait]
impl LanguageModel for EchoModel {
    async fn generate(&self, prompt: &str, _instruction: Option<&str>) -> Result<String, BackendError> {
        Ok(prompt.to_string())
    }
}

/// Temporary project directory
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// # Panics
    /// When the temp directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp workspace"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file, creating parents
    ///
    /// # Panics
    /// On I/O failure.
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        std::fs::write(&path, contents).expect("write workspace file");
        path
    }

    /// # Panics
    /// When the file cannot be read.
    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.path(relative)).expect("read workspace file")
    }

    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }

    /// Default config rooted at this workspace
    pub fn config(&self) -> CoderConfig {
        CoderConfig::new().with_project_root(self.root())
    }

    /// Coder over this workspace with the given model and resolver
    pub fn coder(&self, model: Arc<dyn LanguageModel>, resolver: CatalogResolver) -> AiCoder {
        AiCoder::new(self.config(), model, Arc::new(resolver))
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Template with a single docstring-driven function
pub const GREET_TEMPLATE: &str = "\
from ai_code import ai_code


@ai_code
def greet():
    \"return the string 'hello'\"
";

/// Catalog knowing the marker module only
pub fn marker_catalog() -> CatalogResolver {
    CatalogResolver::new().with_value("ai_code", "ai_code")
}
