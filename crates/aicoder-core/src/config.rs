//! Run configuration
//!
//! Loaded from `$AICODER_CONFIG`, else `./aicoder.toml` when present, else
//! defaults. Every section and key is optional.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "AICODER_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aicoder.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoderConfig {
    /// Decorator name that marks functions for generation
    pub marker: String,
    /// Directory output paths are rooted at
    pub project_root: PathBuf,
    /// Model backend settings
    pub backend: BackendConfig,
    /// Generation behavior
    pub generation: GenerationConfig,
    /// Import resolution settings
    pub resolver: ResolverConfig,
}

impl CoderConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With marker decorator name
    #[inline]
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// With project root
    #[inline]
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// With parse retry count
    #[inline]
    #[must_use]
    pub fn with_parse_retries(mut self, retries: u32) -> Self {
        self.generation.parse_retries = retries;
        self
    }

    /// Load from `$AICODER_CONFIG`, `./aicoder.toml`, or defaults
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a config file exists but cannot be read
    /// or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_path(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_path(local);
        }
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] on read, parse or validation failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check settings that the schema alone cannot
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an empty marker, a catalog
    /// resolver without a catalog path, or an empty model name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker.trim().is_empty() {
            return Err(ConfigError::Invalid("marker must not be empty".to_string()));
        }
        if self.backend.model.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.model must not be empty".to_string()));
        }
        if self.resolver.kind == ResolverKind::Catalog && self.resolver.catalog.is_none() {
            return Err(ConfigError::Invalid(
                "resolver.catalog is required when resolver.kind = \"catalog\"".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            marker: "ai_code".to_string(),
            project_root: PathBuf::from("."),
            backend: BackendConfig::default(),
            generation: GenerationConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

/// OpenAI-compatible chat backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API base, `/chat/completions` is appended
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Request timeout
    pub timeout_secs: Option<u64>,
    /// Replaces the default code-generation system prompt
    pub system_prompt: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
            timeout_secs: None,
            system_prompt: None,
        }
    }
}

/// Generation behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Extra model calls when a reply does not parse
    pub parse_retries: u32,
}

/// Which resolver backs import resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Probe a live Python interpreter
    #[default]
    Python,
    /// Read a TOML symbol catalog
    Catalog,
}

/// Import resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Resolver implementation
    pub kind: ResolverKind,
    /// Interpreter executable for [`ResolverKind::Python`]
    pub interpreter: String,
    /// Catalog file for [`ResolverKind::Catalog`]
    pub catalog: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::Python,
            interpreter: "python3".to_string(),
            catalog: None,
        }
    }
}
