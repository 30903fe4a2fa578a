//! Import resolution
//!
//! A [`SymbolResolver`] answers the three questions the environment loader
//! and the prompt synthesizer ask about names a template does not define
//! itself:
//!
//! - does module `m` exist,
//! - what is attribute `a` of module `m` (function with signature, submodule,
//!   or plain value),
//! - is `name` a builtin, and is it a function.
//!
//! [`PythonResolver`] asks a real interpreter in a subprocess and never
//! imports anything into this process. [`CatalogResolver`] answers from a
//! declarative TOML catalog.

use crate::error::{ConfigError, ResolutionError};
use crate::symbols::{ParamInfo, Signature, Symbol};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolves module paths, module attributes and builtins
#[async_trait::async_trait]
pub trait SymbolResolver: Send + Sync {
    /// Resolve a dotted module path
    async fn resolve_module(&self, module: &str) -> Result<Symbol, ResolutionError>;

    /// Resolve `attribute` of `module`
    async fn resolve_attribute(&self, module: &str, attribute: &str)
        -> Result<Symbol, ResolutionError>;

    /// Look `name` up among the interpreter builtins
    ///
    /// `Ok(None)` when there is no such builtin.
    async fn resolve_builtin(&self, name: &str) -> Result<Option<Symbol>, ResolutionError>;
}

/// Interpreter-side probe; prints one JSON object
const PROBE_SCRIPT: &str = r#"
import builtins, importlib, inspect, json, sys

def describe(obj):
    if inspect.ismodule(obj):
        return {"kind": "module"}
    if inspect.isfunction(obj):
        params = []
        try:
            parameters = inspect.signature(obj).parameters.values()
        except (TypeError, ValueError):
            parameters = []
        for p in parameters:
            name = p.name
            if p.kind is p.VAR_POSITIONAL:
                name = "*" + name
            elif p.kind is p.VAR_KEYWORD:
                name = "**" + name
            annotation = None
            if p.annotation is not p.empty:
                annotation = inspect.formatannotation(p.annotation)
            params.append({"name": name, "annotation": annotation})
        return {"kind": "function", "params": params}
    return {"kind": "value"}

def missing(exc, module=False):
    return {"kind": "missing", "reason": type(exc).__name__ + ": " + str(exc), "module": module}

def probe(mode, args):
    if mode == "module":
        try:
            return describe(importlib.import_module(args[0]))
        except Exception as exc:
            return missing(exc, module=True)
    if mode == "attribute":
        try:
            module = importlib.import_module(args[0])
        except Exception as exc:
            return missing(exc, module=True)
        if hasattr(module, args[1]):
            return describe(getattr(module, args[1]))
        try:
            return describe(importlib.import_module(args[0] + "." + args[1]))
        except Exception as exc:
            return missing(exc)
    if mode == "builtin":
        if hasattr(builtins, args[0]):
            return describe(getattr(builtins, args[0]))
        return {"kind": "missing", "reason": "not a builtin", "module": False}
    return {"kind": "missing", "reason": "unknown probe " + mode, "module": False}

print(json.dumps(probe(sys.argv[1], sys.argv[2:])))
"#;

/// Probe reply
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Probe {
    Module,
    Function {
        params: Vec<ParamInfo>,
    },
    Value,
    Missing {
        reason: String,
        #[serde(default)]
        module: bool,
    },
}

/// Resolver backed by a Python interpreter subprocess
///
/// The interpreter runs in the working directory when one is set, so
/// modules next to the template (`from helpers import f`) resolve.
#[derive(Debug, Clone)]
pub struct PythonResolver {
    interpreter: String,
    working_dir: Option<PathBuf>,
}

impl PythonResolver {
    /// Create resolver using `interpreter` (e.g. `python3`)
    #[inline]
    #[must_use]
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            working_dir: None,
        }
    }

    /// Run the interpreter in `dir`
    #[inline]
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Interpreter executable
    #[inline]
    #[must_use]
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Directory the interpreter runs in; `None` inherits ours
    #[inline]
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    async fn probe(&self, mode: &str, args: &[&str]) -> Result<Probe, ResolutionError> {
        tracing::debug!("Probing {} {:?} with {}", mode, args, self.interpreter);
        let mut command = tokio::process::Command::new(&self.interpreter);
        command
            .arg("-c")
            .arg(PROBE_SCRIPT)
            .arg(mode)
            .args(args)
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let output = command
            .output()
            .await
            .map_err(|e| ResolutionError::Interpreter(format!("{}: {e}", self.interpreter)))?;

        if !output.status.success() {
            return Err(ResolutionError::Interpreter(format!(
                "{} exited with {}: {}",
                self.interpreter,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().last().unwrap_or_default();
        serde_json::from_str(line)
            .map_err(|e| ResolutionError::InvalidResponse(format!("{e}: {line}")))
    }
}

impl Default for PythonResolver {
    fn default() -> Self {
        Self::new("python3")
    }
}

#[async_trait::async_trait]
impl SymbolResolver for PythonResolver {
    async fn resolve_module(&self, module: &str) -> Result<Symbol, ResolutionError> {
        match self.probe("module", &[module]).await? {
            Probe::Missing { reason, .. } => Err(ResolutionError::ModuleNotFound {
                module: module.to_string(),
                reason,
            }),
            _ => Ok(Symbol::module(module)),
        }
    }

    async fn resolve_attribute(
        &self,
        module: &str,
        attribute: &str,
    ) -> Result<Symbol, ResolutionError> {
        let qualified = format!("{module}.{attribute}");
        match self.probe("attribute", &[module, attribute]).await? {
            Probe::Module => Ok(Symbol::module(qualified)),
            Probe::Function { params } => Ok(Symbol::function(qualified, Signature { params })),
            Probe::Value => Ok(Symbol::attribute(qualified)),
            Probe::Missing { reason, module: true } => Err(ResolutionError::ModuleNotFound {
                module: module.to_string(),
                reason,
            }),
            Probe::Missing { .. } => Err(ResolutionError::AttributeNotFound {
                module: module.to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }

    async fn resolve_builtin(&self, name: &str) -> Result<Option<Symbol>, ResolutionError> {
        Ok(match self.probe("builtin", &[name]).await? {
            Probe::Function { params } => Some(Symbol::function(name, Signature { params })),
            Probe::Module | Probe::Value => Some(Symbol::attribute(name)),
            Probe::Missing { .. } => None,
        })
    }
}

/// Contents of one catalog module (or the builtins table)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogModule {
    /// Function name → parameters as `name` or `name: annotation`
    pub functions: BTreeMap<String, Vec<String>>,
    /// Non-function attributes
    pub values: Vec<String>,
}

/// Declarative symbol catalog
///
/// ```toml
/// [modules.requests]
/// values = ["codes"]
///
/// [modules.requests.functions]
/// get = ["url", "params: dict | None", "**kwargs"]
///
/// [modules."os.path"]
///
/// [builtins.functions]
/// len = ["obj"]
/// ```
///
/// A module listed under `modules` resolves; `m.a` resolves to a submodule
/// when `"m.a"` is itself listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Known modules by dotted path
    pub modules: BTreeMap<String, CatalogModule>,
    /// Builtins
    pub builtins: CatalogModule,
}

/// Resolver backed by a [`Catalog`]
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    catalog: Catalog,
}

impl CatalogResolver {
    /// Create empty resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a catalog
    #[inline]
    #[must_use]
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Parse a TOML catalog
    ///
    /// # Errors
    /// Returns the TOML error when the text does not match the schema.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        Ok(Self::from_catalog(toml::from_str(text)?))
    }

    /// Load a TOML catalog file
    ///
    /// # Errors
    /// Returns [`ConfigError`] on read or parse failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// With an (empty) module
    #[must_use]
    pub fn with_module(mut self, module: &str) -> Self {
        self.catalog.modules.entry(module.to_string()).or_default();
        self
    }

    /// With a module function
    #[must_use]
    pub fn with_function(mut self, module: &str, name: &str, params: &[&str]) -> Self {
        self.catalog
            .modules
            .entry(module.to_string())
            .or_default()
            .functions
            .insert(name.to_string(), params.iter().map(ToString::to_string).collect());
        self
    }

    /// With a module value
    #[must_use]
    pub fn with_value(mut self, module: &str, name: &str) -> Self {
        self.catalog
            .modules
            .entry(module.to_string())
            .or_default()
            .values
            .push(name.to_string());
        self
    }

    /// With a builtin function
    #[must_use]
    pub fn with_builtin_function(mut self, name: &str, params: &[&str]) -> Self {
        self.catalog
            .builtins
            .functions
            .insert(name.to_string(), params.iter().map(ToString::to_string).collect());
        self
    }

    /// The catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lookup(table: &CatalogModule, name: &str, qualified: String) -> Option<Symbol> {
        if let Some(params) = table.functions.get(name) {
            return Some(Symbol::function(qualified, Signature::from_params(params)));
        }
        table
            .values
            .iter()
            .any(|value| value == name)
            .then(|| Symbol::attribute(qualified))
    }
}

#[async_trait::async_trait]
impl SymbolResolver for CatalogResolver {
    async fn resolve_module(&self, module: &str) -> Result<Symbol, ResolutionError> {
        if self.catalog.modules.contains_key(module) {
            Ok(Symbol::module(module))
        } else {
            Err(ResolutionError::ModuleNotFound {
                module: module.to_string(),
                reason: "not in catalog".to_string(),
            })
        }
    }

    async fn resolve_attribute(
        &self,
        module: &str,
        attribute: &str,
    ) -> Result<Symbol, ResolutionError> {
        let table = self
            .catalog
            .modules
            .get(module)
            .ok_or_else(|| ResolutionError::ModuleNotFound {
                module: module.to_string(),
                reason: "not in catalog".to_string(),
            })?;

        let qualified = format!("{module}.{attribute}");
        if self.catalog.modules.contains_key(&qualified) {
            return Ok(Symbol::module(qualified));
        }
        Self::lookup(table, attribute, qualified).ok_or_else(|| {
            ResolutionError::AttributeNotFound {
                module: module.to_string(),
                attribute: attribute.to_string(),
            }
        })
    }

    async fn resolve_builtin(&self, name: &str) -> Result<Option<Symbol>, ResolutionError> {
        Ok(Self::lookup(&self.catalog.builtins, name, name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        [modules.requests]
        values = ["codes"]

        [modules.requests.functions]
        get = ["url", "params: dict", "**kwargs"]

        [modules.os]
        [modules."os.path"]

        [builtins.functions]
        len = ["obj"]

        [builtins]
        values = ["True"]
    "#;

    fn resolver() -> CatalogResolver {
        CatalogResolver::from_toml_str(CATALOG).unwrap()
    }

    #[tokio::test]
    async fn catalog_resolves_modules() {
        let r = resolver();
        assert_eq!(r.resolve_module("requests").await.unwrap(), Symbol::module("requests"));
        let err = r.resolve_module("numpy").await.unwrap_err();
        assert!(matches!(err, ResolutionError::ModuleNotFound { .. }));
    }

    #[tokio::test]
    async fn catalog_resolves_attributes() {
        let r = resolver();
        let get = r.resolve_attribute("requests", "get").await.unwrap();
        assert_eq!(get.signature().unwrap().to_string(), "url, params: dict, **kwargs");

        assert_eq!(
            r.resolve_attribute("requests", "codes").await.unwrap(),
            Symbol::attribute("requests.codes")
        );
        assert_eq!(
            r.resolve_attribute("os", "path").await.unwrap(),
            Symbol::module("os.path")
        );

        let err = r.resolve_attribute("requests", "post").await.unwrap_err();
        assert_eq!(
            err,
            ResolutionError::AttributeNotFound {
                module: "requests".to_string(),
                attribute: "post".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn catalog_builtins() {
        let r = resolver();
        let len = r.resolve_builtin("len").await.unwrap().unwrap();
        assert_eq!(len.signature().unwrap().to_string(), "obj");
        assert_eq!(r.resolve_builtin("True").await.unwrap(), Some(Symbol::attribute("True")));
        assert_eq!(r.resolve_builtin("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn builder_matches_toml() {
        let r = CatalogResolver::new()
            .with_function("math", "hypot", &["*coordinates"])
            .with_value("math", "pi")
            .with_builtin_function("print", &["*args"]);
        assert!(r.resolve_attribute("math", "hypot").await.unwrap().signature().is_some());
        assert_eq!(r.resolve_attribute("math", "pi").await.unwrap(), Symbol::attribute("math.pi"));
        assert!(r.resolve_builtin("print").await.unwrap().is_some());
    }

    #[test]
    fn probe_replies_deserialize() {
        let probe: Probe =
            serde_json::from_str(r#"{"kind": "function", "params": [{"name": "x", "annotation": "int"}]}"#)
                .unwrap();
        assert!(matches!(probe, Probe::Function { ref params } if params[0].annotation.as_deref() == Some("int")));

        let probe: Probe =
            serde_json::from_str(r#"{"kind": "missing", "reason": "ModuleNotFoundError: x", "module": true}"#)
                .unwrap();
        assert!(matches!(probe, Probe::Missing { module: true, .. }));
    }

    fn python3() -> Option<PythonResolver> {
        let found = std::process::Command::new("python3")
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success());
        if !found {
            eprintln!("python3 not found, skipping");
        }
        found.then(PythonResolver::default)
    }

    #[tokio::test]
    async fn interpreter_resolves_stdlib() {
        let Some(r) = python3() else { return };
        assert_eq!(r.interpreter(), "python3");

        assert_eq!(r.resolve_module("json").await.unwrap(), Symbol::module("json"));
        let err = r.resolve_module("no_such_module_for_aicoder").await.unwrap_err();
        assert!(matches!(err, ResolutionError::ModuleNotFound { .. }));

        let dumps = r.resolve_attribute("json", "dumps").await.unwrap();
        assert!(matches!(dumps, Symbol::Function { ref qualified_name, .. } if qualified_name == "json.dumps"));
        assert_eq!(dumps.signature().unwrap().params[0].name, "obj");

        assert_eq!(
            r.resolve_attribute("os", "path").await.unwrap(),
            Symbol::module("os.path")
        );
        assert_eq!(
            r.resolve_attribute("json", "nope").await.unwrap_err(),
            ResolutionError::AttributeNotFound {
                module: "json".to_string(),
                attribute: "nope".to_string(),
            }
        );

        assert_eq!(r.resolve_builtin("len").await.unwrap(), Some(Symbol::attribute("len")));
        assert_eq!(r.resolve_builtin("no_such_builtin").await.unwrap(), None);
    }

    #[tokio::test]
    async fn interpreter_sees_modules_in_working_dir() {
        let Some(r) = python3() else { return };
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("aicoder_helpers.py"), "def combine(a, b: int, *rest):\n    pass\n")
            .unwrap();

        let r = r.with_working_dir(dir.path());
        assert_eq!(r.working_dir(), Some(dir.path()));
        let combine = r.resolve_attribute("aicoder_helpers", "combine").await.unwrap();
        assert_eq!(combine.signature().unwrap().to_string(), "a, b: int, *rest");
    }

    #[tokio::test]
    async fn missing_interpreter_is_an_error() {
        let r = PythonResolver::new("/nonexistent/python-for-aicoder-tests");
        let err = r.resolve_module("json").await.unwrap_err();
        assert!(matches!(err, ResolutionError::Interpreter(_)));
    }
}
