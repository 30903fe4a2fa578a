//! Environment loading
//!
//! One pass over a template's top-level statements, in source order:
//!
//! - `import a.b` binds `a`, `import a.b as c` binds `c`; the full dotted
//!   path is always resolved
//! - `from m import x as y` resolves `m`, then `m.x`, and binds `y`
//! - `from m import *` resolves `m` and binds nothing
//! - `name = <literal>` binds the evaluated literal; other values are skipped
//!
//! Any resolution failure aborts the load.

use crate::error::ResolutionError;
use crate::resolver::SymbolResolver;
use crate::symbols::{Symbol, SymbolTable, Value};
use aicoder_syntax::{Import, ImportFrom, Module, StmtKind};

/// Builds the [`SymbolTable`] for one run
pub struct EnvironmentLoader<'a> {
    resolver: &'a dyn SymbolResolver,
}

impl<'a> EnvironmentLoader<'a> {
    /// Create loader over a resolver
    #[inline]
    #[must_use]
    pub fn new(resolver: &'a dyn SymbolResolver) -> Self {
        Self { resolver }
    }

    /// Resolve imports and evaluate literal globals of `module`
    ///
    /// # Errors
    /// The first [`ResolutionError`] encountered.
    pub async fn load(&self, module: &Module) -> Result<SymbolTable, ResolutionError> {
        let mut table = SymbolTable::new();

        for stmt in &module.body {
            match &stmt.kind {
                StmtKind::Import(import) => self.bind_import(import, &mut table).await?,
                StmtKind::ImportFrom(import) => self.bind_import_from(import, &mut table).await?,
                StmtKind::Assign(assign) => match Value::from_literal(&assign.value) {
                    Some(value) => {
                        tracing::debug!("Global {} = {}", assign.target, value);
                        table.bind(assign.target.clone(), Symbol::Literal(value));
                    }
                    None => tracing::debug!("Skipping non-literal global {}", assign.target),
                },
                _ => {}
            }
        }

        tracing::info!("Loaded environment with {} symbols", table.len());
        Ok(table)
    }

    async fn bind_import(
        &self,
        import: &Import,
        table: &mut SymbolTable,
    ) -> Result<(), ResolutionError> {
        for alias in &import.names {
            let resolved = self.resolver.resolve_module(&alias.name).await?;
            let symbol = match &alias.asname {
                Some(_) => resolved,
                None => Symbol::module(alias.bound_name()),
            };
            tracing::debug!("import {} bound as {}", alias.name, alias.bound_name());
            table.bind(alias.bound_name(), symbol);
        }
        Ok(())
    }

    async fn bind_import_from(
        &self,
        import: &ImportFrom,
        table: &mut SymbolTable,
    ) -> Result<(), ResolutionError> {
        let module = match (&import.module, import.level) {
            (Some(module), 0) => module,
            (module, level) => {
                return Err(ResolutionError::RelativeImport {
                    level,
                    module: module.clone(),
                })
            }
        };

        self.resolver.resolve_module(module).await?;
        for alias in &import.names {
            let symbol = self.resolver.resolve_attribute(module, &alias.name).await?;
            tracing::debug!("from {} import {} bound as {}", module, alias.name, alias.bound_name());
            table.bind(alias.bound_name(), symbol);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CatalogResolver;
    use aicoder_syntax::Constant;

    fn resolver() -> CatalogResolver {
        CatalogResolver::new()
            .with_function("requests", "get", &["url", "params: dict"])
            .with_value("json", "JSONDecodeError")
            .with_module("os")
            .with_module("os.path")
    }

    async fn load(source: &str) -> Result<SymbolTable, ResolutionError> {
        let module = Module::parse(source).unwrap();
        let resolver = resolver();
        EnvironmentLoader::new(&resolver).load(&module).await
    }

    #[tokio::test]
    async fn binds_imports_and_literals() {
        let table = load(
            "import os.path\nimport requests as rq\nfrom requests import get as fetch\n\
             from json import *\nLIMIT = -10\nNAMES = ['a', 'b']\nNOW = compute()\n",
        )
        .await
        .unwrap();

        assert_eq!(table.get("os"), Some(&Symbol::module("os")));
        assert_eq!(table.get("rq"), Some(&Symbol::module("requests")));
        assert_eq!(
            table.get("fetch").and_then(Symbol::signature).map(ToString::to_string),
            Some("url, params: dict".to_string())
        );
        assert_eq!(
            table.get("LIMIT"),
            Some(&Symbol::Literal(Value::Constant(Constant::Int("-10".to_string()))))
        );
        assert!(table.contains("NAMES"));
        assert!(!table.contains("NOW"));
        assert!(!table.contains("JSONDecodeError"));

        let mut bound: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        bound.sort_unstable();
        assert_eq!(bound, vec!["LIMIT", "NAMES", "fetch", "os", "rq"]);
    }

    #[tokio::test]
    async fn nested_statements_are_ignored() {
        let table = load("def f():\n    import numpy\n    X = 1\n").await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn unresolvable_module_is_fatal() {
        let err = load("import numpy\n").await.unwrap_err();
        assert!(matches!(err, ResolutionError::ModuleNotFound { ref module, .. } if module == "numpy"));
    }

    #[tokio::test]
    async fn unresolvable_attribute_is_fatal() {
        let err = load("from requests import post\n").await.unwrap_err();
        assert!(matches!(err, ResolutionError::AttributeNotFound { .. }));
    }

    #[tokio::test]
    async fn relative_import_is_fatal() {
        let err = load("from .helpers import tidy\n").await.unwrap_err();
        assert_eq!(
            err,
            ResolutionError::RelativeImport {
                level: 1,
                module: Some("helpers".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn later_assignment_shadows_import() {
        let table = load("import requests\nrequests = 3\n").await.unwrap();
        assert!(matches!(table.get("requests"), Some(Symbol::Literal(_))));
    }
}
