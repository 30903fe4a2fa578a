//! Prompt synthesis
//!
//! A function's prompt comes from the first source that yields one:
//!
//! 1. its docstring,
//! 2. the first f-string in its body, followed by one hint per interpolated
//!    bare name the environment knows about,
//! 3. every literal constant in its body, joined with spaces.

use crate::error::ResolutionError;
use crate::resolver::SymbolResolver;
use crate::symbols::{Symbol, SymbolTable};
use aicoder_syntax::{Expr, FString, FunctionDef, Module, ParamKind};
use std::fmt;

/// Where a prompt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptSource {
    /// Leading docstring
    Docstring,
    /// First f-string plus name hints
    FString,
    /// Literal constants of the body
    Constants,
}

impl fmt::Display for PromptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Docstring => "docstring",
            Self::FString => "f-string",
            Self::Constants => "constants",
        })
    }
}

/// Synthesized prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Prompt text, possibly empty
    pub text: String,
    /// Which rule produced it
    pub source: PromptSource,
}

/// Derives prompts for annotated functions
pub struct PromptSynthesizer<'a> {
    target: &'a Module,
    symbols: &'a SymbolTable,
    resolver: &'a dyn SymbolResolver,
}

impl<'a> PromptSynthesizer<'a> {
    /// Create synthesizer over the target tree and its environment
    #[inline]
    #[must_use]
    pub fn new(target: &'a Module, symbols: &'a SymbolTable, resolver: &'a dyn SymbolResolver) -> Self {
        Self {
            target,
            symbols,
            resolver,
        }
    }

    /// Prompt for `function`
    ///
    /// # Errors
    /// Only when the resolver itself fails during a builtin lookup; unknown
    /// names are logged and skipped.
    pub async fn synthesize(&self, function: &FunctionDef) -> Result<Prompt, ResolutionError> {
        if let Some(doc) = function.docstring().filter(|doc| !doc.is_empty()) {
            return Ok(Prompt {
                text: doc,
                source: PromptSource::Docstring,
            });
        }

        if let Some(text) = self.fstring_prompt(function).await? {
            return Ok(Prompt {
                text,
                source: PromptSource::FString,
            });
        }

        Ok(Prompt {
            text: constants_prompt(function),
            source: PromptSource::Constants,
        })
    }

    async fn fstring_prompt(&self, function: &FunctionDef) -> Result<Option<String>, ResolutionError> {
        let Some(fstring) = first_fstring(function) else {
            tracing::warn!("No f-string found in function {}", function.name);
            return Ok(None);
        };

        let mut prompt = fstring.text.clone();
        for name in fstring.interpolations.iter().filter_map(Expr::as_name) {
            match self.hint(name).await? {
                Some(hint) => prompt.push_str(&hint),
                None => tracing::warn!(
                    "Interpolated name {} in function {} is not defined anywhere",
                    name,
                    function.name
                ),
            }
        }
        Ok(Some(prompt))
    }

    async fn hint(&self, name: &str) -> Result<Option<String>, ResolutionError> {
        if let Some(defined) = self.target.find_function(name) {
            return Ok(Some(format!(
                "\n The function: {name} is already defined, you can just call it, which has Parameters: {}",
                positional_params(defined)
            )));
        }

        if let Some(symbol) = self.symbols.get(name) {
            return Ok(Some(match symbol.signature() {
                Some(signature) => imported_hint(name, &signature.to_string()),
                None => format!("\n The variable: {name} is already defined, you can just use it."),
            }));
        }

        Ok(match self.resolver.resolve_builtin(name).await? {
            Some(Symbol::Function { signature, .. }) => {
                Some(imported_hint(name, &signature.to_string()))
            }
            _ => None,
        })
    }
}

fn imported_hint(name: &str, params: &str) -> String {
    format!("\n The function: {name} is imported, you can just call it, which has Parameters: {params}")
}

fn positional_params(function: &FunctionDef) -> String {
    function
        .params
        .iter()
        .filter(|p| matches!(p.kind, ParamKind::PositionalOnly | ParamKind::Regular))
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_fstring(function: &FunctionDef) -> Option<&FString> {
    function.body_exprs().into_iter().find_map(|expr| match expr {
        Expr::FString(fstring) => Some(fstring),
        _ => None,
    })
}

fn constants_prompt(function: &FunctionDef) -> String {
    function
        .body_exprs()
        .into_iter()
        .filter_map(|expr| match expr {
            Expr::Constant(constant) => Some(constant.as_prompt_text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentLoader;
    use crate::resolver::CatalogResolver;

    async fn prompt_for(source: &str, function: &str) -> Prompt {
        let module = Module::parse(source).unwrap();
        let resolver = CatalogResolver::new()
            .with_function("requests", "get", &["url", "params: dict"])
            .with_builtin_function("sorted", &["iterable", "key", "reverse"]);
        let symbols = EnvironmentLoader::new(&resolver).load(&module).await.unwrap();
        let synthesizer = PromptSynthesizer::new(&module, &symbols, &resolver);
        let function = module.find_function(function).unwrap();
        synthesizer.synthesize(function).await.unwrap()
    }

    #[tokio::test]
    async fn docstring_wins() {
        let prompt = prompt_for(
            "@ai_code\ndef square(x):\n    \"compute the square of x\"\n    f\"{x}\"\n",
            "square",
        )
        .await;
        assert_eq!(prompt.source, PromptSource::Docstring);
        assert_eq!(prompt.text, "compute the square of x");
    }

    #[tokio::test]
    async fn multiline_docstring_is_cleaned() {
        let prompt = prompt_for(
            "def news(keywords):\n    \"\"\"\n    Fetch the news.\n      :param keywords: list\n    \"\"\"\n",
            "news",
        )
        .await;
        assert_eq!(prompt.text, "Fetch the news.\n  :param keywords: list");
    }

    #[tokio::test]
    async fn fstring_with_defined_function_hint() {
        let prompt = prompt_for(
            "def helper(a, b):\n    return a + b\n\n@ai_code\ndef use():\n    f\"sum using {helper}\"\n",
            "use",
        )
        .await;
        assert_eq!(prompt.source, PromptSource::FString);
        assert_eq!(
            prompt.text,
            "f\"sum using {helper}\"\n The function: helper is already defined, you can just call it, which has Parameters: a, b"
        );
    }

    #[tokio::test]
    async fn fstring_hints_in_interpolation_order() {
        let prompt = prompt_for(
            "from requests import get\nLIMIT = 5\n\ndef top():\n    f\"{LIMIT} items via {get} then {sorted}, {unknown}\"\n",
            "top",
        )
        .await;
        assert_eq!(
            prompt.text,
            "f\"{LIMIT} items via {get} then {sorted}, {unknown}\"\
             \n The variable: LIMIT is already defined, you can just use it.\
             \n The function: get is imported, you can just call it, which has Parameters: url, params: dict\
             \n The function: sorted is imported, you can just call it, which has Parameters: iterable, key, reverse"
        );
    }

    #[tokio::test]
    async fn non_name_interpolations_get_no_hint() {
        let prompt = prompt_for("def f(x):\n    f\"{x + 1}\"\n", "f").await;
        assert_eq!(prompt.text, "f\"{x + 1}\"");
    }

    #[tokio::test]
    async fn constants_fallback_in_preorder() {
        let prompt = prompt_for("def f():\n    x = ['sort', 3]\n    return 'desc'\n", "f").await;
        assert_eq!(prompt.source, PromptSource::Constants);
        assert_eq!(prompt.text, "sort 3 desc");
    }

    #[tokio::test]
    async fn empty_body_gives_empty_prompt() {
        let prompt = prompt_for("def f():\n    pass\n", "f").await;
        assert_eq!(prompt.text, "");
    }

    #[tokio::test]
    async fn empty_docstring_falls_through() {
        let prompt = prompt_for("def f():\n    \"\"\n    return 'x'\n", "f").await;
        assert_eq!(prompt.source, PromptSource::Constants);
        assert_eq!(prompt.text, " x");
    }
}
