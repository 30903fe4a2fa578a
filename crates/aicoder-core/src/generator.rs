//! Code generator bridge
//!
//! Turns a prompt into a statement sequence ready for splicing: call the
//! model, strip Markdown code fences, dedent, parse.

use crate::backend::LanguageModel;
use crate::error::{BackendError, GenerationError};
use crate::prompts::parse_retry_suffix;
use aicoder_syntax::{Module, Stmt};

/// Drives a [`LanguageModel`] for body generation and file cleanup
pub struct CodeGenerator<'a> {
    model: &'a dyn LanguageModel,
    parse_retries: u32,
}

impl<'a> CodeGenerator<'a> {
    /// Create bridge over a model
    #[inline]
    #[must_use]
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Self {
            model,
            parse_retries: 0,
        }
    }

    /// With extra attempts for unparseable replies
    #[inline]
    #[must_use]
    pub fn with_parse_retries(mut self, retries: u32) -> Self {
        self.parse_retries = retries;
        self
    }

    /// Generate a body for `function` from `prompt`
    ///
    /// Returned statements carry no source locations.
    ///
    /// # Errors
    /// [`GenerationError::Backend`] when the model call fails,
    /// [`GenerationError::Parse`] when the last reply does not parse.
    pub async fn generate_body(&self, function: &str, prompt: &str) -> Result<Vec<Stmt>, GenerationError> {
        let mut request = prompt.to_string();
        let mut attempt = 0;

        loop {
            let reply = self
                .model
                .generate(&request, None)
                .await
                .map_err(|source| GenerationError::Backend {
                    function: function.to_string(),
                    source,
                })?;
            tracing::debug!("Reply for {}: {}", function, reply);

            match parse_body(&reply) {
                Ok(body) => return Ok(body),
                Err(source) if attempt < self.parse_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Reply for {} did not parse ({}), retry {}/{}",
                        function,
                        source,
                        attempt,
                        self.parse_retries
                    );
                    request = format!("{prompt}{}", parse_retry_suffix(&source.to_string()));
                }
                Err(source) => {
                    return Err(GenerationError::Parse {
                        function: function.to_string(),
                        source,
                    })
                }
            }
        }
    }

    /// Send a whole file through the model with `instruction`, fences
    /// stripped from the reply
    ///
    /// # Errors
    /// The backend error, if the call fails.
    pub async fn cleanup(&self, source: &str, instruction: &str) -> Result<String, BackendError> {
        let reply = self.model.generate(source, Some(instruction)).await?;
        Ok(strip_code_fences(&reply))
    }
}

fn parse_body(reply: &str) -> Result<Vec<Stmt>, aicoder_syntax::ParseError> {
    let code = dedent(&strip_code_fences(reply));
    let mut body = Module::parse(&code)?.body;
    for stmt in &mut body {
        stmt.clear_locations();
    }
    Ok(body)
}

/// Remove Markdown fence lines (```` ``` ```` with or without a language tag)
///
/// Leading and trailing blank lines go too; non-empty output ends with a
/// newline.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect();

    let start = lines.iter().position(|line| !line.trim().is_empty());
    let end = lines.iter().rposition(|line| !line.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => {
            let mut out = lines[start..=end].join("\n");
            out.push('\n');
            out
        }
        _ => String::new(),
    }
}

/// Remove the whitespace prefix shared by all non-blank lines
#[must_use]
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(|common, prefix| {
            let shared = common
                .char_indices()
                .zip(prefix.chars())
                .find(|((_, a), b)| a != b)
                .map_or(common.len().min(prefix.len()), |((i, _), _)| i);
            &common[..shared]
        })
        .unwrap_or("");

    if margin.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(line.strip_prefix(margin).unwrap_or_else(|| line.trim_start()));
        out.push('\n');
    }
    out
}
