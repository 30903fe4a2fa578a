//! Instructions sent to the model alongside user prompts

use std::path::Path;

/// Default system prompt for per-function generation
pub const CODE_GENERATION_PROMPT: &str = "\
You are an expert Python programmer. You write the body of a single Python \
function from a description of what it must do.
Reply with the function body only: no `def` line, no decorators, no \
explanations. Nested helper functions and imports inside the body are fine. \
Use only names that the description says are defined or imported, plus the \
Python standard library.";

/// Appended to a prompt when the previous reply did not parse
pub const PARSE_RETRY_PROMPT: &str = "\n\nYour previous reply was not valid Python \
({error}). Reply again with only the function body as valid Python code.";

/// Instruction for the final whole-file pass
///
/// `template` is the file the output was generated from; it ends up in the
/// do-not-edit banner. `marker` is the decorator to strip.
#[must_use]
pub fn cleanup_instruction(template: &Path, marker: &str) -> String {
    format!(
        "You are reviewing a Python module whose function bodies were generated \
separately. Return the complete module as valid Python code and nothing else.
- Remove the `@{marker}` decorators and any import that exists only to provide them.
- Move imports used by the generated bodies to the top of the module and drop duplicates.
- Keep every function name, parameter list and docstring exactly as it is.
- Do not change behaviour.
- The first line must be exactly:
###This file is generated by AI from {}. DO NOT MODIFY THIS FILE MANUALLY###",
        template.display(),
    )
}

/// Parse-retry suffix for an error message
#[must_use]
pub fn parse_retry_suffix(error: &str) -> String {
    PARSE_RETRY_PROMPT.replace("{error}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_names_template() {
        let instruction = cleanup_instruction(Path::new("prompts/src/my_code.py"), "ai_code");
        assert!(instruction.contains("`@ai_code`"));
        assert!(instruction.ends_with(
            "###This file is generated by AI from prompts/src/my_code.py. DO NOT MODIFY THIS FILE MANUALLY###"
        ));
    }

    #[test]
    fn retry_suffix_carries_error() {
        let suffix = parse_retry_suffix("syntax error at 1:4");
        assert!(suffix.contains("(syntax error at 1:4)"));
    }
}
