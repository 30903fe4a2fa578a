//! End-to-end runs of `AiCoder::gen_code` against a scripted model

use aicoder_core::{CatalogResolver, CoderError, Decision, GenerationError, PromptSource, ResolutionError};
use aicoder_test_utils::{marker_catalog, EchoModel, ScriptedModel, TestWorkspace, GREET_TEMPLATE};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

const GREET_SPLICED: &str = "\
from ai_code import ai_code


@ai_code
def greet():
    return 'hello'
";

const GREET_CLEANED: &str = "\
###This file is generated by AI from prompts/src/greet.py. DO NOT MODIFY THIS FILE MANUALLY###

def greet():
    return 'hello'
";

#[tokio::test]
async fn greet_end_to_end() {
    let ws = TestWorkspace::new();
    ws.write("prompts/src/greet.py", GREET_TEMPLATE);
    let model = Arc::new(ScriptedModel::new([
        "```python\nreturn 'hello'\n```".to_string(),
        format!("```python\n{GREET_CLEANED}```\n"),
    ]));

    let report = ws
        .coder(model.clone(), marker_catalog())
        .gen_code(Path::new("prompts/src/greet.py"))
        .await
        .unwrap();

    assert_eq!(report.output_path, ws.path("src/greet.py"));
    assert_eq!(report.functions.len(), 1);
    assert_eq!(report.functions[0].decision, Decision::New);
    assert_eq!(report.functions[0].prompt_source, Some(PromptSource::Docstring));

    let calls = model.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].prompt, "return the string 'hello'");
    assert_eq!(calls[0].instruction, None);
    assert_eq!(calls[1].prompt, GREET_SPLICED);
    assert!(calls[1]
        .instruction
        .as_deref()
        .unwrap()
        .contains("generated by AI from prompts/src/greet.py"));

    assert_eq!(ws.read("src/greet.py"), GREET_CLEANED);
}

#[tokio::test]
async fn no_annotated_functions_still_runs_cleanup() {
    let ws = TestWorkspace::new();
    let template = "import os\n\n\ndef plain():\n    return os.sep\n";
    ws.write("prompts/plain.py", template);
    let model = Arc::new(ScriptedModel::new(["```\nimport os\n```"]));

    let report = ws
        .coder(model.clone(), CatalogResolver::new().with_module("os"))
        .gen_code(Path::new("prompts/plain.py"))
        .await
        .unwrap();

    assert!(report.functions.is_empty());
    let calls = model.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, template);
    assert!(calls[0].instruction.is_some());
    assert_eq!(ws.read("plain.py"), "import os\n");
}

#[tokio::test]
async fn existing_implementation_is_reused_verbatim() {
    let ws = TestWorkspace::new();
    ws.write("prompts/src/greet.py", GREET_TEMPLATE);
    ws.write(
        "src/greet.py",
        "def greet():\n    message = 'hi'\n\n    return message\n",
    );
    let model = Arc::new(ScriptedModel::new(["done\n"]));

    let report = ws
        .coder(model.clone(), marker_catalog())
        .gen_code(Path::new("prompts/src/greet.py"))
        .await
        .unwrap();

    assert_eq!(report.functions[0].decision, Decision::ReuseExisting);
    assert_eq!(report.functions[0].prompt_source, None);
    assert_eq!(report.reused(), 1);

    let calls = model.calls();
    assert_eq!(calls.len(), 1, "only the cleanup pass may call the model");
    assert_eq!(
        calls[0].prompt,
        "from ai_code import ai_code\n\n\n@ai_code\ndef greet():\n    message = 'hi'\n\n    return message\n"
    );
}

#[tokio::test]
async fn second_run_reuses_first_run_output() {
    let ws = TestWorkspace::new();
    ws.write("prompts/src/greet.py", GREET_TEMPLATE);
    let model = Arc::new(ScriptedModel::new(["return 'hello'", GREET_CLEANED]));
    let coder = ws.coder(model.clone(), marker_catalog());
    coder.gen_code(Path::new("prompts/src/greet.py")).await.unwrap();
    assert_eq!(model.call_count(), 2);
    assert_eq!(model.remaining(), 0);

    model.push_reply(GREET_CLEANED);
    let report = coder.gen_code(Path::new("prompts/src/greet.py")).await.unwrap();

    assert_eq!(report.generated(), 0);
    assert_eq!(model.call_count(), 3);
    assert_eq!(model.remaining(), 0);
    assert_eq!(model.calls()[2].prompt, GREET_SPLICED);
    assert_eq!(ws.read("src/greet.py"), GREET_CLEANED);
}

#[tokio::test]
async fn echoed_cleanup_writes_the_template_unchanged() {
    let ws = TestWorkspace::new();
    let template = "import os\n\n# keep me\nROOT = os.sep  # trailing\n";
    ws.write("prompts/pkg/paths.py", template);

    let report = ws
        .coder(Arc::new(EchoModel), CatalogResolver::new().with_module("os"))
        .gen_code(Path::new("prompts/pkg/paths.py"))
        .await
        .unwrap();

    assert!(report.functions.is_empty());
    assert_eq!(ws.read("pkg/paths.py"), template);
}

#[tokio::test]
async fn generated_multiline_string_is_written_intact() {
    let ws = TestWorkspace::new();
    ws.write("prompts/src/greet.py", GREET_TEMPLATE);
    let model = Arc::new(ScriptedModel::new(["```python\nbanner = \"\"\"hello\n  there\n\"\"\"\nreturn banner\n```"]));
    let coder = ws.coder(model.clone(), marker_catalog());

    let err = coder.gen_code(Path::new("prompts/src/greet.py")).await.unwrap_err();
    assert!(matches!(err, CoderError::Backend(_)), "script has no cleanup reply");

    assert_eq!(
        ws.read("src/greet.py"),
        "from ai_code import ai_code\n\n\n@ai_code\ndef greet():\n    banner = \"\"\"hello\n  there\n\"\"\"\n    return banner\n"
    );
}

#[tokio::test]
async fn fstring_prompt_carries_helper_hint() {
    let ws = TestWorkspace::new();
    ws.write(
        "prompts/calc.py",
        "from ai_code import ai_code


def helper(a, b):
    return a + b


@ai_code
def use_helper():
    f\"add two numbers using {helper}\"
",
    );
    let model = Arc::new(ScriptedModel::new(["return helper(1, 2)", "ok\n"]));

    let report = ws
        .coder(model.clone(), marker_catalog())
        .gen_code(Path::new("prompts/calc.py"))
        .await
        .unwrap();

    assert_eq!(report.functions[0].prompt_source, Some(PromptSource::FString));
    assert_eq!(
        model.calls()[0].prompt,
        "f\"add two numbers using {helper}\"\n The function: helper is already defined, \
         you can just call it, which has Parameters: a, b"
    );
    assert!(model.calls()[1].prompt.contains("def use_helper():\n    return helper(1, 2)\n"));
}

#[tokio::test]
async fn unresolvable_import_aborts_before_any_call() {
    let ws = TestWorkspace::new();
    ws.write(
        "prompts/news.py",
        "import numpy\nfrom ai_code import ai_code\n\n\n@ai_code\ndef news():\n    \"fetch news\"\n",
    );
    let model = Arc::new(ScriptedModel::new(["return []", "ok\n"]));

    let err = ws
        .coder(model.clone(), marker_catalog())
        .gen_code(Path::new("prompts/news.py"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoderError::Resolution(ResolutionError::ModuleNotFound { ref module, .. }) if module == "numpy"
    ));
    assert_eq!(model.call_count(), 0);
    assert!(!ws.exists("news.py"));
}

#[tokio::test]
async fn unparseable_reply_is_a_generation_error() {
    let ws = TestWorkspace::new();
    ws.write("prompts/src/greet.py", GREET_TEMPLATE);
    let model = Arc::new(ScriptedModel::new(["Sure! Here is the code: def (", "ok\n"]));

    let err = ws
        .coder(model.clone(), marker_catalog())
        .gen_code(Path::new("prompts/src/greet.py"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoderError::Generation(GenerationError::Parse { ref function, .. }) if function == "greet"
    ));
    assert_eq!(model.call_count(), 1);
    assert!(!ws.exists("src/greet.py"));
}

#[tokio::test]
async fn duplicate_annotated_name_is_rejected_before_any_call() {
    let ws = TestWorkspace::new();
    ws.write(
        "prompts/dup.py",
        "from ai_code import ai_code\n\n\n@ai_code\ndef f():\n    \"one\"\n\n\n@ai_code\ndef f():\n    \"two\"\n",
    );
    let model = Arc::new(ScriptedModel::default());

    let err = ws
        .coder(model.clone(), marker_catalog())
        .gen_code(Path::new("prompts/dup.py"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoderError::DuplicateFunction(ref name) if name == "f"));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn failed_cleanup_leaves_spliced_file() {
    let ws = TestWorkspace::new();
    ws.write("prompts/src/greet.py", GREET_TEMPLATE);
    let model = Arc::new(ScriptedModel::new(["return 'hello'"]));

    let err = ws
        .coder(model.clone(), marker_catalog())
        .gen_code(Path::new("prompts/src/greet.py"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoderError::Backend(_)));
    assert_eq!(ws.read("src/greet.py"), GREET_SPLICED);
}

#[tokio::test]
async fn template_without_directory_is_rejected() {
    let ws = TestWorkspace::new();
    ws.write("greet.py", GREET_TEMPLATE);
    let model = Arc::new(ScriptedModel::default());

    let err = ws
        .coder(model, marker_catalog())
        .gen_code(Path::new("greet.py"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoderError::InvalidPath { .. }));
}
