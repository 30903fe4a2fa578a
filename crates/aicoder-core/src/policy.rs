//! Regeneration policy
//!
//! Decides, per annotated function, whether to call the model or carry a
//! previous implementation forward. Branches are checked in order and the
//! first that holds wins.

use aicoder_syntax::{FunctionDef, Module};
use std::fmt;

/// Outcome for one annotated function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Regenerate even though an implementation exists
    ForceUpdate,
    /// Regenerate because the prompt changed since the last run
    PromptChanged,
    /// Copy the body from the existing output
    ReuseExisting,
    /// Generate for the first time
    New,
}

impl Decision {
    /// Whether this decision needs a model call
    #[inline]
    #[must_use]
    pub fn regenerates(self) -> bool {
        !matches!(self, Self::ReuseExisting)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ForceUpdate => "force-update",
            Self::PromptChanged => "prompt-changed",
            Self::ReuseExisting => "reuse",
            Self::New => "new",
        })
    }
}

/// Regeneration policy for one run
#[derive(Debug, Clone, Copy)]
pub struct RegenerationPolicy<'a> {
    existing: Option<&'a Module>,
}

impl<'a> RegenerationPolicy<'a> {
    /// Create policy; `existing` is the previous output, if any
    #[inline]
    #[must_use]
    pub fn new(existing: Option<&'a Module>) -> Self {
        Self { existing }
    }

    /// Decide what to do with `function`
    #[must_use]
    pub fn decide(&self, function: &FunctionDef) -> Decision {
        if self.is_force_update(function) {
            Decision::ForceUpdate
        } else if self.is_prompt_updated(function) {
            Decision::PromptChanged
        } else if self.existing_body(&function.name).is_some() {
            Decision::ReuseExisting
        } else {
            Decision::New
        }
    }

    /// Body of the same-named function in the existing output
    #[must_use]
    pub fn existing_body(&self, name: &str) -> Option<&'a FunctionDef> {
        self.existing.and_then(|existing| existing.find_function(name))
    }

    // Hook for an explicit per-function override; never set yet.
    fn is_force_update(&self, _function: &FunctionDef) -> bool {
        false
    }

    // Hook for prompt change detection; needs a stored prompt per function.
    fn is_prompt_updated(&self, _function: &FunctionDef) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "@ai_code\ndef greet():\n    \"say hello\"\n";

    #[test]
    fn new_without_existing_output() {
        let target = Module::parse(TEMPLATE).unwrap();
        let policy = RegenerationPolicy::new(None);
        let decision = policy.decide(target.find_function("greet").unwrap());
        assert_eq!(decision, Decision::New);
        assert!(decision.regenerates());
    }

    #[test]
    fn reuse_when_existing_output_defines_it() {
        let target = Module::parse(TEMPLATE).unwrap();
        let existing = Module::parse("class Greeter:\n    def greet(self):\n        return 'hi'\n").unwrap();
        let policy = RegenerationPolicy::new(Some(&existing));

        let decision = policy.decide(target.find_function("greet").unwrap());
        assert_eq!(decision, Decision::ReuseExisting);
        assert!(!decision.regenerates());
        assert_eq!(policy.existing_body("greet").unwrap().body.len(), 1);
    }

    #[test]
    fn new_when_existing_output_lacks_it() {
        let target = Module::parse(TEMPLATE).unwrap();
        let existing = Module::parse("def other():\n    pass\n").unwrap();
        let policy = RegenerationPolicy::new(Some(&existing));
        assert_eq!(policy.decide(target.find_function("greet").unwrap()), Decision::New);
    }
}
