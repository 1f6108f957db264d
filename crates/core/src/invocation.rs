//! Step invocation records and outcomes, shared between the registry's
//! append-only recorder and the engine's status rollup.

use crate::id::ExecutionId;
use crate::model::StepArgs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A read-only view over a step's arguments, offered to step
/// implementations so they don't need to match on `StepArgs` directly.
#[derive(Debug, Clone)]
pub struct StepArgsView<'a>(&'a StepArgs);

impl<'a> StepArgsView<'a> {
    pub fn new(args: &'a StepArgs) -> Self {
        Self(args)
    }

    /// Look up a named argument. Returns `None` for positional args even
    /// when an index would make sense, by design — named access only.
    pub fn named(&self, key: &str) -> Option<&Value> {
        match self.0 {
            StepArgs::Named(map) => map.get(key),
            StepArgs::Positional(_) => None,
        }
    }

    /// Look up a positional argument by index.
    pub fn positional(&self, index: usize) -> Option<&Value> {
        match self.0 {
            StepArgs::Positional(list) => list.get(index),
            StepArgs::Named(_) => None,
        }
    }

    pub fn named_str(&self, key: &str) -> Option<&str> {
        self.named(key).and_then(Value::as_str)
    }

    /// Clone the underlying arguments out of the view, for callers (such
    /// as the invocation recorder) that need to retain them past the
    /// call.
    pub fn to_owned_args(&self) -> StepArgs {
        self.0.clone()
    }
}

/// The outcome of one step execution, as reported by a `StepImpl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl StepResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            duration_ms: 0,
        }
    }

    pub fn ok_with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            duration_ms: 0,
        }
    }

    pub fn failed(stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
            duration_ms: 0,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// A single entry in the invocation recorder: which step ran, under
/// which execution, with what arguments, and what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub execution_id: ExecutionId,
    pub step_name: String,
    pub args: StepArgs,
    pub result: Option<StepResult>,
    pub sequence: u64,
}

impl InvocationRecord {
    pub fn new(execution_id: ExecutionId, step_name: impl Into<String>, args: StepArgs, sequence: u64) -> Self {
        Self {
            execution_id,
            step_name: step_name.into(),
            args,
            result: None,
            sequence,
        }
    }
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod tests;
