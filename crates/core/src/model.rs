//! The workflow graph: pipeline -> stages -> steps -> parallel branches ->
//! post hooks, plus global environment and the top-level post block.
//!
//! The tree is strictly hierarchical (no cycles); parent references, where
//! needed by the executor, are carried as a path in context objects rather
//! than back-pointers on these nodes.

use crate::env::EnvVars;
use crate::resource::{IsolationLevel, ResourceLimits};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How the workflow's steps are hosted: run inline, or inside a container
/// image pulled for the duration of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agent {
    /// Run directly, no container provisioning. Written `none` on the
    /// wire to match the definition surface's `agent: {none} | {docker:
    /// ...}` shape.
    #[serde(rename = "none")]
    Inline,
    /// Run steps inside the named container image.
    Docker {
        image: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    },
}

/// A trigger a post-hook sequence is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostTrigger {
    Always,
    Success,
    Failure,
    Unstable,
    Changed,
    Aborted,
}

impl PostTrigger {
    /// All triggers, in the evaluation order the executor uses before
    /// placing `Always` last regardless of map iteration order.
    pub const ALL: [PostTrigger; 6] = [
        PostTrigger::Success,
        PostTrigger::Failure,
        PostTrigger::Unstable,
        PostTrigger::Changed,
        PostTrigger::Aborted,
        PostTrigger::Always,
    ];
}

/// A set of post-hook step sequences keyed by trigger, in declaration order
/// per trigger. `always` is always run last within a scope regardless of
/// where it appears in the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostBlock {
    #[serde(default)]
    hooks: IndexMap<PostTrigger, Vec<Step>>,
}

impl PostBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, trigger: PostTrigger, steps: Vec<Step>) {
        self.hooks.insert(trigger, steps);
    }

    pub fn get(&self, trigger: PostTrigger) -> Option<&[Step]> {
        self.hooks.get(&trigger).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Triggers that have bound step sequences, ordered so `Always` is last.
    pub fn ordered_triggers(&self) -> Vec<PostTrigger> {
        PostTrigger::ALL
            .into_iter()
            .filter(|t| self.hooks.contains_key(t))
            .collect()
    }
}

/// Discipline for capturing a step's stdout into the pipeline's variable
/// space instead of (or in addition to) the step's own log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnStdout(pub bool);

/// One unit of work within a stage, or a structural construct (`Parallel`,
/// `Retry`) that composes other steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Step {
    #[serde(rename = "sh")]
    Shell {
        command: String,
        #[serde(default)]
        return_stdout: ReturnStdout,
    },
    #[serde(rename = "echo")]
    Echo {
        message: String,
    },
    #[serde(rename = "readFile")]
    ReadFile {
        path: String,
        #[serde(default)]
        return_stdout: ReturnStdout,
    },
    #[serde(rename = "writeFile")]
    WriteFile {
        path: String,
        content: String,
    },
    #[serde(rename = "delay")]
    Delay {
        ms: u64,
    },
    #[serde(rename = "checkout")]
    Checkout {
        url: String,
        #[serde(default)]
        branch: Option<String>,
    },
    #[serde(rename = "archiveArtifacts")]
    ArchiveArtifacts {
        glob: String,
    },
    /// A named branch fan-out; every branch must have a unique name and a
    /// non-empty step sequence.
    #[serde(rename = "parallel")]
    Parallel {
        branches: IndexMap<String, Vec<Step>>,
        #[serde(default)]
        fail_fast: ParallelFailureMode,
    },
    /// Repeat the inner step sequence until it succeeds or `attempts` is
    /// exhausted.
    #[serde(rename = "retry")]
    Retry {
        attempts: u32,
        steps: Vec<Step>,
        #[serde(default)]
        backoff_ms: u64,
    },
    /// A step implemented by a collaborator and dispatched through the
    /// registry by name.
    #[serde(rename = "userDefined")]
    UserDefined {
        name: String,
        #[serde(default)]
        args: StepArgs,
        #[serde(default)]
        return_stdout: ReturnStdout,
    },
}

/// Whether a `Parallel` step cancels remaining branches on first failure
/// (the default) or lets every branch run to completion and aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParallelFailureMode {
    FailFast,
    CollectAll,
}

impl Default for ParallelFailureMode {
    fn default() -> Self {
        ParallelFailureMode::FailFast
    }
}

/// Arguments passed to a `UserDefined` step: either a named map or a
/// positional list, per the step contract in the spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepArgs {
    Named(IndexMap<String, serde_json::Value>),
    Positional(Vec<serde_json::Value>),
}

impl Default for StepArgs {
    fn default() -> Self {
        StepArgs::Named(IndexMap::new())
    }
}

impl Step {
    /// Human-readable step kind, used for logging and recorder lookups on
    /// the built-in (non-`UserDefined`) variants.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Step::Shell { .. } => "sh",
            Step::Echo { .. } => "echo",
            Step::ReadFile { .. } => "readFile",
            Step::WriteFile { .. } => "writeFile",
            Step::Delay { .. } => "delay",
            Step::Checkout { .. } => "checkout",
            Step::ArchiveArtifacts { .. } => "archiveArtifacts",
            Step::Parallel { .. } => "parallel",
            Step::Retry { .. } => "retry",
            Step::UserDefined { .. } => "userDefined",
        }
    }

    /// Dispatch name used to look the step up in the step registry.
    /// Built-in variants resolve to their `kind_name`; `UserDefined` steps
    /// resolve to the name they declare.
    pub fn dispatch_name(&self) -> &str {
        match self {
            Step::UserDefined { name, .. } => name,
            other => other.kind_name(),
        }
    }
}

/// The lifecycle state of a stage or the workflow as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Running,
    Success,
    Failure,
    Unstable,
    Aborted,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Pending | Status::Running)
    }
}

/// A named sequential group of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub post: PostBlock,
    /// Optional guard; the loader evaluates this at build time and omits
    /// stages that don't pass rather than modeling runtime branching here.
    #[serde(default)]
    pub when: Option<String>,
}

impl Stage {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
            post: PostBlock::new(),
            when: None,
        }
    }
}

/// The root node: a compiled, validated, immutable workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default = "default_agent")]
    pub agent: Agent,
    #[serde(default, rename = "environment")]
    pub global_env: EnvVars,
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub post: PostBlock,
    #[serde(default)]
    pub isolation_level: IsolationLevel,
    #[serde(default)]
    pub resource_limits: ResourceLimits,
}

impl Workflow {
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }
}

fn default_agent() -> Agent {
    Agent::Inline
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
