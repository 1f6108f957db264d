//! The run report tree: one node per step or synthetic group, mirroring
//! the workflow graph's shape so callers can render or diff a finished
//! run.

use pk_core::{KernelError, ResourceUsage, Status, StepResult};

/// One node in the run report: a leaf step, or a synthetic group (a
/// parallel fan-out, a retry's attempts, or a post-hook trigger's step
/// sequence).
#[derive(Debug)]
pub struct StepOutcome {
    pub name: String,
    pub status: Status,
    pub result: Option<StepResult>,
    pub usage: ResourceUsage,
    pub error: Option<KernelError>,
    pub children: Vec<StepOutcome>,
}

impl StepOutcome {
    /// A finished leaf step, with no children.
    pub fn leaf(
        name: impl Into<String>,
        status: Status,
        result: Option<StepResult>,
        usage: ResourceUsage,
        error: Option<KernelError>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            result,
            usage,
            error,
            children: Vec::new(),
        }
    }

    /// A synthetic grouping node whose own status the caller has
    /// already rolled up from `children`.
    pub fn group(name: impl Into<String>, status: Status, children: Vec<StepOutcome>) -> Self {
        Self {
            name: name.into(),
            status,
            result: None,
            usage: ResourceUsage::default(),
            error: None,
            children,
        }
    }
}

/// The report for one stage: its own status, every step outcome, and
/// any post-hook groups that fired.
#[derive(Debug)]
pub struct StageReport {
    pub name: String,
    pub status: Status,
    pub steps: Vec<StepOutcome>,
    pub post: Vec<StepOutcome>,
}

/// The full run report: the workflow's overall status, each stage, and
/// the top-level post-hook groups that fired.
#[derive(Debug)]
pub struct WorkflowReport {
    pub status: Status,
    pub stages: Vec<StageReport>,
    pub post: Vec<StepOutcome>,
}
