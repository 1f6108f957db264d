//! The kernel's error taxonomy. Every failure mode the loader, registry,
//! sandbox, and engine can produce is a variant here so the CLI can map
//! failures to exit codes with one `match`.

use crate::env::UnknownEnvVar;
use crate::resource::{ResourceLimitType, Violation};
use thiserror::Error;

/// Why a `Cancellation` was raised, per the error taxonomy's `CancellationError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancellationReason {
    #[error("aborted by caller")]
    UserAbort,
    #[error("wall-clock timeout")]
    Timeout,
    #[error("a sibling step or parent scope failed")]
    ParentFailure,
}

/// A single problem found while validating a workflow definition against
/// the declared security/resource policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyIssue {
    pub path: String,
    pub message: String,
}

impl PolicyIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The result of validating a workflow against policy ceilings: either
/// clean, or a non-empty list of issues naming the offending path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyValidation {
    pub issues: Vec<PolicyIssue>,
}

impl PolicyValidation {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn push(&mut self, issue: PolicyIssue) {
        self.issues.push(issue);
    }
}

/// Every failure mode the kernel can surface, from parse-time definition
/// problems through to runtime resource violations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// The workflow definition is structurally or semantically invalid
    /// (bad YAML, missing required field, duplicate branch name...).
    #[error("invalid workflow definition at {path}: {message}")]
    Definition { path: String, message: String },

    /// A `UserDefined` step references a name the registry has no
    /// implementation for.
    #[error("unresolved step {name:?}")]
    UnresolvedStep { name: String },

    /// A step ran and reported failure, or raised while running.
    #[error("step {step_name:?} failed: {message}")]
    StepExecution {
        step_name: String,
        message: String,
        exit_code: Option<i32>,
    },

    /// A declared resource ceiling was breached during execution.
    #[error("resource violation on {}: observed {observed}, limit {limit}", .violation.kind_name())]
    ResourceViolation { violation: Violation },

    /// The workflow's declared resources or isolation level fall outside
    /// what policy permits.
    #[error("policy violation: {0:?}")]
    PolicyViolation(PolicyValidation),

    /// The requested isolation binding could not be established.
    #[error("isolation error ({level}): {message}")]
    Isolation { level: String, message: String },

    /// Execution was cancelled before it completed.
    #[error("cancelled: {reason}")]
    Cancellation { reason: CancellationReason },

    /// An `${NAME}` reference in a command or argument had no bound
    /// value.
    #[error(transparent)]
    UnknownEnvVar(#[from] UnknownEnvVar),

    /// Filesystem or process I/O failed outside of a specific step's own
    /// reported failure (e.g. loading the definition file itself).
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ResourceLimitType {
    fn kind_name(&self) -> &'static str {
        match self {
            ResourceLimitType::Wall => "wall",
            ResourceLimitType::Cpu => "cpu",
            ResourceLimitType::Memory => "memory",
            ResourceLimitType::Threads => "threads",
            ResourceLimitType::ExecutionError => "execution_error",
        }
    }
}

impl Violation {
    fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }
}

impl KernelError {
    /// Process exit code for the CLI, matching the kernel's external
    /// interface contract (`0` success, `1` failure, `2` definition/
    /// validation error, `3` aborted, `4` internal error). `0` is never
    /// returned here since a `KernelError` only exists on a non-success
    /// path; the CLI maps a clean `Status::Success` separately.
    pub fn exit_code(&self) -> i32 {
        match self {
            KernelError::Definition { .. }
            | KernelError::UnresolvedStep { .. }
            | KernelError::PolicyViolation(_) => 2,
            KernelError::Cancellation { .. } => 3,
            KernelError::StepExecution { .. } | KernelError::ResourceViolation { .. } => 1,
            KernelError::Isolation { .. } | KernelError::UnknownEnvVar(_) | KernelError::Io(_) => 4,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
