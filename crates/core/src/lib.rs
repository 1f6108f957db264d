// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pk-core: shared domain types for the pipeline kernel — the workflow
//! graph, environment scopes, resource/isolation model, ids, invocation
//! records, and the error taxonomy every other crate builds on.

pub mod context;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod id;
pub mod invocation;
pub mod model;
pub mod resource;

pub use context::{CancellationToken, CredentialsLookup, EnvCredentialsLookup, StepExecutionContext};
pub use diagnostics::{EnhancedError, Severity, SourceLocation, Suggestion};
pub use env::{EnvVars, UnknownEnvVar};
pub use error::{CancellationReason, KernelError, PolicyIssue, PolicyValidation};
pub use id::{ExecutionId, IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use invocation::{InvocationRecord, StepArgsView, StepResult};
pub use model::{
    Agent, ParallelFailureMode, PostBlock, PostTrigger, ReturnStdout, Stage, Status, Step,
    StepArgs, Workflow,
};
pub use resource::{IsolationLevel, ResourceLimitType, ResourceLimits, ResourceUsage, Violation};
