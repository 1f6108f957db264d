// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pk-sandbox: resource ceiling enforcement and the isolation-level
//! binder. The engine wraps every step dispatch in
//! `ResourceLimitEnforcer::enforce` and resolves the workflow's declared
//! `IsolationLevel` through an `IsolationBinder` before the step body runs.

pub mod enforcer;
pub mod isolation;
pub mod policy;

pub use enforcer::{EnforceOutcome, ResourceLimitEnforcer};
pub use isolation::{IsolationBinder, IsolationError, ProcessIsolationBinder};
pub use policy::{PolicyCeiling, SandboxManager};
