// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pk-registry: the step dispatch table and its append-only invocation
//! recorder. Built-in steps (`pk-steps`) and user-supplied implementations
//! register here by name; the engine looks steps up by `Step::dispatch_name`.

pub mod recorder;
pub mod step;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use recorder::InvocationRecorder;
pub use step::{Category, Registry, SecurityLevel, StepImpl, UnresolvedStep};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeCall, FakeStepImpl};
