//! End-to-end behavioral specifications for the pipeline execution
//! kernel. Black-box: these invoke the `pk` binary and verify stdout,
//! stderr, and exit codes against the scenarios in the kernel's
//! external interface contract.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/s1_sequential_success.rs"]
mod s1_sequential_success;
#[path = "specs/s2_parallel_fail_fast.rs"]
mod s2_parallel_fail_fast;
#[path = "specs/s3_retry_exhaustion.rs"]
mod s3_retry_exhaustion;
#[path = "specs/s4_resource_violation.rs"]
mod s4_resource_violation;
#[path = "specs/s5_env_expansion.rs"]
mod s5_env_expansion;
#[path = "specs/s6_policy_rejection.rs"]
mod s6_policy_rejection;

#[path = "specs/cli/validate.rs"]
mod cli_validate;
#[path = "specs/cli/explain.rs"]
mod cli_explain;
