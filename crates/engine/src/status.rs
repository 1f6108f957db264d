//! Status rollup: folding step/stage outcomes into the pipeline's
//! summary vocabulary, the same one `PostTrigger` fires against.

use pk_core::Status;

/// Fold a set of statuses into one summary status. Precedence, highest
/// first: a real `Failure` always dominates even when it cascades into
/// `Aborted` siblings (a fail-fast parallel branch cut short by a
/// sibling's failure shouldn't outrank the failure that caused it);
/// `Aborted` in turn dominates a merely `Unstable` neighbour.
fn rollup(statuses: &[Status]) -> Status {
    if statuses.iter().any(|s| *s == Status::Failure) {
        Status::Failure
    } else if statuses.iter().any(|s| *s == Status::Aborted) {
        Status::Aborted
    } else if statuses.iter().any(|s| *s == Status::Unstable) {
        Status::Unstable
    } else {
        Status::Success
    }
}

/// Roll a stage's (or any step group's) child statuses into one status.
pub fn rollup_stage(step_statuses: &[Status]) -> Status {
    rollup(step_statuses)
}

/// Roll a workflow's stage statuses into its own status. A true
/// external cancellation always yields `Aborted`, regardless of what
/// the stages individually reported.
pub fn rollup_workflow(stage_statuses: &[Status], cancelled: bool) -> Status {
    if cancelled {
        Status::Aborted
    } else {
        rollup(stage_statuses)
    }
}

/// Downgrade a `Success` result to `Unstable` when a post hook failed;
/// any other status is left untouched, since a post-hook failure
/// shouldn't mask a real failure or an abort.
pub fn downgrade_for_post_failure(status: Status, any_post_hook_failed: bool) -> Status {
    if status == Status::Success && any_post_hook_failed {
        Status::Unstable
    } else {
        status
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
