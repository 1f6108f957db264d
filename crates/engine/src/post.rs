//! Decides which declared post-hook triggers fire for a finished
//! status, and names them for reporting.

use pk_core::{PostTrigger, Status};

/// Every trigger whose condition the given `(status, previous)` pair
/// satisfies, in the fixed evaluation order `PostTrigger::ALL` defines
/// (`always` last, so it always runs after any more specific hook).
pub fn matching_triggers(status: Status, previous: Option<Status>) -> Vec<PostTrigger> {
    PostTrigger::ALL
        .into_iter()
        .filter(|trigger| trigger_matches(*trigger, status, previous))
        .collect()
}

fn trigger_matches(trigger: PostTrigger, status: Status, previous: Option<Status>) -> bool {
    match trigger {
        PostTrigger::Always => true,
        PostTrigger::Success => status == Status::Success,
        PostTrigger::Failure => status == Status::Failure,
        PostTrigger::Unstable => status == Status::Unstable,
        PostTrigger::Aborted => status == Status::Aborted,
        PostTrigger::Changed => previous.is_some_and(|prev| prev != status),
    }
}

/// The wire-format name for a trigger, used to label the post-hook
/// group it produces in the run report.
pub fn trigger_name(trigger: PostTrigger) -> &'static str {
    match trigger {
        PostTrigger::Always => "always",
        PostTrigger::Success => "success",
        PostTrigger::Failure => "failure",
        PostTrigger::Unstable => "unstable",
        PostTrigger::Changed => "changed",
        PostTrigger::Aborted => "aborted",
    }
}

#[cfg(test)]
#[path = "post_tests.rs"]
mod tests;
