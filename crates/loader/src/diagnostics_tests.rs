use super::*;

#[test]
fn unresolved_step_reference_suggests_the_closest_known_name() {
    let suggestions = suggest("unresolved step reference \"shel\"", KNOWN_STEP_NAMES);
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].replacement.as_deref(), Some("sh"));
}

#[test]
fn unresolved_step_reference_beyond_distance_two_suggests_nothing() {
    let suggestions = suggest("unresolved step reference \"zzzzzzzz\"", KNOWN_STEP_NAMES);
    assert!(suggestions.is_empty());
}

#[test]
fn type_mismatch_produces_parameter_type_suggestion() {
    let suggestions = suggest("type mismatch on argument `ms`", KNOWN_STEP_NAMES);
    assert_eq!(suggestions[0].message, "Check parameter types.");
}

#[test]
fn unmatched_brace_suggests_adding_a_closer() {
    let suggestions = suggest("unmatched brace in expression", KNOWN_STEP_NAMES);
    assert_eq!(suggestions[0].message, "Add the matching closer.");
}

#[test]
fn out_of_range_index_suggests_bounds_check() {
    let suggestions = suggest("index 7 is out-of-range for array of length 3", KNOWN_STEP_NAMES);
    assert_eq!(suggestions[0].message, "Check collection bounds.");
}

#[test]
fn blocked_command_suggests_a_sanctioned_alternative() {
    let suggestions = suggest("blocked command: rm -rf /", KNOWN_STEP_NAMES);
    assert_eq!(suggestions[0].message, "Security policy denied; use a sanctioned alternative.");
}

#[test]
fn unrelated_message_produces_no_suggestions() {
    assert!(suggest("stage \"build\" has no steps", KNOWN_STEP_NAMES).is_empty());
}
