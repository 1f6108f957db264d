//! Pattern-driven suggestion generation over a diagnostic's message
//! text, per spec §4.3/§7. Non-exhaustive by design: each pattern is a
//! substring sniff over the message, not a parse of it.

use pk_core::diagnostics::Suggestion;

/// Dispatch names the suggestion engine offers as near-miss candidates
/// for an unresolved step reference.
pub const KNOWN_STEP_NAMES: &[&str] = &["sh", "echo", "readFile", "writeFile", "checkout", "archiveArtifacts"];

const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Produce suggestions for a diagnostic message, given the step names
/// currently registered (used for the near-miss "did you mean" case;
/// callers pass the registry's `known_names()` instead of
/// `KNOWN_STEP_NAMES` when they want suggestions scoped to what's
/// actually resolvable, e.g. including `UserDefined` steps).
pub fn suggest(message: &str, known_names: &[&str]) -> Vec<Suggestion> {
    let lower = message.to_lowercase();
    let mut suggestions = Vec::new();

    if lower.contains("unresolved") && lower.contains("step") {
        suggestions.extend(suggest_step_name(message, known_names));
    }
    if lower.contains("type mismatch") {
        suggestions.push(Suggestion::new("Check parameter types."));
    }
    if (lower.contains("unmatched") || lower.contains("unbalanced"))
        && (lower.contains("brace") || lower.contains("paren") || lower.contains("bracket"))
    {
        suggestions.push(Suggestion::new("Add the matching closer."));
    }
    if lower.contains("null") && (lower.contains("deref") || lower.contains("reference")) {
        suggestions.push(Suggestion::new("Check for null and use safe access."));
    }
    if lower.contains("out-of-range") || lower.contains("out of range") || lower.contains("index") {
        suggestions.push(Suggestion::new("Check collection bounds."));
    }
    if lower.contains("blocked command") || lower.contains("denied") {
        suggestions.push(Suggestion::new("Security policy denied; use a sanctioned alternative."));
    }
    if lower.contains("deprecated") {
        suggestions.push(Suggestion::new("This API is deprecated; consult the migration notes."));
    }
    if lower.contains("invalid argument") {
        suggestions.push(Suggestion::new("Check the argument's name and type against the step contract."));
    }

    suggestions
}

/// Extract a quoted name from the message (`unresolved step "shel"`)
/// and propose the closest known name within Levenshtein distance 2.
fn suggest_step_name(message: &str, known_names: &[&str]) -> Option<Suggestion> {
    let attempted = extract_quoted(message)?;
    let candidate = known_names
        .iter()
        .map(|&name| (name, strsim::levenshtein(attempted, name)))
        .filter(|&(_, distance)| distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|&(name, distance)| (distance, name))?;

    Some(Suggestion::new(format!("Did you mean \"{}\"?", candidate.0)).with_replacement(candidate.0))
}

fn extract_quoted(message: &str) -> Option<&str> {
    let start = message.find('"')?;
    let rest = &message[start + 1..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
