use super::*;

fn env(pairs: &[(&str, &str)]) -> EnvVars {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn expand_substitutes_known_variables() {
    let e = env(&[("DB", "sqlite")]);
    assert_eq!(e.expand("engine=${DB}").unwrap(), "engine=sqlite");
}

#[test]
fn expand_fails_on_unknown_variable() {
    let e = EnvVars::new();
    let err = e.expand("${MISSING}").unwrap_err();
    assert_eq!(err, UnknownEnvVar("MISSING".to_string()));
}

#[test]
fn expand_leaves_literal_text_without_placeholders_untouched() {
    let e = EnvVars::new();
    assert_eq!(e.expand("no placeholders here").unwrap(), "no placeholders here");
}

#[test]
fn expand_handles_multiple_and_adjacent_placeholders() {
    let e = env(&[("A", "1"), ("B", "2")]);
    assert_eq!(e.expand("${A}${B}-${A}").unwrap(), "12-1");
}

#[test]
fn child_scope_shadows_parent_but_keeps_unrelated_keys() {
    let parent = env(&[("A", "1"), ("B", "2")]);
    let overrides = env(&[("B", "20")]);
    let child = parent.child(&overrides);
    assert_eq!(child.get("A"), Some("1"));
    assert_eq!(child.get("B"), Some("20"));
}

#[test]
fn property_no_literal_placeholder_survives_successful_expansion() {
    // Invariant 2 from the spec: success implies no literal ${NAME} for any
    // bound NAME remains in the output.
    let e = env(&[("X", "value")]);
    let expanded = e.expand("prefix-${X}-suffix").unwrap();
    assert!(!expanded.contains("${X}"));
}
