use super::*;

const VALID: &str = r#"
environment:
  DB: sqlite
stages:
  - name: build
    steps:
      - kind: sh
        command: "echo hi"
  - name: test
    steps:
      - kind: echo
        message: "engine=${DB}"
"#;

#[test]
fn loads_a_well_formed_workflow() {
    let (workflow, source_map) = load_workflow(VALID, "pipeline.yaml").unwrap();
    assert_eq!(workflow.stages.len(), 2);
    assert_eq!(workflow.global_env.get("DB"), Some("sqlite"));
    assert_eq!(source_map.original_file, "pipeline.yaml");
}

#[test]
fn rejects_duplicate_stage_names_with_a_definition_error() {
    let source = r#"
stages:
  - name: build
    steps:
      - kind: sh
        command: "echo a"
  - name: build
    steps:
      - kind: sh
        command: "echo b"
"#;
    let err = load_workflow(source, "pipeline.yaml").unwrap_err();
    match err {
        KernelError::Definition { path, .. } => assert_eq!(path, "stages[1]"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn rejects_malformed_yaml_with_a_definition_error() {
    let err = load_workflow("stages: [", "pipeline.yaml").unwrap_err();
    assert!(matches!(err, KernelError::Definition { .. }));
}

#[test]
fn rejects_a_definition_missing_the_stages_field() {
    let err = load_workflow("environment:\n  DB: sqlite\n", "pipeline.yaml").unwrap_err();
    match err {
        KernelError::Definition { path, .. } => assert_eq!(path, "stages"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn rejects_an_unknown_step_kind() {
    let source = r#"
stages:
  - name: build
    steps:
      - kind: teleport
        target: mars
"#;
    let err = load_workflow(source, "pipeline.yaml").unwrap_err();
    assert!(matches!(err, KernelError::Definition { .. }));
}
