//! `pk validate` exercises the definition/validation half of the exit
//! code contract without running anything.

use crate::prelude::Project;

#[test]
fn a_well_formed_pipeline_validates_clean() {
    let project = Project::with_pipeline(
        r#"
stages:
  - name: build
    steps:
      - kind: echo
        message: hi
"#,
    );
    let output = project.validate_cmd().output().expect("pk validate");
    assert!(output.status.success());
}

#[test]
fn a_malformed_pipeline_fails_with_exit_code_two() {
    let project = Project::with_pipeline("stages: [");
    let output = project.validate_cmd().output().expect("pk validate");
    assert_eq!(output.status.code(), Some(2));
}
