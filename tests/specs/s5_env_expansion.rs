//! S5 — Env expansion: a global env var is visible to a step's
//! `${NAME}` reference, with no `UnknownEnvVar` failure.

use crate::prelude::Project;

#[test]
fn a_global_env_var_expands_into_step_output() {
    let project = Project::with_pipeline(
        r#"
environment:
  DB: sqlite
stages:
  - name: e
    steps:
      - kind: echo
        message: "engine=${DB}"
"#,
    );

    let output = project.run_cmd().output().expect("pk run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("engine=sqlite"));
}
